//! # Arc Decoding
//!
//! Expands delta-coded arcs into absolute geographic vertices.
//!
//! Each arc position is a `[dx, dy]` offset from the previous position of the
//! same arc; the running sum restarts at zero for every arc. When the
//! topology is quantized, a `transform` maps the integer grid back to
//! longitude/latitude degrees.
//!
//! ## Table of Contents
//! 1. GeoVertex — Absolute lon/lat coordinate
//! 2. ArcTransform — Quantization transform
//! 3. ArcTable — Decoded arcs addressable by id
//! 4. Decoding

use serde::{Deserialize, Serialize};

// ============================================================================
// 1. GeoVertex — Absolute lon/lat coordinate
// ============================================================================

/// Absolute geographic coordinate (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoVertex {
    pub lon: f64,
    pub lat: f64,
}

impl GeoVertex {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

// ============================================================================
// 2. ArcTransform — Quantization transform
// ============================================================================

/// Affine transform from quantized grid to geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl ArcTransform {
    /// Map an accumulated grid position to lon/lat
    pub fn apply(&self, x: f64, y: f64) -> GeoVertex {
        GeoVertex::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

// ============================================================================
// 3. ArcTable — Decoded arcs addressable by id
// ============================================================================

/// Decoded arcs; an arc's position in the table is its id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcTable {
    arcs: Vec<Vec<GeoVertex>>,
}

impl ArcTable {
    pub fn new(arcs: Vec<Vec<GeoVertex>>) -> Self {
        Self { arcs }
    }

    /// Vertices of arc `id`, first to last
    pub fn get(&self, id: usize) -> Option<&[GeoVertex]> {
        self.arcs.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Total number of decoded vertices across all arcs
    pub fn vertex_count(&self) -> usize {
        self.arcs.iter().map(Vec::len).sum()
    }
}

// ============================================================================
// 4. Decoding
// ============================================================================

/// Decode one arc by cumulative summation of its `[dx, dy]` deltas.
pub fn decode_arc(transform: Option<&ArcTransform>, deltas: &[[f64; 2]]) -> Vec<GeoVertex> {
    let (mut x, mut y) = (0.0f64, 0.0f64);
    deltas
        .iter()
        .map(|[dx, dy]| {
            x += dx;
            y += dy;
            match transform {
                Some(t) => t.apply(x, y),
                None => GeoVertex::new(x, y),
            }
        })
        .collect()
}

/// Decode every raw arc into an [`ArcTable`], preserving order.
pub fn decode_arcs(transform: Option<&ArcTransform>, raw_arcs: &[Vec<[f64; 2]>]) -> ArcTable {
    ArcTable::new(
        raw_arcs
            .iter()
            .map(|arc| decode_arc(transform, arc))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_sum() {
        let identity = ArcTransform { scale: [1.0, 1.0], translate: [0.0, 0.0] };
        let arc = decode_arc(Some(&identity), &[[1.0, 1.0], [2.0, 2.0], [-1.0, -1.0]]);
        assert_eq!(
            arc,
            vec![
                GeoVertex::new(1.0, 1.0),
                GeoVertex::new(3.0, 3.0),
                GeoVertex::new(2.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_without_transform_is_absolute() {
        let arc = decode_arc(None, &[[140.5, 43.0], [0.25, -0.5]]);
        assert_eq!(arc, vec![GeoVertex::new(140.5, 43.0), GeoVertex::new(140.75, 42.5)]);
    }

    #[test]
    fn test_transform_scales_and_translates() {
        let t = ArcTransform { scale: [0.01, 0.02], translate: [-180.0, -90.0] };
        let arc = decode_arc(Some(&t), &[[100.0, 50.0], [100.0, 50.0]]);
        assert_eq!(arc[0], GeoVertex::new(100.0 * 0.01 - 180.0, 50.0 * 0.02 - 90.0));
        assert_eq!(arc[1], GeoVertex::new(200.0 * 0.01 - 180.0, 100.0 * 0.02 - 90.0));
    }

    #[test]
    fn test_running_sum_resets_per_arc() {
        let table = decode_arcs(None, &[vec![[5.0, 5.0], [1.0, 0.0]], vec![[1.0, 1.0]]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some(&[GeoVertex::new(1.0, 1.0)][..]));
        assert_eq!(table.vertex_count(), 3);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_long_quantized_arc_has_no_drift() {
        let deltas: Vec<[f64; 2]> = (0..10_000).map(|i| if i % 2 == 0 { [3.0, -7.0] } else { [-3.0, 7.0] }).collect();
        let arc = decode_arc(None, &deltas);
        assert_eq!(arc.last().copied(), Some(GeoVertex::new(0.0, 0.0)));
    }
}
