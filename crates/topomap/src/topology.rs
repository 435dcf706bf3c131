//! # Topology Payload & Geometry Catalog
//!
//! Parses a topology document into a decoded [`ArcTable`] plus the typed
//! region geometries found under `objects.map.geometries`.
//!
//! ```text
//! {
//!   "transform": { "scale": [sx, sy], "translate": [tx, ty] },   // optional
//!   "arcs": [ [[dx, dy], ...], ... ],
//!   "objects": { "map": { "geometries": [
//!       { "type": "Polygon",      "arcs": [[0, -2]] },
//!       { "type": "MultiPolygon", "arcs": [[[1]], [[3, 4]]] },
//!       { "type": "LineString",   "arcs": [5] }
//!   ] } }
//! }
//! ```
//!
//! ## Table of Contents
//! 1. ArcRef — Direction-tagged arc reference
//! 2. RegionGeometry — Typed region variants
//! 3. GeometryCatalog — Parsed payload
//! 4. Raw payload schema

use serde::Deserialize;

use crate::arcs::{decode_arcs, ArcTable, ArcTransform};
use crate::error::{Result, TopoMapError};

// ============================================================================
// 1. ArcRef — Direction-tagged arc reference
// ============================================================================

/// Reference to an arc in the [`ArcTable`].
///
/// On the wire, `i >= 0` means arc `i` forward and a negative value means
/// arc `!i` (ones'-complement) traversed last-to-first, so `-1` is arc 0
/// reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "i64")]
pub struct ArcRef {
    pub arc: usize,
    pub reversed: bool,
}

impl ArcRef {
    pub fn forward(arc: usize) -> Self {
        Self { arc, reversed: false }
    }

    pub fn reversed(arc: usize) -> Self {
        Self { arc, reversed: true }
    }
}

impl From<i64> for ArcRef {
    fn from(code: i64) -> Self {
        if code >= 0 {
            Self::forward(code as usize)
        } else {
            Self::reversed(!code as usize)
        }
    }
}

// ============================================================================
// 2. RegionGeometry — Typed region variants
// ============================================================================

/// One region's geometry, as arc references
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum RegionGeometry {
    /// One arc-reference list per ring
    Polygon { arcs: Vec<Vec<ArcRef>> },
    /// One polygon-shaped ring group per part
    MultiPolygon { arcs: Vec<Vec<Vec<ArcRef>>> },
    /// A single open path
    LineString { arcs: Vec<ArcRef> },
}

impl RegionGeometry {
    /// Iterate every arc reference in the region
    pub fn arc_refs(&self) -> Box<dyn Iterator<Item = &ArcRef> + '_> {
        match self {
            RegionGeometry::Polygon { arcs } => Box::new(arcs.iter().flatten()),
            RegionGeometry::MultiPolygon { arcs } => Box::new(arcs.iter().flatten().flatten()),
            RegionGeometry::LineString { arcs } => Box::new(arcs.iter()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegionGeometry::Polygon { .. } => "Polygon",
            RegionGeometry::MultiPolygon { .. } => "MultiPolygon",
            RegionGeometry::LineString { .. } => "LineString",
        }
    }
}

const SUPPORTED_TYPES: [&str; 3] = ["Polygon", "MultiPolygon", "LineString"];

// ============================================================================
// 3. GeometryCatalog — Parsed payload
// ============================================================================

/// Decoded arcs plus the region geometries that reference them.
///
/// Built whole by [`GeometryCatalog::parse`]; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCatalog {
    arcs: ArcTable,
    regions: Vec<RegionGeometry>,
    unsupported: usize,
}

impl GeometryCatalog {
    /// Parse and decode a topology payload.
    ///
    /// Geometry records with a type other than Polygon, MultiPolygon or
    /// LineString (points, null geometries) are skipped and counted.
    pub fn parse(payload: &str) -> Result<Self> {
        let raw: RawTopology = serde_json::from_str(payload)?;

        let mut raw_arcs = Vec::with_capacity(raw.arcs.len());
        for (arc_index, arc) in raw.arcs.iter().enumerate() {
            let mut deltas = Vec::with_capacity(arc.len());
            for position in arc {
                match position.as_slice() {
                    [dx, dy, ..] => deltas.push([*dx, *dy]),
                    _ => {
                        return Err(TopoMapError::PayloadFormat(format!(
                            "arc {} has a position with {} coordinates",
                            arc_index,
                            position.len()
                        )))
                    }
                }
            }
            raw_arcs.push(deltas);
        }

        let mut regions = Vec::with_capacity(raw.objects.map.geometries.len());
        let mut unsupported = 0;
        for (index, record) in raw.objects.map.geometries.into_iter().enumerate() {
            let kind = record.get("type").and_then(|t| t.as_str());
            if !kind.is_some_and(|k| SUPPORTED_TYPES.contains(&k)) {
                tracing::debug!("Skipping geometry {} of unsupported type {:?}", index, kind);
                unsupported += 1;
                continue;
            }
            let region: RegionGeometry = serde_json::from_value(record).map_err(|e| {
                TopoMapError::PayloadFormat(format!("geometry {}: {}", index, e))
            })?;
            regions.push(region);
        }

        let arcs = decode_arcs(raw.transform.as_ref(), &raw_arcs);

        tracing::info!(
            "Decoded topology: {} arcs ({} vertices), {} regions",
            arcs.len(),
            arcs.vertex_count(),
            regions.len()
        );

        Ok(Self { arcs, regions, unsupported })
    }

    pub fn arcs(&self) -> &ArcTable {
        &self.arcs
    }

    pub fn regions(&self) -> &[RegionGeometry] {
        &self.regions
    }

    /// Number of geometry records skipped for an unsupported type
    pub fn unsupported(&self) -> usize {
        self.unsupported
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// ============================================================================
// 4. Raw payload schema
// ============================================================================

#[derive(Deserialize)]
struct RawTopology {
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    transform: Option<ArcTransform>,
    objects: RawObjects,
}

#[derive(Deserialize)]
struct RawObjects {
    map: RawMapObject,
}

#[derive(Deserialize)]
struct RawMapObject {
    geometries: Vec<serde_json::Value>,
}
