//! # Region Mesh Building
//!
//! Turns assembled rings into renderer-independent triangle buffers.
//! - Polygon ring → extruded prism (earcut caps + side walls)
//! - LineString path → flat ribbon
//! - All region solids of one draw pass → a single merged buffer
//!
//! Geometry is built in shape space: the ring lies in the XY plane and the
//! extrusion runs along +Z from 0 to `depth`. The scene boundary rotates it
//! onto the ground plane.
//!
//! ## Table of Contents
//! 1. MeshBuffers — Vertex/index buffers with merge
//! 2. Prism extrusion (Polygon ring → solid)
//! 3. Ribbon generation (LineString → flat strip)
//! 4. MeshBuilder — Catalog → merged meshes

use bevy::math::{Vec2, Vec3};
use geo::{Area, LineString, Polygon, TriangulateEarcut};

use crate::arcs::ArcTable;
use crate::config::{ExtrusionConfig, TopoMapConfig};
use crate::error::{Result, TopoMapError};
use crate::projection::{PlanarPoint, Projector};
use crate::ring::{assemble_ring, Ring};
use crate::topology::{ArcRef, GeometryCatalog, RegionGeometry};

// ============================================================================
// 1. MeshBuffers — Vertex/index buffers with merge
// ============================================================================

/// Triangle-list buffers, one normal and uv per position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv.to_array());
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append `other`, offsetting its indices past the existing vertices
    pub fn merge(&mut self, other: &MeshBuffers) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Merge many buffers into one
    pub fn merge_all<'a>(parts: impl IntoIterator<Item = &'a MeshBuffers>) -> MeshBuffers {
        let mut merged = MeshBuffers::default();
        for part in parts {
            merged.merge(part);
        }
        merged
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Signed enclosed volume (divergence theorem). Positive for a closed
    /// solid whose triangles wind counter-clockwise seen from outside.
    pub fn volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]]
                    .map(|i| Vec3::from_array(self.positions[i as usize]).as_dvec3());
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }
}

// ============================================================================
// 2. Prism extrusion (Polygon ring → solid)
// ============================================================================

/// Extrude a closed ring into a prism of `profile.depth`, side walls split
/// into `profile.steps` bands.
///
/// Fails with [`TopoMapError::DegenerateRing`] for rings that enclose no
/// area (fewer than three distinct points, collinear points, or a
/// triangulation that yields nothing).
pub fn extrude_ring(ring: &Ring, profile: &ExtrusionConfig) -> Result<MeshBuffers> {
    let mut outline: Vec<PlanarPoint> = ring.unique_points().to_vec();
    let degenerate = TopoMapError::DegenerateRing { vertices: outline.len() };
    if outline.len() < 3 {
        return Err(degenerate);
    }

    let mut polygon = Polygon::new(LineString::new(outline.clone()), vec![]);
    let area = polygon.signed_area();
    if area == 0.0 || !area.is_finite() {
        return Err(degenerate);
    }
    // Counter-clockwise outline gives outward side normals
    if area < 0.0 {
        outline.reverse();
        polygon = Polygon::new(LineString::new(outline.clone()), vec![]);
    }

    let triangles = polygon.earcut_triangles();
    if triangles.is_empty() {
        tracing::debug!("Earcut produced no triangles for {} vertices", outline.len());
        return Err(degenerate);
    }

    let depth = profile.depth;
    let steps = profile.steps.max(1);
    let mut buffers = MeshBuffers::default();

    // Caps: top faces +Z, bottom faces -Z
    for triangle in &triangles {
        let [a, mut b, mut c] = triangle.to_array();
        if (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) < 0.0 {
            std::mem::swap(&mut b, &mut c);
        }
        let [a, b, c] = [a, b, c].map(|p| Vec2::new(p.x as f32, p.y as f32));

        let top = [a, b, c].map(|p| buffers.push_vertex(p.extend(depth), Vec3::Z, p));
        buffers.push_triangle(top[0], top[1], top[2]);

        let bottom = [a, b, c].map(|p| buffers.push_vertex(p.extend(0.0), Vec3::NEG_Z, p));
        buffers.push_triangle(bottom[0], bottom[2], bottom[1]);
    }

    // Side walls, one flat-shaded quad per edge per band
    let n = outline.len();
    let mut u = 0.0f32;
    for i in 0..n {
        let p0 = Vec2::new(outline[i].x as f32, outline[i].y as f32);
        let p1 = Vec2::new(outline[(i + 1) % n].x as f32, outline[(i + 1) % n].y as f32);
        let edge = p1 - p0;
        let length = edge.length();
        if length == 0.0 {
            continue;
        }
        let normal = Vec3::new(edge.y, -edge.x, 0.0) / length;

        for s in 0..steps {
            let z0 = depth * s as f32 / steps as f32;
            let z1 = depth * (s + 1) as f32 / steps as f32;

            let a = buffers.push_vertex(p0.extend(z0), normal, Vec2::new(u, z0));
            let b = buffers.push_vertex(p1.extend(z0), normal, Vec2::new(u + length, z0));
            let c = buffers.push_vertex(p1.extend(z1), normal, Vec2::new(u + length, z1));
            let d = buffers.push_vertex(p0.extend(z1), normal, Vec2::new(u, z1));

            buffers.push_triangle(a, b, c);
            buffers.push_triangle(a, c, d);
        }
        u += length;
    }

    Ok(buffers)
}

// ============================================================================
// 3. Ribbon generation (LineString → flat strip)
// ============================================================================

/// Generate a flat ribbon of `width` along an open path, facing +Z.
pub fn generate_ribbon(path: &Ring, width: f32) -> Option<MeshBuffers> {
    let path: Vec<Vec2> = path
        .points()
        .iter()
        .map(|p| Vec2::new(p.x as f32, p.y as f32))
        .collect();
    if path.len() < 2 {
        tracing::warn!("Ribbon mesh requires at least 2 path vertices, got {}", path.len());
        return None;
    }

    let num_path = path.len();
    let half_w = width * 0.5;

    // Accumulated length for UV
    let mut accumulated_length = vec![0.0f32; num_path];
    for i in 1..num_path {
        accumulated_length[i] = accumulated_length[i - 1] + path[i].distance(path[i - 1]);
    }
    let total_length = accumulated_length.last().copied().unwrap_or(1.0).max(0.001);

    let mut buffers = MeshBuffers::default();
    for (i, &center) in path.iter().enumerate() {
        let tangent = if i == 0 {
            (path[1] - path[0]).normalize_or_zero()
        } else if i == num_path - 1 {
            (path[i] - path[i - 1]).normalize_or_zero()
        } else {
            ((path[i + 1] - path[i]).normalize_or_zero()
                + (path[i] - path[i - 1]).normalize_or_zero())
            .normalize_or_zero()
        };

        // Left of the direction of travel
        let side = tangent.perp() * half_w;
        let v = accumulated_length[i] / total_length;

        buffers.push_vertex((center + side).extend(0.0), Vec3::Z, Vec2::new(0.0, v));
        buffers.push_vertex((center - side).extend(0.0), Vec3::Z, Vec2::new(1.0, v));
    }

    for i in 0..(num_path - 1) as u32 {
        let left = i * 2;
        let right = i * 2 + 1;
        let next_left = (i + 1) * 2;
        let next_right = (i + 1) * 2 + 1;

        buffers.push_triangle(right, next_right, left);
        buffers.push_triangle(left, next_right, next_left);
    }

    Some(buffers)
}

// ============================================================================
// 4. MeshBuilder — Catalog → merged meshes
// ============================================================================

/// A region (or one of its rings) that could not be built, kept for reporting
#[derive(Debug)]
pub struct RegionDiagnostic {
    /// Index of the region in the catalog
    pub region: usize,
    pub error: TopoMapError,
}

/// Output of one build pass over a catalog
#[derive(Debug, Default)]
pub struct BuiltMeshes {
    /// Every polygon-derived solid merged into one buffer
    pub solid: Option<MeshBuffers>,
    /// One ribbon per LineString region, in catalog order
    pub lines: Vec<MeshBuffers>,
    /// Regions skipped because of bad arc references or coordinates, and
    /// rings dropped because they enclose no area
    pub diagnostics: Vec<RegionDiagnostic>,
}

/// Geometry produced for a single region
#[derive(Debug)]
enum RegionMesh {
    Solid(Option<MeshBuffers>),
    Line(Option<MeshBuffers>),
}

/// Builds region meshes with a fixed projection and extrusion profile
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    pub projector: Projector,
    pub extrusion: ExtrusionConfig,
    pub line_width: f32,
}

impl From<&TopoMapConfig> for MeshBuilder {
    fn from(config: &TopoMapConfig) -> Self {
        Self {
            projector: Projector::from(&config.projection),
            extrusion: config.extrusion,
            line_width: config.style.line_width,
        }
    }
}

impl MeshBuilder {
    /// One solid per ring, with no hole subtraction between rings.
    /// Degenerate rings are dropped and collected in `dropped`.
    fn polygon_solids(
        &self,
        rings: &[Vec<ArcRef>],
        arcs: &ArcTable,
        dropped: &mut Vec<TopoMapError>,
    ) -> Result<Vec<MeshBuffers>> {
        let mut solids = Vec::with_capacity(rings.len());
        for refs in rings {
            let ring = assemble_ring(refs, arcs, &self.projector)?;
            match extrude_ring(&ring, &self.extrusion) {
                Ok(solid) => solids.push(solid),
                Err(e @ TopoMapError::DegenerateRing { .. }) => dropped.push(e),
                Err(e) => return Err(e),
            }
        }
        Ok(solids)
    }

    fn build_region(
        &self,
        region: &RegionGeometry,
        arcs: &ArcTable,
        dropped: &mut Vec<TopoMapError>,
    ) -> Result<RegionMesh> {
        match region {
            RegionGeometry::Polygon { arcs: rings } => {
                let solids = self.polygon_solids(rings, arcs, dropped)?;
                Ok(RegionMesh::Solid(merge_nonempty(&solids)))
            }
            RegionGeometry::MultiPolygon { arcs: parts } => {
                let mut merged_parts = Vec::with_capacity(parts.len());
                for rings in parts {
                    let solids = self.polygon_solids(rings, arcs, dropped)?;
                    merged_parts.extend(merge_nonempty(&solids));
                }
                Ok(RegionMesh::Solid(merge_nonempty(&merged_parts)))
            }
            RegionGeometry::LineString { arcs: refs } => {
                let path = assemble_ring(refs, arcs, &self.projector)?;
                Ok(RegionMesh::Line(generate_ribbon(&path, self.line_width)))
            }
        }
    }

    /// Build every region in the catalog.
    ///
    /// A region with a bad arc reference or coordinate is skipped and
    /// reported in `diagnostics`; the rest still build.
    pub fn build(&self, catalog: &GeometryCatalog) -> BuiltMeshes {
        let mut built = BuiltMeshes::default();
        let mut solids = Vec::new();

        for (index, region) in catalog.regions().iter().enumerate() {
            let mut dropped = Vec::new();
            let result = self.build_region(region, catalog.arcs(), &mut dropped);
            for error in dropped {
                tracing::warn!("Dropped ring of {} region {}: {}", region.kind(), index, error);
                built.diagnostics.push(RegionDiagnostic { region: index, error });
            }
            match result {
                Ok(RegionMesh::Solid(solid)) => solids.extend(solid),
                Ok(RegionMesh::Line(line)) => built.lines.extend(line),
                Err(error) => {
                    tracing::warn!("Skipping {} region {}: {}", region.kind(), index, error);
                    built.diagnostics.push(RegionDiagnostic { region: index, error });
                }
            }
        }

        built.solid = merge_nonempty(&solids);
        built
    }
}

fn merge_nonempty(parts: &[MeshBuffers]) -> Option<MeshBuffers> {
    if parts.is_empty() {
        None
    } else {
        Some(MeshBuffers::merge_all(parts))
    }
}
