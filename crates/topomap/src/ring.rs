//! # Ring Assembly
//!
//! Stitches a region's arc references into one continuous path of projected
//! points. Forward references walk an arc first-to-last, reversed references
//! walk it last-to-first. The first vertex visited is the path origin and every
//! later vertex continues the same path.
//!
//! Adjacent arcs share their join vertex by construction. The next arc's
//! first vertex is dropped only when its projected point is exactly equal to
//! the point the path currently ends on; any other coincident points are
//! kept. Dropping a zero-length edge leaves the enclosed (and triangulated)
//! area unchanged, so rings match a vertex-for-vertex walk of the arcs in
//! shape and differ only in point count.

use geo::Coord;

use crate::arcs::{ArcTable, GeoVertex};
use crate::error::{Result, TopoMapError};
use crate::projection::{PlanarPoint, Projector};
use crate::topology::ArcRef;

/// One boundary loop (or open path, for LineString regions) in the drawing plane
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    points: Vec<PlanarPoint>,
}

impl Ring {
    pub fn new(points: Vec<PlanarPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PlanarPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Path origin
    pub fn origin(&self) -> Option<PlanarPoint> {
        self.points.first().copied()
    }

    /// True when the last point coincides with the first
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Points with the closing duplicate removed
    pub fn unique_points(&self) -> &[PlanarPoint] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }
}

/// Assemble one ring from arc references.
///
/// Fails with [`TopoMapError::ArcIndexOutOfRange`] if a reference names an
/// arc the table does not hold, or with
/// [`TopoMapError::ProjectionSingularity`] on a non-finite vertex.
pub fn assemble_ring(refs: &[ArcRef], arcs: &ArcTable, projector: &Projector) -> Result<Ring> {
    let mut points: Vec<Coord<f64>> = Vec::new();

    for arc_ref in refs {
        let arc = arcs.get(arc_ref.arc).ok_or(TopoMapError::ArcIndexOutOfRange {
            arc: arc_ref.arc,
            len: arcs.len(),
        })?;

        let vertices: Box<dyn Iterator<Item = &GeoVertex> + '_> = if arc_ref.reversed {
            Box::new(arc.iter().rev())
        } else {
            Box::new(arc.iter())
        };

        for (i, vertex) in vertices.enumerate() {
            let point = projector.project(vertex)?;
            // Exact join only
            if i == 0 && points.last() == Some(&point) {
                continue;
            }
            points.push(point);
        }
    }

    Ok(Ring::new(points))
}
