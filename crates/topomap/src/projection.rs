//! # Drawing-Plane Projection
//!
//! Maps geographic coordinates onto the 2D drawing plane the map is built in.
//!
//! ```text
//! x = (rad(lon) - rad(center_lon)) * scale                      linear
//! z = (ln tan(π/4 + rad(lat)/2) - ln tan(π/4 + rad(center_lat)/2)) * scale   Mercator
//! ```
//!
//! The Mercator term diverges at the poles, so latitudes are clamped to
//! `±max_latitude` before projection.
//!
//! ## Table of Contents
//! 1. PlanarPoint
//! 2. Projector
//! 3. Free projection functions

use std::f64::consts::FRAC_PI_4;

use crate::arcs::GeoVertex;
use crate::config::ProjectionConfig;
use crate::error::{Result, TopoMapError};

/// Meters per degree of latitude, used for altitude scaling
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Latitude at which Web Mercator becomes square; the default clamp limit
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

// ============================================================================
// 1. PlanarPoint
// ============================================================================

/// A point in the drawing plane
pub type PlanarPoint = geo::Coord<f64>;

// ============================================================================
// 2. Projector
// ============================================================================

/// Projection center plus the fixed scale and latitude limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub center_lat: f64,
    pub center_lon: f64,
    pub scale: f64,
    pub max_latitude: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self::from(&ProjectionConfig::default())
    }
}

impl From<&ProjectionConfig> for Projector {
    fn from(config: &ProjectionConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("{}; unusable values fall back to defaults", e);
        }
        Self {
            center_lat: config.center_lat,
            center_lon: config.center_lon,
            scale: config.scale,
            max_latitude: config.max_latitude,
        }
    }
}

impl Projector {
    /// Move the projection center
    pub fn set_center(&mut self, lat: f64, lon: f64) {
        self.center_lat = lat;
        self.center_lon = lon;
    }

    pub fn lon2x(&self, lon: f64) -> f64 {
        lon2x(lon, self.center_lon, self.scale)
    }

    /// Clamp limit in use: `max_latitude` when inside (0, 90), otherwise
    /// [`MAX_MERCATOR_LATITUDE`]
    pub fn latitude_limit(&self) -> f64 {
        if self.max_latitude > 0.0 && self.max_latitude < 90.0 {
            self.max_latitude
        } else {
            MAX_MERCATOR_LATITUDE
        }
    }

    /// Mercator z for `lat`, clamped to `±latitude_limit()`
    pub fn lat2z(&self, lat: f64) -> f64 {
        let limit = self.latitude_limit();
        let clamped = lat.clamp(-limit, limit);
        if clamped != lat {
            tracing::debug!("Clamped latitude {} to {}", lat, clamped);
        }
        lat2z(clamped, self.center_lat.clamp(-limit, limit), self.scale)
    }

    pub fn alt2y(&self, alt: f64) -> f64 {
        alt2y(alt, self.scale)
    }

    /// Project a vertex onto the drawing plane.
    ///
    /// Fails with [`TopoMapError::ProjectionSingularity`] if either
    /// coordinate, or the projected point, is NaN or infinite.
    pub fn project(&self, vertex: &GeoVertex) -> Result<PlanarPoint> {
        let singular = TopoMapError::ProjectionSingularity {
            lat: vertex.lat,
            lon: vertex.lon,
        };
        if !vertex.lon.is_finite() || !vertex.lat.is_finite() {
            return Err(singular);
        }
        let point = PlanarPoint {
            x: self.lon2x(vertex.lon),
            y: self.lat2z(vertex.lat),
        };
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(singular);
        }
        Ok(point)
    }
}

// ============================================================================
// 3. Free projection functions
// ============================================================================

/// Linear longitude projection
pub fn lon2x(lon: f64, center_lon: f64, scale: f64) -> f64 {
    (lon.to_radians() - center_lon.to_radians()) * scale
}

/// Mercator latitude projection. Unbounded as `|lat|` approaches 90°.
pub fn lat2z(lat: f64, center_lat: f64, scale: f64) -> f64 {
    let y = (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    let cy = (FRAC_PI_4 + center_lat.to_radians() / 2.0).tan().ln();
    (y - cy) * scale
}

/// Altitude in meters to drawing-plane height
pub fn alt2y(alt: f64, scale: f64) -> f64 {
    alt / METERS_PER_DEGREE * scale
}
