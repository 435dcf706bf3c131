//! # TopoMap Errors
//!
//! Error types for topology decoding, projection and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TopoMapError>;

/// TopoMap error types.
#[derive(Error, Debug)]
pub enum TopoMapError {
    // ========================================================================
    // Payload Errors
    // ========================================================================

    /// Payload is not well-formed or is missing a required field
    #[error("Malformed topology payload: {0}")]
    PayloadFormat(String),

    // ========================================================================
    // Geometry Errors
    // ========================================================================

    /// A signed arc reference resolved to an arc the table does not hold
    #[error("Arc index {arc} out of range (arc table holds {len} arcs)")]
    ArcIndexOutOfRange { arc: usize, len: usize },

    /// Coordinate cannot be projected without producing non-finite output
    #[error("Cannot project ({lat}, {lon}): coordinate is not finite")]
    ProjectionSingularity { lat: f64, lon: f64 },

    /// Ring encloses no area and cannot be extruded
    #[error("Degenerate ring with {vertices} distinct vertices encloses no area")]
    DegenerateRing { vertices: usize },

    // ========================================================================
    // Config / Source Errors
    // ========================================================================

    #[error("Failed to read {path}: {1}", path = .0.display())]
    ConfigIo(PathBuf, std::io::Error),

    #[error("Failed to parse {path}: {1}", path = .0.display())]
    ConfigParse(PathBuf, toml::de::Error),

    #[error("Invalid config {path}: {1}", path = .0.display())]
    ConfigInvalid(PathBuf, String),

    #[error("Failed to read topology source {path}: {1}", path = .0.display())]
    SourceIo(PathBuf, std::io::Error),
}

impl From<serde_json::Error> for TopoMapError {
    fn from(e: serde_json::Error) -> Self {
        TopoMapError::PayloadFormat(e.to_string())
    }
}
