//! # TopoMap Configuration
//!
//! Parses `topomap.toml`, the declarative config for a topology map layer.
//! Every field has a default, so an empty file yields the stock landmass
//! rendering (center 51.28°N 0°E, scale 100, 0.5-deep grey extrusion).
//!
//! ## Table of Contents
//! 1. TopoMapConfig — Top-level config
//! 2. ProjectionConfig — Drawing-plane projection
//! 3. ExtrusionConfig — Solid extrusion profile
//! 4. StyleConfig — Fill material and line styling
//! 5. Parsing

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TopoMapError};
use crate::projection::MAX_MERCATOR_LATITUDE;

// ============================================================================
// 1. TopoMapConfig — Top-level config
// ============================================================================

/// Top-level topology map configuration, parsed from `topomap.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Resource)]
pub struct TopoMapConfig {
    /// Topology file to load, relative to the config file
    #[serde(default)]
    pub source: Option<String>,
    /// Projection center and scale
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Extrusion profile for polygon regions
    #[serde(default)]
    pub extrusion: ExtrusionConfig,
    /// Material and line styling
    #[serde(default)]
    pub style: StyleConfig,
}

// ============================================================================
// 2. ProjectionConfig — Drawing-plane projection
// ============================================================================

/// Projection parameters shared by `lon2x`, `lat2z` and `alt2y`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Center latitude (degrees) mapped to z = 0
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    /// Center longitude (degrees) mapped to x = 0
    #[serde(default)]
    pub center_lon: f64,
    /// Drawing units per radian
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Latitudes are clamped to ±this before the Mercator term
    #[serde(default = "default_max_latitude")]
    pub max_latitude: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: 0.0,
            scale: default_scale(),
            max_latitude: default_max_latitude(),
        }
    }
}

fn default_center_lat() -> f64 { 51.28 }
fn default_scale() -> f64 { 100.0 }
fn default_max_latitude() -> f64 { MAX_MERCATOR_LATITUDE }

impl ProjectionConfig {
    /// Check the values the projection math cannot recover from
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.max_latitude > 0.0 && self.max_latitude < 90.0) {
            return Err(format!(
                "projection.max_latitude must be in (0, 90), got {}",
                self.max_latitude
            ));
        }
        if !(self.center_lat.is_finite() && self.center_lon.is_finite()) {
            return Err("projection center must be finite".to_string());
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(format!("projection.scale must be positive, got {}", self.scale));
        }
        Ok(())
    }
}

// ============================================================================
// 3. ExtrusionConfig — Solid extrusion profile
// ============================================================================

/// Extrusion profile applied to every polygon ring (no bevel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionConfig {
    /// Number of bands the side walls are split into
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Extrusion depth in drawing units
    #[serde(default = "default_depth")]
    pub depth: f32,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            depth: default_depth(),
        }
    }
}

fn default_steps() -> u32 { 2 }
fn default_depth() -> f32 { 0.5 }

// ============================================================================
// 4. StyleConfig — Fill material and line styling
// ============================================================================

/// Visual style for published map meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// RGB or RGBA color in 0.0–1.0 range
    #[serde(default = "default_color")]
    pub color: Vec<f32>,
    /// Fill opacity (0.0–1.0)
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Whether the fill material blends with what is behind it
    #[serde(default = "default_transparent")]
    pub transparent: bool,
    /// Ribbon width for LineString regions, in drawing units
    #[serde(default = "default_line_width")]
    pub line_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            opacity: default_opacity(),
            transparent: default_transparent(),
            line_width: default_line_width(),
        }
    }
}

// 0xcccccc
fn default_color() -> Vec<f32> { vec![0.8, 0.8, 0.8] }
fn default_opacity() -> f32 { 1.0 }
fn default_transparent() -> bool { true }
fn default_line_width() -> f32 { 0.1 }

impl StyleConfig {
    /// RGBA fill color, with alpha taken from the color vec or `opacity`
    pub fn fill_color(&self) -> Color {
        match self.color.len() {
            3 => Color::srgba(self.color[0], self.color[1], self.color[2], self.opacity),
            4 => Color::srgba(self.color[0], self.color[1], self.color[2], self.color[3]),
            _ => Color::srgba(0.5, 0.5, 0.5, self.opacity),
        }
    }
}

// ============================================================================
// 5. Parsing
// ============================================================================

impl TopoMapConfig {
    /// Load a TopoMapConfig from a `topomap.toml` file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TopoMapError::ConfigIo(path.to_path_buf(), e))?;
        let config: TopoMapConfig = toml::from_str(&content)
            .map_err(|e| TopoMapError::ConfigParse(path.to_path_buf(), e))?;
        config
            .projection
            .validate()
            .map_err(|e| TopoMapError::ConfigInvalid(path.to_path_buf(), e))?;
        Ok(config)
    }

    /// Resolve the `source` path against the directory holding the config
    pub fn source_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.source.as_ref().map(|s| config_dir.join(s))
    }
}
