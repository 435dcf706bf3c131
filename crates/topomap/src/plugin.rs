//! # Bevy Plugin for Topology Maps
//!
//! Registers components and resources, loads the configured topology source
//! once, and redraws the map whenever it is marked dirty (after a `read` or a
//! center change).
//!
//! ## Table of Contents
//! 1. TopoMapPlugin — Main plugin
//! 2. Systems: load_topo_map_source, redraw_topo_map

use bevy::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::TopoMapConfig;
use crate::error::{Result, TopoMapError};
use crate::layers::TopoMapMesh;
use crate::map::TopoMap;
use crate::scene::BevyScene;

// ============================================================================
// 1. TopoMapPlugin — Main plugin
// ============================================================================

/// Bevy plugin drawing a [`TopoMap`] resource into the world.
///
/// Insert a `TopoMap` directly (and feed it with `read`), or call
/// [`load_topo_map_config`] to build one from `topomap.toml` and its `source`.
pub struct TopoMapPlugin;

impl Plugin for TopoMapPlugin {
    fn build(&self, app: &mut App) {
        app
            .register_type::<TopoMapMesh>()
            .init_resource::<TopoMapLoadState>()
            .add_systems(Update, (
                load_topo_map_source.run_if(resource_exists::<TopoMapConfig>.and(not(topo_source_loaded))),
                redraw_topo_map.run_if(resource_exists::<TopoMap>),
            ).chain());
    }
}

/// Tracks whether the configured source has been read
#[derive(Resource, Default)]
pub struct TopoMapLoadState {
    /// Whether the `source` file has been read (or found missing)
    pub source_loaded: bool,
    /// Directory of `topomap.toml`, for resolving `source`
    pub config_dir: Option<PathBuf>,
}

/// Run condition: source already read
fn topo_source_loaded(state: Res<TopoMapLoadState>) -> bool {
    state.source_loaded
}

// ============================================================================
// 2. Systems
// ============================================================================

/// Load `topomap.toml` and insert `TopoMapConfig`, an unloaded `TopoMap`
/// and the load state.
pub fn load_topo_map_config(path: PathBuf, commands: &mut Commands) -> Result<()> {
    let config = TopoMapConfig::load(&path)?;
    let map: TopoMap = TopoMap::new(&config);
    let config_dir = path.parent().map(Path::to_path_buf);

    commands.insert_resource(config);
    commands.insert_resource(map);
    commands.insert_resource(TopoMapLoadState {
        source_loaded: false,
        config_dir,
    });

    tracing::info!("Loaded topomap config from {}", path.display());
    Ok(())
}

/// Read the configured source file into the map
fn read_source(map: &mut TopoMap, path: &Path) -> Result<()> {
    let payload = std::fs::read_to_string(path)
        .map_err(|e| TopoMapError::SourceIo(path.to_path_buf(), e))?;
    map.read(&payload)
}

/// System: read `source` once when a config is present
fn load_topo_map_source(
    config: Res<TopoMapConfig>,
    mut load_state: ResMut<TopoMapLoadState>,
    map: Option<ResMut<TopoMap>>,
) {
    load_state.source_loaded = true;

    let config_dir = load_state.config_dir.clone().unwrap_or_default();
    let Some(path) = config.source_path(&config_dir) else {
        return;
    };
    let Some(mut map) = map else {
        tracing::warn!("TopoMap resource missing; cannot load {}", path.display());
        return;
    };

    match read_source(&mut map, &path) {
        Ok(()) => tracing::info!("Read topology source {}", path.display()),
        Err(e) => tracing::error!("{}", e),
    }
}

/// System: redraw the map through Bevy assets when it is dirty
fn redraw_topo_map(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut map: ResMut<TopoMap>,
) {
    if !map.needs_redraw() {
        return;
    }
    let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials);
    map.draw(&mut scene);
}
