//! # Eustress TopoMap — Topology Maps as Extruded Landmass Meshes
//!
//! Decodes a compact topology document (delta-coded arcs shared between
//! regions), stitches each region's arcs into boundary rings, projects them
//! onto a drawing plane and extrudes them into Bevy meshes.
//!
//! ## Pipeline
//! ```text
//! payload ─▶ arcs (decode) ─▶ topology (catalog) ─▶ ring (assemble + project)
//!         ─▶ mesh_builder (extrude / ribbon / merge) ─▶ scene (publish)
//! ```
//!
//! ## Modules
//! - `error` — Crate error type
//! - `config` — Parse `topomap.toml` configuration
//! - `arcs` — Delta-coded arc decoding
//! - `topology` — Payload parsing and the geometry catalog
//! - `projection` — lon/lat → drawing-plane projection
//! - `ring` — Arc references → continuous rings
//! - `mesh_builder` — Rings → extruded solids and ribbons
//! - `scene` — Scene handle trait and its Bevy implementation
//! - `map` — `TopoMap` read/draw façade
//! - `layers` — ECS components on published meshes
//! - `plugin` — Bevy plugin registration and systems

pub mod error;
pub mod config;
pub mod arcs;
pub mod topology;
pub mod projection;
pub mod ring;
pub mod mesh_builder;
pub mod scene;
pub mod map;
pub mod layers;
pub mod plugin;

pub use config::TopoMapConfig;
pub use error::{Result, TopoMapError};
pub use layers::TopoMapMesh;
pub use map::{DrawReport, TopoMap};
pub use plugin::{load_topo_map_config, TopoMapPlugin};
pub use scene::{BevyScene, MapScene, SceneMesh};
pub use topology::{ArcRef, GeometryCatalog, RegionGeometry};
