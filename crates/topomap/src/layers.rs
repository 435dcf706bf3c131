//! # ECS Components for Published Map Meshes
//!
//! Tags entities spawned by [`crate::scene::BevyScene`] so systems can find,
//! inspect or hide the map at runtime.

use bevy::prelude::*;

use crate::scene::MeshKind;

/// Marks an entity as a mesh published by a [`crate::map::TopoMap`] draw
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct TopoMapMesh {
    /// Merged solid or a single line ribbon
    pub kind: MeshKind,
    /// Vertex count at publish time
    pub vertices: usize,
    /// Triangle count at publish time
    pub triangles: usize,
}

impl Default for TopoMapMesh {
    fn default() -> Self {
        Self {
            kind: MeshKind::Solid,
            vertices: 0,
            triangles: 0,
        }
    }
}
