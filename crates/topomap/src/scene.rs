//! # Scene Insertion Boundary
//!
//! The map publishes finished meshes through [`MapScene`], an opaque scene
//! handle that can add a mesh, free its geometry, and detach it again.
//! [`BevyScene`] implements it over Bevy `Commands` and asset storage.
//!
//! ## Table of Contents
//! 1. SceneMesh — Mesh ready for publishing
//! 2. MapScene — Scene handle trait
//! 3. Bevy interop (MeshBuffers → Mesh, BevyScene)

use bevy::prelude::*;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::asset::RenderAssetUsages;
use std::f32::consts::FRAC_PI_2;

use crate::config::StyleConfig;
use crate::layers::TopoMapMesh;
use crate::mesh_builder::MeshBuffers;

// ============================================================================
// 1. SceneMesh — Mesh ready for publishing
// ============================================================================

/// What a published mesh was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MeshKind {
    /// Merged extrusion of every Polygon / MultiPolygon region
    Solid,
    /// Ribbon of one LineString region
    Line,
}

/// A built mesh plus how it should be placed and shaded
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub kind: MeshKind,
    pub buffers: MeshBuffers,
    pub style: StyleConfig,
    /// Shape space → scene: the drawing plane becomes the ground plane
    pub transform: Transform,
}

impl SceneMesh {
    pub fn new(kind: MeshKind, buffers: MeshBuffers, style: StyleConfig) -> Self {
        Self {
            kind,
            buffers,
            style,
            transform: ground_plane_transform(),
        }
    }
}

/// Rotate the XY drawing plane onto XZ with extrusion pointing up (+Y).
/// North (+Y in the drawing plane) ends up at -Z.
pub fn ground_plane_transform() -> Transform {
    Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))
}

// ============================================================================
// 2. MapScene — Scene handle trait
// ============================================================================

/// Scene graph the map publishes into
pub trait MapScene {
    /// Handle identifying a published mesh
    type Handle;

    /// Insert a mesh and return its handle
    fn add(&mut self, mesh: SceneMesh) -> Self::Handle;

    /// Free the geometry behind a published mesh
    fn dispose(&mut self, handle: &Self::Handle);

    /// Detach a published mesh from the scene
    fn remove(&mut self, handle: Self::Handle);
}

// ============================================================================
// 3. Bevy interop (MeshBuffers → Mesh, BevyScene)
// ============================================================================

impl From<&MeshBuffers> for Mesh {
    fn from(buffers: &MeshBuffers) -> Self {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffers.positions.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, buffers.normals.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, buffers.uvs.clone());
        mesh.insert_indices(Indices::U32(buffers.indices.clone()));
        mesh
    }
}

/// Unlit, double-sided fill material for map meshes
pub fn map_material(style: &StyleConfig) -> StandardMaterial {
    StandardMaterial {
        base_color: style.fill_color(),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: if style.transparent {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}

/// Entity and assets behind one published Bevy mesh
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMesh {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// [`MapScene`] over Bevy commands and asset collections
pub struct BevyScene<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
}

impl<'a, 'w, 's> BevyScene<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
    ) -> Self {
        Self { commands, meshes, materials }
    }
}

impl MapScene for BevyScene<'_, '_, '_> {
    type Handle = PublishedMesh;

    fn add(&mut self, mesh: SceneMesh) -> PublishedMesh {
        let mesh_handle = self.meshes.add(Mesh::from(&mesh.buffers));
        let material = self.materials.add(map_material(&mesh.style));

        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh_handle.clone()),
                MeshMaterial3d(material.clone()),
                mesh.transform,
                TopoMapMesh {
                    kind: mesh.kind,
                    vertices: mesh.buffers.vertex_count(),
                    triangles: mesh.buffers.triangle_count(),
                },
            ))
            .id();

        PublishedMesh {
            entity,
            mesh: mesh_handle,
            material,
        }
    }

    fn dispose(&mut self, handle: &PublishedMesh) {
        self.meshes.remove(handle.mesh.id());
        self.materials.remove(handle.material.id());
    }

    fn remove(&mut self, handle: PublishedMesh) {
        self.commands.entity(handle.entity).despawn();
    }
}
