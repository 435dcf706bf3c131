//! # TopoMap — Read / Draw Façade
//!
//! Owns the current geometry catalog and the meshes last published from it.
//!
//! ```text
//! read(payload)  →  GeometryCatalog (replaced whole, or untouched on error)
//! draw(scene)    →  dispose + remove previous meshes
//!                →  MeshBuilder over the catalog
//!                →  add one merged solid + one mesh per LineString
//! ```
//!
//! `read` and `draw` run to completion synchronously; callers serialize
//! access to a single instance.

use bevy::prelude::*;

use crate::config::{StyleConfig, TopoMapConfig};
use crate::error::Result;
use crate::mesh_builder::{MeshBuilder, RegionDiagnostic};
use crate::projection::Projector;
use crate::scene::{MapScene, MeshKind, PublishedMesh, SceneMesh};
use crate::topology::GeometryCatalog;

/// Summary of one `draw` pass
#[derive(Debug, Default)]
pub struct DrawReport {
    /// Meshes inserted into the scene
    pub published: usize,
    /// Meshes from the previous pass disposed and removed
    pub disposed: usize,
    /// Regions skipped and rings dropped, with the reason
    pub diagnostics: Vec<RegionDiagnostic>,
}

/// Topology map with replace-on-redraw publishing
#[derive(Resource)]
pub struct TopoMap<H: Send + Sync + 'static = PublishedMesh> {
    catalog: GeometryCatalog,
    builder: MeshBuilder,
    style: StyleConfig,
    published: Vec<H>,
    is_drawn: bool,
    needs_redraw: bool,
}

impl<H: Send + Sync + 'static> Default for TopoMap<H> {
    fn default() -> Self {
        Self::new(&TopoMapConfig::default())
    }
}

impl<H: Send + Sync + 'static> TopoMap<H> {
    /// Create an empty (unloaded) map from configuration
    pub fn new(config: &TopoMapConfig) -> Self {
        Self {
            catalog: GeometryCatalog::default(),
            builder: MeshBuilder::from(config),
            style: config.style.clone(),
            published: Vec::new(),
            is_drawn: false,
            needs_redraw: false,
        }
    }

    /// Move the projection center used by subsequent draws
    pub fn change_center_pos(&mut self, lat: f64, lon: f64) {
        self.builder.projector.set_center(lat, lon);
        self.needs_redraw = true;
    }

    /// Parse a topology payload, replacing the current catalog.
    ///
    /// On error the previous catalog is kept.
    pub fn read(&mut self, payload: &str) -> Result<()> {
        let catalog = GeometryCatalog::parse(payload)?;
        self.catalog = catalog;
        self.needs_redraw = true;
        Ok(())
    }

    /// Rebuild every mesh from the catalog and publish into `scene`,
    /// disposing whatever the previous draw published.
    ///
    /// With an empty catalog nothing is built or inserted.
    pub fn draw<S>(&mut self, scene: &mut S) -> DrawReport
    where
        S: MapScene<Handle = H>,
    {
        let mut report = DrawReport::default();

        for handle in self.published.drain(..) {
            scene.dispose(&handle);
            scene.remove(handle);
            report.disposed += 1;
        }
        self.needs_redraw = false;

        if self.catalog.is_empty() {
            return report;
        }

        let built = self.builder.build(&self.catalog);

        for line in built.lines {
            let handle = scene.add(SceneMesh::new(MeshKind::Line, line, self.style.clone()));
            self.published.push(handle);
        }
        if let Some(solid) = built.solid {
            let handle = scene.add(SceneMesh::new(MeshKind::Solid, solid, self.style.clone()));
            self.published.push(handle);
        }

        report.published = self.published.len();
        report.diagnostics = built.diagnostics;
        self.is_drawn = true;

        tracing::info!(
            "Drew {} regions into {} meshes ({} skipped, {} replaced)",
            self.catalog.regions().len(),
            report.published,
            report.diagnostics.len(),
            report.disposed
        );

        report
    }

    pub fn catalog(&self) -> &GeometryCatalog {
        &self.catalog
    }

    pub fn projector(&self) -> &Projector {
        &self.builder.projector
    }

    /// Handles of the meshes currently in the scene
    pub fn published(&self) -> &[H] {
        &self.published
    }

    /// True once a draw has published from a non-empty catalog
    pub fn is_drawn(&self) -> bool {
        self.is_drawn
    }

    /// True after `read` or `change_center_pos` until the next `draw`
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}
