//! Mesh generation from voxel grids.
//!
//! This module walks a grid, keeps the faces that are not hidden by a
//! neighbor, and emits them as textured, shaded quads grouped by texture.

pub mod batch;
pub mod face_culler;
pub mod geometry;
pub mod shading;

pub use batch::{BatchBuilder, BatchDescriptor, DrawCall, TextureGroup};
pub use geometry::{FaceTemplate, Mesh, Vertex};
pub use shading::{FaceShades, FalloffSettings, ShadingModel};

use crate::atlas::{tile_region, AtlasRegion};
use crate::grid::{CellModel, Channel, Grid};
use crate::types::{BoundingBox, CellPosition};
use face_culler::{FaceCuller, VisibleFace};
use serde::{Deserialize, Serialize};

/// Number of per-texture groups in the cube variant.
pub const CUBE_GROUP_COUNT: usize = 16;

/// How template UVs are mapped into texture space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvMapping {
    /// Map into the tile of the 16x16 atlas selected by the face's code.
    Atlas,
    /// Keep UVs in `[0, 1]`; every group binds its own texture.
    PerGroupTexture,
}

/// Main mesher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Cell model of grids loaded for this config.
    pub cell_model: CellModel,
    /// UV mapping of emitted faces.
    pub uv_mapping: UvMapping,
    /// Vertex color model.
    pub shading: ShadingModel,
    /// Texture labels. Single-material grids get one group per label, for
    /// codes `1..=len`; two-material grids use the first label for their
    /// single atlas group.
    pub group_labels: Vec<String>,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self::cube_variant()
    }
}

impl MesherConfig {
    /// Single-material cubes, one texture file per code, flat cube shading.
    pub fn cube_variant() -> Self {
        Self {
            cell_model: CellModel::Single,
            uv_mapping: UvMapping::PerGroupTexture,
            shading: ShadingModel::flat(FaceShades::CUBE),
            group_labels: (1..=CUBE_GROUP_COUNT)
                .map(|i| format!("textures/{:02}.png", i))
                .collect(),
        }
    }

    /// Two-material map over a single atlas, flat map shading.
    pub fn map_variant() -> Self {
        Self {
            cell_model: CellModel::TwoMaterial,
            uv_mapping: UvMapping::Atlas,
            shading: ShadingModel::flat(FaceShades::MAP),
            group_labels: vec!["atlas.png".to_string()],
        }
    }

    /// Two-material map with distance falloff and marched shadows.
    pub fn map_variant_with_shadows() -> Self {
        Self {
            shading: ShadingModel::distance_falloff(FaceShades::MAP),
            ..Self::map_variant()
        }
    }

    pub fn with_cell_model(mut self, cell_model: CellModel) -> Self {
        self.cell_model = cell_model;
        self
    }

    pub fn with_uv_mapping(mut self, uv_mapping: UvMapping) -> Self {
        self.uv_mapping = uv_mapping;
        self
    }

    pub fn with_shading(mut self, shading: ShadingModel) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_group_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Use `count` generated labels.
    pub fn with_group_count(self, count: usize) -> Self {
        self.with_group_labels((1..=count).map(|i| format!("texture_{}", i)))
    }

    /// Label of the single group of a two-material mesh.
    pub fn atlas_label(&self) -> &str {
        self.group_labels
            .first()
            .map(String::as_str)
            .unwrap_or("atlas")
    }

    /// Read a config from JSON.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Output from the mesher.
#[derive(Debug, Clone)]
pub struct MesherOutput {
    /// Emitted quads, grouped by texture.
    pub mesh: Mesh,
    /// One quad range per texture group.
    pub batches: BatchDescriptor,
    /// How UVs were mapped.
    pub uv_mapping: UvMapping,
    /// Bounding box of the emitted geometry, `None` when nothing was emitted.
    pub bounds: Option<BoundingBox>,
}

impl MesherOutput {
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    pub fn quad_count(&self) -> usize {
        self.mesh.quad_count()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// The vertices of one texture group.
    pub fn group_vertices(&self, group: usize) -> Option<&[Vertex]> {
        let range = self.batches.get(group)?.vertex_range();
        self.mesh.vertices.get(range)
    }
}

/// The main mesher struct.
#[derive(Debug, Clone, Default)]
pub struct Mesher {
    config: MesherConfig,
}

impl Mesher {
    /// Create a new mesher with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesher with custom configuration.
    pub fn with_config(config: MesherConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Generate the mesh of a grid.
    ///
    /// The grid's own cell model decides the emission rules. Cells are
    /// scanned x outer, y middle, z inner, and faces are emitted bottom, top,
    /// left, right, back, front.
    pub fn mesh(&self, grid: &Grid) -> MesherOutput {
        if grid.model() != self.config.cell_model {
            log::warn!(
                "Grid uses {:?} cells but the config expects {:?}; meshing with the grid's model",
                grid.model(),
                self.config.cell_model
            );
        }

        let culler = FaceCuller::new(grid);
        let mut emitter = Emitter {
            grid,
            config: &self.config,
            mesh: Mesh::new(),
            batch: BatchBuilder::new(),
        };

        match grid.model() {
            CellModel::Single => emitter.emit_per_code(&culler),
            CellModel::TwoMaterial => emitter.emit_atlas(&culler),
        }

        let mesh = emitter.mesh;
        let batches = emitter.batch.finish();
        let bounds = BoundingBox::from_points(mesh.vertices.iter().map(|v| v.position));

        log::debug!(
            "Meshed {:?} grid: {} quads in {} groups",
            grid.model(),
            mesh.quad_count(),
            batches.len()
        );

        MesherOutput {
            mesh,
            batches,
            uv_mapping: self.config.uv_mapping,
            bounds,
        }
    }
}

struct Emitter<'a> {
    grid: &'a Grid,
    config: &'a MesherConfig,
    mesh: Mesh,
    batch: BatchBuilder,
}

impl<'a> Emitter<'a> {
    /// One group per code. Cells are bucketed in scan order first, which
    /// yields the same order as rescanning the grid once per code.
    fn emit_per_code(&mut self, culler: &FaceCuller) {
        let config = self.config;
        let grid = self.grid;
        let labels = &config.group_labels;
        let mut buckets: Vec<Vec<CellPosition>> = vec![Vec::new(); labels.len()];
        let mut skipped = 0usize;

        for pos in grid.shape().positions() {
            let code = grid.code(pos, Channel::Base);
            if code == 0 {
                continue;
            }
            match buckets.get_mut(code as usize - 1) {
                Some(bucket) => bucket.push(pos),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!(
                "Skipped {} cells with codes above the {} configured texture groups",
                skipped,
                labels.len()
            );
        }

        for (label, bucket) in labels.iter().zip(&buckets) {
            self.batch.begin_group(label.as_str());
            for &pos in bucket {
                for face in culler.visible_faces(pos) {
                    self.emit(pos, &face);
                }
            }
            self.batch.end_group();
        }
    }

    /// One group covering the whole atlas.
    fn emit_atlas(&mut self, culler: &FaceCuller) {
        let grid = self.grid;
        self.batch.begin_group(self.config.atlas_label());
        for pos in grid.shape().positions() {
            for face in culler.visible_faces(pos) {
                self.emit(pos, &face);
            }
        }
        self.batch.end_group();
    }

    fn emit(&mut self, pos: CellPosition, face: &VisibleFace) {
        let region = match self.config.uv_mapping {
            UvMapping::Atlas => tile_region(face.code as u32 - 1),
            UvMapping::PerGroupTexture => AtlasRegion::FULL,
        };
        let color = self.config.shading.color(self.grid, pos, face.face);
        self.mesh.push_face(face.template, pos, &region, color);
        self.batch.record_quad();
    }
}
