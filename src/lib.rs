//! # Voxel Mesher
//!
//! A Rust library for turning dense voxel grids into textured triangle meshes.
//!
//! ## Overview
//!
//! A [`Grid`] holds `u16` texture codes per cell. The [`Mesher`] walks it,
//! drops every face hidden by a neighbor, and emits the rest as shaded quads
//! with UVs into a 16x16-tile atlas (or per-texture images). Quads are grouped
//! by texture so each group is one contiguous range and one draw call.
//!
//! ## Quick Start
//!
//! ```ignore
//! use voxel_mesher::{grid::snapshot, export_raw, GridShape, Mesher, MesherConfig};
//!
//! let config = MesherConfig::map_variant();
//! let shape = GridShape::floor(128, 16);
//! let grid = snapshot::load_from_path("map.bin", shape, config.cell_model)?;
//!
//! let output = Mesher::with_config(config).mesh(&grid);
//! for call in output.batches.draw_calls() {
//!     // bind texture of group `call.group`, draw `call.vertex_count` vertices
//!     // starting at `call.first_vertex`
//! }
//!
//! let raw = export_raw(&output);
//! raw.write_to_dir("out", "map")?;
//! ```

pub mod animation;
pub mod atlas;
pub mod camera;
pub mod context;
pub mod error;
pub mod export;
pub mod grid;
pub mod mesher;
pub mod types;

// Re-export main types for convenience
pub use animation::Wobble;
pub use atlas::TextureAtlas;
pub use camera::{CameraInput, CameraPose, CameraSettings};
pub use context::WorldContext;
pub use error::{MesherError, Result};
pub use export::obj::{export_obj, ObjExport};
pub use export::raw::{export_raw, RawManifest, RawMeshData};
pub use grid::{Cell, CellModel, Channel, Grid, GridShape};
pub use mesher::{
    BatchDescriptor, DrawCall, FaceShades, Mesh, Mesher, MesherConfig, MesherOutput,
    ShadingModel, TextureGroup, UvMapping, Vertex,
};
pub use types::{Axis, BoundingBox, CellPosition, Face};

/// Load a grid snapshot, falling back to an empty grid when the file cannot be read.
pub fn load_grid<P: AsRef<std::path::Path>>(
    path: P,
    shape: GridShape,
    model: CellModel,
) -> Result<Grid> {
    grid::snapshot::load_or_else(path, shape, model, || Grid::new(shape, model))
}

/// Load a texture atlas image from a file path.
pub fn load_atlas<P: AsRef<std::path::Path>>(path: P) -> Result<TextureAtlas> {
    TextureAtlas::from_path(path)
}
