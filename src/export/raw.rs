//! Raw mesh data export for custom rendering.
//!
//! The vertex buffer is written as little-endian `f32`s, 8 per vertex, ready
//! for a single GPU upload. A JSON manifest next to it lists the texture
//! groups and the draw call of each group.

use crate::error::Result;
use crate::mesher::geometry::{FLOATS_PER_VERTEX, VERTICES_PER_QUAD};
use crate::mesher::{DrawCall, MesherOutput, TextureGroup, UvMapping};
use crate::types::BoundingBox;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw mesh data for custom use.
#[derive(Debug, Clone)]
pub struct RawMeshData {
    /// Interleaved `[x, y, z, u, v, r, g, b]` vertex floats.
    pub vertices: Vec<f32>,
    /// Texture groups in draw order.
    pub groups: Vec<TextureGroup>,
    pub draw_calls: Vec<DrawCall>,
    pub uv_mapping: UvMapping,
    pub bounds: Option<BoundingBox>,
}

/// Layout and batching of a raw vertex buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawManifest {
    pub floats_per_vertex: usize,
    pub vertices_per_quad: usize,
    pub vertex_count: usize,
    pub quad_count: usize,
    pub uv_mapping: UvMapping,
    pub groups: Vec<TextureGroup>,
    pub draw_calls: Vec<DrawCall>,
    pub bounds: Option<BoundingBox>,
}

/// Export mesh as raw data.
pub fn export_raw(output: &MesherOutput) -> RawMeshData {
    RawMeshData {
        vertices: output.mesh.interleaved(),
        groups: output.batches.groups.clone(),
        draw_calls: output.batches.draw_calls(),
        uv_mapping: output.uv_mapping,
        bounds: output.bounds,
    }
}

impl RawMeshData {
    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Get the number of quads.
    pub fn quad_count(&self) -> usize {
        self.vertex_count() / VERTICES_PER_QUAD
    }

    /// The vertex buffer as little-endian bytes.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.vertices.len() * 4);
        for value in &self.vertices {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    pub fn manifest(&self) -> RawManifest {
        RawManifest {
            floats_per_vertex: FLOATS_PER_VERTEX,
            vertices_per_quad: VERTICES_PER_QUAD,
            vertex_count: self.vertex_count(),
            quad_count: self.quad_count(),
            uv_mapping: self.uv_mapping,
            groups: self.groups.clone(),
            draw_calls: self.draw_calls.clone(),
            bounds: self.bounds,
        }
    }

    pub fn manifest_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.manifest())?)
    }

    /// Write `<name>.bin` and `<name>.json` into `dir`. Returns both paths.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P, name: &str) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        let bin_path = dir.join(format!("{}.bin", name));
        let json_path = dir.join(format!("{}.json", name));
        std::fs::write(&bin_path, self.vertex_bytes())?;
        std::fs::write(&json_path, self.manifest_json()?)?;
        log::info!(
            "Wrote {} vertices to {:?} and manifest to {:?}",
            self.vertex_count(),
            bin_path,
            json_path
        );
        Ok((bin_path, json_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellModel, Channel, Grid, GridShape};
    use crate::mesher::Mesher;
    use crate::types::CellPosition;

    fn two_cells() -> MesherOutput {
        let mut grid = Grid::new(GridShape::cube(2), CellModel::Single).unwrap();
        grid.set_code(CellPosition::new(0, 0, 0), Channel::Base, 1).unwrap();
        grid.set_code(CellPosition::new(-2, 0, 0), Channel::Base, 2).unwrap();
        Mesher::new().mesh(&grid)
    }

    #[test]
    fn test_export_raw_layout() {
        let raw = export_raw(&two_cells());
        assert_eq!(raw.vertex_count(), 72);
        assert_eq!(raw.quad_count(), 12);
        assert_eq!(raw.vertex_bytes().len(), 72 * 8 * 4);
        assert_eq!(&raw.vertex_bytes()[..4], &raw.vertices[0].to_le_bytes());
        assert_eq!(raw.draw_calls.len(), 2);
        assert_eq!(raw.draw_calls[1].first_vertex, 36);
        assert_eq!(raw.draw_calls[1].vertex_count, 36);
    }

    #[test]
    fn test_manifest_json() {
        let raw = export_raw(&two_cells());
        let json = raw.manifest_json().unwrap();
        let manifest: RawManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest, raw.manifest());
        assert_eq!(manifest.floats_per_vertex, 8);
        assert_eq!(manifest.groups[1].start_quad, 6);
        assert!(json.contains("\"per_group_texture\""));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let raw = export_raw(&two_cells());
        let (bin, json) = raw.write_to_dir(dir.path(), "mesh").unwrap();

        assert_eq!(std::fs::read(bin).unwrap().len(), 72 * 32);
        assert!(std::fs::read_to_string(json).unwrap().contains("draw_calls"));
    }
}
