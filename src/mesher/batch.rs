//! Texture batching.
//!
//! Quads are emitted group by group, so each texture group owns one
//! contiguous `[start_quad, end_quad)` range of the vertex buffer and can be
//! drawn with a single call after binding its texture.

use super::geometry::VERTICES_PER_QUAD;
use crate::error::{MesherError, Result};
use serde::{Deserialize, Serialize};

/// A contiguous range of quads sharing one texture binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureGroup {
    /// Texture (file name or atlas label) bound for this range.
    pub label: String,
    /// First quad of the range.
    pub start_quad: u32,
    /// One past the last quad of the range.
    pub end_quad: u32,
}

impl TextureGroup {
    pub fn quad_count(&self) -> u32 {
        self.end_quad.saturating_sub(self.start_quad)
    }

    pub fn is_empty(&self) -> bool {
        self.quad_count() == 0
    }

    /// Vertex indices covered by this group.
    pub fn vertex_range(&self) -> std::ops::Range<usize> {
        self.start_quad as usize * VERTICES_PER_QUAD..self.end_quad as usize * VERTICES_PER_QUAD
    }
}

/// A draw call: bind group `group`'s texture, draw `vertex_count` vertices
/// starting at `first_vertex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCall {
    pub group: usize,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

/// The ordered texture groups of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDescriptor {
    pub groups: Vec<TextureGroup>,
}

impl BatchDescriptor {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TextureGroup> {
        self.groups.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureGroup> {
        self.groups.iter()
    }

    /// Total quads covered by all groups.
    pub fn total_quads(&self) -> u32 {
        self.groups.last().map(|g| g.end_quad).unwrap_or(0)
    }

    /// Draw calls for every non-empty group, in group order.
    ///
    /// The count passed to the draw is the number of vertices in the range,
    /// not its end index.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.is_empty())
            .map(|(group, g)| DrawCall {
                group,
                first_vertex: g.start_quad * VERTICES_PER_QUAD as u32,
                vertex_count: g.quad_count() * VERTICES_PER_QUAD as u32,
            })
            .collect()
    }

    /// Check that the groups tile `[0, total_quads)` in order with no gaps
    /// or overlaps.
    pub fn validate(&self, total_quads: u32) -> Result<()> {
        let mut expected_start = 0;
        for (i, group) in self.groups.iter().enumerate() {
            if group.start_quad != expected_start {
                return Err(MesherError::InvalidBatch(format!(
                    "group {} ({}) starts at quad {}, expected {}",
                    i, group.label, group.start_quad, expected_start
                )));
            }
            if group.end_quad < group.start_quad {
                return Err(MesherError::InvalidBatch(format!(
                    "group {} ({}) ends at {} before it starts at {}",
                    i, group.label, group.end_quad, group.start_quad
                )));
            }
            expected_start = group.end_quad;
        }
        if expected_start != total_quads {
            return Err(MesherError::InvalidBatch(format!(
                "groups cover {} quads, mesh has {}",
                expected_start, total_quads
            )));
        }
        Ok(())
    }
}

/// Records group boundaries while quads are appended.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    groups: Vec<TextureGroup>,
    open: Option<(String, u32)>,
    quads: u32,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a group at the current quad. Closes any group still open.
    pub fn begin_group(&mut self, label: impl Into<String>) {
        self.end_group();
        self.open = Some((label.into(), self.quads));
    }

    /// Count one emitted quad.
    pub fn record_quad(&mut self) {
        self.quads += 1;
    }

    /// Close the open group at the current quad.
    pub fn end_group(&mut self) {
        if let Some((label, start_quad)) = self.open.take() {
            self.groups.push(TextureGroup {
                label,
                start_quad,
                end_quad: self.quads,
            });
        }
    }

    pub fn quad_count(&self) -> u32 {
        self.quads
    }

    pub fn finish(mut self) -> BatchDescriptor {
        self.end_group();
        BatchDescriptor {
            groups: self.groups,
        }
    }
}
