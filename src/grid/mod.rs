//! Volumetric grid storage.
//!
//! A [`Grid`] is a dense, fixed-extent array of `u16` cell codes stored in one
//! flat buffer. Cells carry one channel (single-material model) or two
//! channels (two-material model: base and side texture).
//!
//! Storage order is x outer, then z, then y, then channel. Snapshots are a
//! byte-for-byte little-endian dump of this buffer.

pub mod generate;
pub mod snapshot;

use crate::error::{MesherError, Result};
use crate::types::CellPosition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How cells are interpreted by the mesher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellModel {
    /// One code per cell: 0 = empty, N = opaque cube with texture N.
    Single,
    /// Two codes per cell: base (top/bottom) and side (walls).
    TwoMaterial,
}

impl CellModel {
    /// Number of `u16` channels stored per cell.
    pub fn channels(&self) -> usize {
        match self {
            CellModel::Single => 1,
            CellModel::TwoMaterial => 2,
        }
    }
}

/// A texture channel of a cell.
///
/// Single-material grids have one channel; both variants read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Base,
    Side,
}

/// The decoded value of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Single { texture: u16 },
    TwoMaterial { base: u16, side: u16 },
}

impl Cell {
    /// True if the cell has no texture in any channel.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Single { texture } => *texture == 0,
            Cell::TwoMaterial { base, side } => *base == 0 && *side == 0,
        }
    }
}

/// The extent of a grid: minimum corner and size along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub min: [i32; 3],
    pub size: [u32; 3],
}

impl GridShape {
    pub fn new(min: [i32; 3], size: [u32; 3]) -> Self {
        Self { min, size }
    }

    /// x and z in `[-radius, radius)`, y in `[0, height)`.
    ///
    /// A radius too large for `i32` coordinates yields a shape that fails
    /// [`validate`](Self::validate); use [`try_floor`](Self::try_floor) to
    /// get the error up front.
    pub fn floor(radius: u32, height: u32) -> Self {
        let r = half_extent(radius);
        Self {
            min: [-r, 0, -r],
            size: [radius.saturating_mul(2), height, radius.saturating_mul(2)],
        }
    }

    /// All three axes in `[-radius, radius)`.
    pub fn cube(radius: u32) -> Self {
        let r = half_extent(radius);
        Self {
            min: [-r, -r, -r],
            size: [radius.saturating_mul(2); 3],
        }
    }

    /// [`floor`](Self::floor), validated.
    pub fn try_floor(radius: u32, height: u32) -> Result<Self> {
        let shape = Self::floor(radius, height);
        shape.validate()?;
        Ok(shape)
    }

    /// [`cube`](Self::cube), validated.
    pub fn try_cube(radius: u32) -> Result<Self> {
        let shape = Self::cube(radius);
        shape.validate()?;
        Ok(shape)
    }

    /// Exclusive maximum corner.
    pub fn max(&self) -> [i32; 3] {
        [
            self.min[0] + self.size[0] as i32,
            self.min[1] + self.size[1] as i32,
            self.min[2] + self.size[2] as i32,
        ]
    }

    /// Number of cells, or `None` on overflow.
    pub fn cell_count(&self) -> Option<usize> {
        (self.size[0] as usize)
            .checked_mul(self.size[1] as usize)?
            .checked_mul(self.size[2] as usize)
    }

    /// Check the shape is non-empty and addressable with `i32` coordinates.
    pub fn validate(&self) -> Result<()> {
        if self.size.iter().any(|&s| s == 0) {
            return Err(MesherError::InvalidGrid(format!(
                "grid size {:?} has a zero-length axis",
                self.size
            )));
        }
        for axis in 0..3 {
            if self.size[axis] > i32::MAX as u32
                || (self.min[axis] as i64) + (self.size[axis] as i64) > i32::MAX as i64
            {
                return Err(MesherError::InvalidGrid(format!(
                    "axis {} extends past i32 range",
                    axis
                )));
            }
        }
        if self.cell_count().is_none() {
            return Err(MesherError::InvalidGrid(format!(
                "grid size {:?} overflows the cell count",
                self.size
            )));
        }
        Ok(())
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        self.local(pos).is_some()
    }

    /// Convert to zero-based local coordinates.
    fn local(&self, pos: CellPosition) -> Option<[usize; 3]> {
        let lx = pos.x as i64 - self.min[0] as i64;
        let ly = pos.y as i64 - self.min[1] as i64;
        let lz = pos.z as i64 - self.min[2] as i64;
        if lx < 0
            || ly < 0
            || lz < 0
            || lx >= self.size[0] as i64
            || ly >= self.size[1] as i64
            || lz >= self.size[2] as i64
        {
            return None;
        }
        Some([lx as usize, ly as usize, lz as usize])
    }

    /// Iterate all positions in scan order: x outer, y middle, z inner.
    pub fn positions(&self) -> impl Iterator<Item = CellPosition> + '_ {
        let [min_x, min_y, min_z] = self.min;
        let [max_x, max_y, max_z] = self.max();
        (min_x..max_x).flat_map(move |x| {
            (min_y..max_y).flat_map(move |y| (min_z..max_z).map(move |z| CellPosition::new(x, y, z)))
        })
    }
}

/// A dense voxel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: GridShape,
    model: CellModel,
    cells: Vec<u16>,
}

impl Grid {
    /// Create a zero-filled (all empty) grid.
    pub fn new(shape: GridShape, model: CellModel) -> Result<Self> {
        shape.validate()?;
        let len = buffer_len(&shape, model)?;
        Ok(Self {
            shape,
            model,
            cells: vec![0; len],
        })
    }

    /// Wrap an existing buffer in storage order.
    pub fn from_cells(shape: GridShape, model: CellModel, cells: Vec<u16>) -> Result<Self> {
        shape.validate()?;
        let len = buffer_len(&shape, model)?;
        if cells.len() != len {
            return Err(MesherError::InvalidGrid(format!(
                "expected {} codes for shape {:?}, got {}",
                len,
                shape.size,
                cells.len()
            )));
        }
        Ok(Self { shape, model, cells })
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn model(&self) -> CellModel {
        self.model
    }

    pub fn channels(&self) -> usize {
        self.model.channels()
    }

    /// The raw code buffer in storage order.
    pub fn codes(&self) -> &[u16] {
        &self.cells
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        self.shape.contains(pos)
    }

    fn index(&self, pos: CellPosition, channel: Channel) -> Option<usize> {
        let [lx, ly, lz] = self.shape.local(pos)?;
        let sy = self.shape.size[1] as usize;
        let sz = self.shape.size[2] as usize;
        let channels = self.channels();
        let c = match (self.model, channel) {
            (CellModel::TwoMaterial, Channel::Side) => 1,
            _ => 0,
        };
        Some(((lx * sz + lz) * sy + ly) * channels + c)
    }

    /// Read a channel code. Out-of-range positions read as empty (0).
    pub fn code(&self, pos: CellPosition, channel: Channel) -> u16 {
        self.index(pos, channel).map(|i| self.cells[i]).unwrap_or(0)
    }

    /// Write a channel code.
    pub fn set_code(&mut self, pos: CellPosition, channel: Channel, code: u16) -> Result<()> {
        let index = self.index(pos, channel).ok_or_else(|| {
            MesherError::InvalidGrid(format!("position {:?} is outside the grid", pos))
        })?;
        self.cells[index] = code;
        Ok(())
    }

    /// Write a whole cell.
    pub fn set_cell(&mut self, pos: CellPosition, cell: Cell) -> Result<()> {
        match cell {
            Cell::Single { texture } => self.set_code(pos, Channel::Base, texture),
            Cell::TwoMaterial { base, side } => {
                if self.model != CellModel::TwoMaterial {
                    return Err(MesherError::InvalidGrid(
                        "two-material cell written to a single-material grid".to_string(),
                    ));
                }
                self.set_code(pos, Channel::Base, base)?;
                self.set_code(pos, Channel::Side, side)
            }
        }
    }

    /// Read a whole cell, or `None` when out of range.
    pub fn cell(&self, pos: CellPosition) -> Option<Cell> {
        if !self.contains(pos) {
            return None;
        }
        Some(match self.model {
            CellModel::Single => Cell::Single {
                texture: self.code(pos, Channel::Base),
            },
            CellModel::TwoMaterial => Cell::TwoMaterial {
                base: self.code(pos, Channel::Base),
                side: self.code(pos, Channel::Side),
            },
        })
    }

    /// True if the channel is empty at `pos`, including out-of-range positions.
    pub fn is_empty_at(&self, pos: CellPosition, channel: Channel) -> bool {
        self.code(pos, channel) == 0
    }

    /// True if any channel is non-empty at `pos`.
    pub fn is_occupied(&self, pos: CellPosition) -> bool {
        self.cell(pos).map(|c| !c.is_empty()).unwrap_or(false)
    }

    /// Count cells per code for one channel, skipping empty cells.
    pub fn code_histogram(&self, channel: Channel) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for pos in self.shape.positions() {
            let code = self.code(pos, channel);
            if code != 0 {
                *counts.entry(code).or_insert(0) += 1;
            }
        }
        counts
    }
}

fn half_extent(radius: u32) -> i32 {
    i32::try_from(radius).unwrap_or(i32::MAX)
}

fn buffer_len(shape: &GridShape, model: CellModel) -> Result<usize> {
    shape
        .cell_count()
        .and_then(|n| n.checked_mul(model.channels()))
        .ok_or_else(|| MesherError::InvalidGrid(format!("grid size {:?} overflows", shape.size)))
}
