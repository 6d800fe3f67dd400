//! Flat binary grid snapshots.
//!
//! A snapshot is the grid's code buffer written as little-endian `u16`s in
//! storage order, with no header. Its length must match the grid shape
//! exactly.

use super::{CellModel, Grid, GridShape};
use crate::error::{MesherError, Result};
use std::path::Path;

/// Expected snapshot length in bytes for a shape and cell model.
pub fn snapshot_len(shape: &GridShape, model: CellModel) -> Result<usize> {
    shape
        .cell_count()
        .and_then(|n| n.checked_mul(model.channels()))
        .and_then(|n| n.checked_mul(2))
        .ok_or_else(|| MesherError::InvalidGrid(format!("grid size {:?} overflows", shape.size)))
}

/// Decode a snapshot from bytes.
pub fn load_from_bytes(data: &[u8], shape: GridShape, model: CellModel) -> Result<Grid> {
    shape.validate()?;
    let expected = snapshot_len(&shape, model)?;
    if data.len() != expected {
        return Err(MesherError::SnapshotSize {
            expected,
            actual: data.len(),
        });
    }

    let cells = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Grid::from_cells(shape, model, cells)
}

/// Load a snapshot file.
pub fn load_from_path<P: AsRef<Path>>(path: P, shape: GridShape, model: CellModel) -> Result<Grid> {
    let data = std::fs::read(path)?;
    load_from_bytes(&data, shape, model)
}

/// Load a snapshot file, falling back when it cannot be read.
///
/// Only read failures fall back. A file that exists but has the wrong size
/// is still an error.
pub fn load_or_else<P, F>(path: P, shape: GridShape, model: CellModel, fallback: F) -> Result<Grid>
where
    P: AsRef<Path>,
    F: FnOnce() -> Result<Grid>,
{
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(data) => {
            let grid = load_from_bytes(&data, shape, model)?;
            log::info!("Loaded grid snapshot {:?} ({} bytes)", path, data.len());
            Ok(grid)
        }
        Err(e) => {
            log::warn!("Grid snapshot {:?} unavailable ({}), using fallback grid", path, e);
            fallback()
        }
    }
}

/// Encode a grid as snapshot bytes.
pub fn to_bytes(grid: &Grid) -> Vec<u8> {
    grid.codes().iter().flat_map(|code| code.to_le_bytes()).collect()
}

/// Write a grid snapshot file.
pub fn save_to_path<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    std::fs::write(path, to_bytes(grid))?;
    Ok(())
}
