//! Procedural grid fills used when no snapshot is available.
//!
//! All fills are seeded so the same seed always yields the same grid.

use super::{CellModel, Channel, Grid, GridShape};
use crate::error::{MesherError, Result};
use crate::types::CellPosition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default number of distinct codes for the floor fill (ten atlas rows).
pub const DEFAULT_FLOOR_CODES: u16 = 160;

/// Fill random columns of single-material cubes.
///
/// Each (x, z) column is filled from the bottom up with codes in
/// `1..=codes`; after every cell the column stops with probability 1/10.
pub fn random_columns(shape: GridShape, codes: u16, seed: u64) -> Result<Grid> {
    check_codes(codes)?;
    let mut grid = Grid::new(shape, CellModel::Single)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let [min_x, min_y, min_z] = shape.min;
    let [max_x, max_y, max_z] = shape.max();

    for x in min_x..max_x {
        for z in min_z..max_z {
            for y in min_y..max_y {
                let code = rng.gen_range(1..=codes);
                grid.set_code(CellPosition::new(x, y, z), Channel::Base, code)?;
                if rng.gen_range(0..10) == 0 {
                    break;
                }
            }
        }
    }

    Ok(grid)
}

/// Fill the bottom layer with two-material cells.
///
/// Every (x, z) gets a random base code in `1..=codes`; half of them also
/// get a random side code, turning the floor tile into a cube.
pub fn random_floor(shape: GridShape, codes: u16, seed: u64) -> Result<Grid> {
    check_codes(codes)?;
    let mut grid = Grid::new(shape, CellModel::TwoMaterial)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let [min_x, min_y, min_z] = shape.min;
    let [max_x, _, max_z] = shape.max();

    for x in min_x..max_x {
        for z in min_z..max_z {
            let pos = CellPosition::new(x, min_y, z);
            grid.set_code(pos, Channel::Base, rng.gen_range(1..=codes))?;
            if rng.gen_range(0..2) == 0 {
                continue;
            }
            grid.set_code(pos, Channel::Side, rng.gen_range(1..=codes))?;
        }
    }

    Ok(grid)
}

/// Pick the fill matching a cell model.
pub fn random_for_model(shape: GridShape, model: CellModel, codes: u16, seed: u64) -> Result<Grid> {
    match model {
        CellModel::Single => random_columns(shape, codes, seed),
        CellModel::TwoMaterial => random_floor(shape, codes, seed),
    }
}

fn check_codes(codes: u16) -> Result<()> {
    if codes == 0 {
        return Err(MesherError::InvalidGrid(
            "random fill needs at least one texture code".to_string(),
        ));
    }
    Ok(())
}
