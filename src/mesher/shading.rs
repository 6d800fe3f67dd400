//! Per-face vertex shading.
//!
//! Colors are RGB multipliers baked into each vertex. The flat model gives
//! each face direction a fixed gray level. The falloff model darkens cells
//! with distance from the grid origin and marches a fixed light direction
//! through the grid to darken faces in shadow.

use crate::grid::Grid;
use crate::types::{CellPosition, Face};
use serde::{Deserialize, Serialize};

/// Gray level per face direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceShades {
    pub bottom: f32,
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub back: f32,
    pub front: f32,
}

impl FaceShades {
    /// Shades for free-standing single-material cubes.
    pub const CUBE: FaceShades = FaceShades {
        bottom: 0.2,
        top: 1.0,
        left: 0.7,
        right: 0.5,
        back: 0.3,
        front: 0.5,
    };

    /// Shades for two-material maps. The bottom entry lights floor tiles,
    /// which face up.
    pub const MAP: FaceShades = FaceShades {
        bottom: 1.0,
        top: 1.0,
        left: 0.5,
        right: 0.5,
        back: 0.3,
        front: 0.7,
    };

    pub fn for_face(&self, face: Face) -> f32 {
        match face {
            Face::Bottom => self.bottom,
            Face::Top => self.top,
            Face::Left => self.left,
            Face::Right => self.right,
            Face::Back => self.back,
            Face::Front => self.front,
        }
    }
}

impl Default for FaceShades {
    fn default() -> Self {
        Self::CUBE
    }
}

/// Settings for distance falloff with marched shadows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalloffSettings {
    /// Per-channel falloff constants: ambient = k / distance.
    pub falloff: [f32; 3],
    /// Height of the virtual light source above the grid origin, in cells.
    pub vertical_offset: f32,
    /// Multiplier applied to faces in shadow.
    pub shadow_factor: f32,
    /// Cell step per march iteration, pointing away from the light.
    pub light_step: [i32; 3],
}

impl Default for FalloffSettings {
    fn default() -> Self {
        Self {
            falloff: [32.0, 24.0, 32.0],
            vertical_offset: 32.0,
            shadow_factor: 0.5,
            light_step: [0, 1, -1],
        }
    }
}

/// How vertex colors are computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShadingModel {
    /// Constant gray level per face direction.
    Flat { shades: FaceShades },
    /// Face shade scaled by distance falloff, with marched shadows.
    DistanceFalloff {
        shades: FaceShades,
        #[serde(default)]
        settings: FalloffSettings,
    },
}

impl Default for ShadingModel {
    fn default() -> Self {
        ShadingModel::Flat {
            shades: FaceShades::CUBE,
        }
    }
}

impl ShadingModel {
    pub fn flat(shades: FaceShades) -> Self {
        ShadingModel::Flat { shades }
    }

    /// Distance falloff with default settings.
    pub fn distance_falloff(shades: FaceShades) -> Self {
        ShadingModel::DistanceFalloff {
            shades,
            settings: FalloffSettings::default(),
        }
    }

    pub fn shades(&self) -> &FaceShades {
        match self {
            ShadingModel::Flat { shades } => shades,
            ShadingModel::DistanceFalloff { shades, .. } => shades,
        }
    }

    /// Vertex color for `face` of the cell at `pos`.
    pub fn color(&self, grid: &Grid, pos: CellPosition, face: Face) -> [f32; 3] {
        match self {
            ShadingModel::Flat { shades } => {
                let s = shades.for_face(face);
                [s, s, s]
            }
            ShadingModel::DistanceFalloff { shades, settings } => {
                let ambient = ambient(settings, pos);
                let s = if in_shadow(grid, pos, face, settings.light_step) {
                    settings.shadow_factor
                } else {
                    shades.for_face(face)
                };
                [s * ambient[0], s * ambient[1], s * ambient[2]]
            }
        }
    }
}

/// Ambient multiplier for a cell: `k / distance` per channel, where distance
/// is measured from a point `vertical_offset` cells above the origin. Cells
/// closer than `k` get a multiplier above 1. A cell at the light point gets 1.
pub fn ambient(settings: &FalloffSettings, pos: CellPosition) -> [f32; 3] {
    let horizontal = (pos.x as f32).hypot(pos.z as f32);
    let distance = horizontal.hypot(settings.vertical_offset - pos.y as f32);
    if distance <= f32::EPSILON {
        return [1.0; 3];
    }
    settings.falloff.map(|k| k / distance)
}

/// March from the cell towards the light and report whether the face is
/// blocked.
///
/// Top and bottom faces are shadowed by any occupied cell on the march.
/// Side faces look at the two cells diagonally behind each sample (one step
/// back horizontally, one step back vertically) starting from the second
/// step, so the wall a face belongs to never shadows itself. The march ends
/// unshadowed once the sample leaves the grid.
pub fn in_shadow(grid: &Grid, pos: CellPosition, face: Face, light_step: [i32; 3]) -> bool {
    let [dx, dy, dz] = light_step;
    if light_step == [0, 0, 0] {
        return false;
    }

    let mut sample = pos;
    let mut step = 0u32;
    loop {
        sample = sample.offset(dx, dy, dz);
        step += 1;
        if !grid.contains(sample) {
            return false;
        }

        if face.is_side() {
            if step > 1
                && (grid.is_occupied(sample.offset(-dx, 0, -dz))
                    || grid.is_occupied(sample.offset(0, -dy, 0)))
            {
                return true;
            }
        } else if grid.is_occupied(sample) {
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellModel, Channel, GridShape};

    fn grid() -> Grid {
        Grid::new(GridShape::cube(4), CellModel::Single).unwrap()
    }

    #[test]
    fn test_flat_uses_face_shades() {
        let grid = grid();
        let model = ShadingModel::flat(FaceShades::CUBE);
        let pos = CellPosition::new(0, 0, 0);

        assert_eq!(model.color(&grid, pos, Face::Top), [1.0, 1.0, 1.0]);
        assert_eq!(model.color(&grid, pos, Face::Bottom), [0.2, 0.2, 0.2]);
        assert_eq!(model.color(&grid, pos, Face::Left), [0.7, 0.7, 0.7]);
        assert_eq!(model.color(&grid, pos, Face::Back), [0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_ambient_under_source() {
        let settings = FalloffSettings::default();
        // Directly under the source at 32 cells: 32/32 = 1, 24/32 = 0.75.
        let a = ambient(&settings, CellPosition::new(0, 0, 0));
        assert!((a[0] - 1.0).abs() < 1e-6);
        assert!((a[1] - 0.75).abs() < 1e-6);
        assert!((a[2] - 1.0).abs() < 1e-6);

        let at_source = ambient(&settings, CellPosition::new(0, 32, 0));
        assert_eq!(at_source, [1.0; 3]);
    }

    #[test]
    fn test_ambient_not_clamped_near_source() {
        let settings = FalloffSettings::default();
        // 17 cells below the source.
        let a = ambient(&settings, CellPosition::new(0, 15, 0));
        assert!((a[0] - 32.0 / 17.0).abs() < 1e-6);
        assert!((a[1] - 24.0 / 17.0).abs() < 1e-6);
        assert!((a[2] - 32.0 / 17.0).abs() < 1e-6);
        assert!(a[0] > 1.0);
    }

    #[test]
    fn test_ambient_decreases_with_distance() {
        let settings = FalloffSettings::default();
        let near = ambient(&settings, CellPosition::new(10, 0, 0));
        let far = ambient(&settings, CellPosition::new(100, 0, 0));
        assert!(far[0] < near[0]);
        assert!(far.iter().all(|&c| c > 0.0));
    }

    #[test]
    fn test_top_face_shadowed_by_blocker() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        grid.set_code(pos, Channel::Base, 1).unwrap();
        assert!(!in_shadow(&grid, pos, Face::Top, [0, 1, -1]));

        // Two steps along (0, 1, -1).
        grid.set_code(CellPosition::new(0, 0, -2), Channel::Base, 1).unwrap();
        assert!(in_shadow(&grid, pos, Face::Top, [0, 1, -1]));
    }

    #[test]
    fn test_side_face_not_shadowed_by_cell_above() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        // Sample(1) = (0, -1, -1); minus the horizontal step = (0, -1, 0),
        // directly above. The first step is never checked for side faces.
        grid.set_code(CellPosition::new(0, -1, 0), Channel::Base, 1).unwrap();
        assert!(!in_shadow(&grid, pos, Face::Left, [0, 1, -1]));
        assert!(!in_shadow(&grid, pos, Face::Front, [0, 1, -1]));
        // Top faces check the sample itself, (0, -1, -1).
        assert!(!in_shadow(&grid, pos, Face::Top, [0, 1, -1]));
    }

    #[test]
    fn test_side_face_skips_first_sample_below() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        // Sample(1) minus the vertical step = (0, -2, -1), the front neighbor.
        grid.set_code(CellPosition::new(0, -2, -1), Channel::Base, 1).unwrap();
        assert!(!in_shadow(&grid, pos, Face::Right, [0, 1, -1]));
    }

    #[test]
    fn test_side_face_shadowed_below_second_sample() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        // Sample(2) = (0, 0, -2); minus the vertical step = (0, -1, -2).
        grid.set_code(CellPosition::new(0, -1, -2), Channel::Base, 1).unwrap();
        assert!(in_shadow(&grid, pos, Face::Right, [0, 1, -1]));
        // Top faces only look at the samples themselves.
        assert!(!in_shadow(&grid, pos, Face::Top, [0, 1, -1]));
    }

    #[test]
    fn test_side_face_shadowed_by_diagonal() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        // Sample(2) = (0, 0, -2); minus the horizontal step = (0, 0, -1).
        grid.set_code(CellPosition::new(0, 0, -1), Channel::Base, 1).unwrap();
        assert!(in_shadow(&grid, pos, Face::Front, [0, 1, -1]));
    }

    #[test]
    fn test_march_leaves_grid_unshadowed() {
        let grid = grid();
        assert!(!in_shadow(&grid, CellPosition::new(0, 0, 0), Face::Top, [0, 1, -1]));
        assert!(!in_shadow(&grid, CellPosition::new(0, 0, 0), Face::Top, [0, 0, 0]));
    }

    #[test]
    fn test_falloff_color_applies_shadow_factor() {
        let mut grid = grid();
        let pos = CellPosition::new(0, -2, 0);
        grid.set_code(CellPosition::new(0, 0, -2), Channel::Base, 1).unwrap();
        let model = ShadingModel::distance_falloff(FaceShades::CUBE);

        let settings = FalloffSettings::default();
        let a = ambient(&settings, pos);
        let c = model.color(&grid, pos, Face::Top);
        for i in 0..3 {
            assert!((c[i] - 0.5 * a[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_shading_model_json() {
        let model = ShadingModel::distance_falloff(FaceShades::MAP);
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"kind\":\"distance_falloff\""));
        let parsed: ShadingModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, model);

        let flat: ShadingModel =
            serde_json::from_str(r#"{"kind":"flat","shades":{"bottom":0.2,"top":1.0,"left":0.7,"right":0.5,"back":0.3,"front":0.5}}"#)
                .unwrap();
        assert_eq!(flat, ShadingModel::flat(FaceShades::CUBE));
    }
}
