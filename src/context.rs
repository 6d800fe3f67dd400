//! World state shared by the mesher and a render loop.

use crate::camera::{CameraInput, CameraPose, CameraSettings};
use crate::grid::Grid;
use crate::mesher::{Mesher, MesherOutput};

/// The loaded grid and the viewer's camera.
#[derive(Debug, Clone)]
pub struct WorldContext {
    pub grid: Grid,
    pub camera: CameraPose,
    pub camera_settings: CameraSettings,
}

impl WorldContext {
    /// Wrap a grid with the camera at its start pose.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            camera: CameraPose::default(),
            camera_settings: CameraSettings::default(),
        }
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }

    /// Mesh the current grid.
    pub fn build_mesh(&self, mesher: &Mesher) -> MesherOutput {
        mesher.mesh(&self.grid)
    }

    /// Advance the camera by one frame.
    pub fn step(&mut self, input: &CameraInput, dt: f32) {
        self.camera.update(input, &self.camera_settings, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellModel, Channel, GridShape};
    use crate::types::CellPosition;
    use glam::Vec3;

    #[test]
    fn test_context_meshes_and_moves() {
        let mut grid = Grid::new(GridShape::cube(2), CellModel::Single).unwrap();
        grid.set_code(CellPosition::new(0, 0, 0), Channel::Base, 1).unwrap();
        let mut world = WorldContext::new(grid);

        let output = world.build_mesh(&Mesher::new());
        assert_eq!(output.quad_count(), 6);

        let input = CameraInput {
            backward: true,
            ..Default::default()
        };
        world.step(&input, 1.0);
        assert!((world.camera.position - Vec3::new(-75.0, 10.0, 0.0)).length() < 1e-4);
    }
}
