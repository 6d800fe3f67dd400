//! Shared types used throughout the library.

mod direction;

pub use direction::{Axis, Face};

use serde::{Deserialize, Serialize};

/// A cell position in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the neighboring position across the given face.
    pub fn neighbor(&self, face: Face) -> Self {
        let (dx, dy, dz) = face.offset();
        self.offset(dx, dy, dz)
    }

    /// Translate by an arbitrary step.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor() {
        let pos = CellPosition::new(3, 0, -2);
        assert_eq!(pos.neighbor(Face::Bottom), CellPosition::new(3, -1, -2));
        assert_eq!(pos.neighbor(Face::Front), CellPosition::new(3, 0, -1));
        assert_eq!(pos.neighbor(Face::Left), CellPosition::new(2, 0, -2));
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = BoundingBox::from_points(
            [[-1.0, 0.0, 2.0], [3.0, -4.0, 1.0]].into_iter(),
        )
        .unwrap();
        assert_eq!(bounds.min, [-1.0, -4.0, 1.0]);
        assert_eq!(bounds.max, [3.0, 0.0, 2.0]);
        assert_eq!(bounds.dimensions(), [4.0, 4.0, 1.0]);

        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }
}
