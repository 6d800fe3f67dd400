//! Tile lookup for the fixed 16x16-tile texture atlas.

/// Tiles per atlas row and column.
pub const ATLAS_TILES: u32 = 16;

/// Total number of tiles in the atlas.
pub const ATLAS_TILE_COUNT: u32 = ATLAS_TILES * ATLAS_TILES;

/// A region within the texture atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    /// U coordinate of the left edge (0-1).
    pub u_min: f32,
    /// V coordinate of the top edge (0-1).
    pub v_min: f32,
    /// U coordinate of the right edge (0-1).
    pub u_max: f32,
    /// V coordinate of the bottom edge (0-1).
    pub v_max: f32,
}

impl AtlasRegion {
    /// The whole texture.
    pub const FULL: AtlasRegion = AtlasRegion {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };

    /// Get the width of this region in UV space.
    pub fn width(&self) -> f32 {
        self.u_max - self.u_min
    }

    /// Get the height of this region in UV space.
    pub fn height(&self) -> f32 {
        self.v_max - self.v_min
    }

    /// Transform a local UV coordinate (0-1) to atlas coordinate.
    pub fn transform_uv(&self, u: f32, v: f32) -> [f32; 2] {
        [
            self.u_min + u * self.width(),
            self.v_min + v * self.height(),
        ]
    }

    /// Check whether an atlas UV lies inside this region (edges included).
    pub fn contains(&self, uv: [f32; 2]) -> bool {
        const EPSILON: f32 = 1e-6;
        uv[0] >= self.u_min - EPSILON
            && uv[0] <= self.u_max + EPSILON
            && uv[1] >= self.v_min - EPSILON
            && uv[1] <= self.v_max + EPSILON
    }
}

/// Tile `(col, row)` for a 0-based texture index.
///
/// Indices past the last tile wrap into rows below the atlas; callers
/// must filter empty codes before converting them to indices.
pub fn tile_for(index: u32) -> (u32, u32) {
    (index % ATLAS_TILES, index / ATLAS_TILES)
}

/// Tile for a stored grid code (1-based). Code 0 means "no texture".
pub fn tile_for_code(code: u16) -> Option<(u32, u32)> {
    if code == 0 {
        None
    } else {
        Some(tile_for(code as u32 - 1))
    }
}

/// UV rectangle of a tile.
pub fn tile_region(index: u32) -> AtlasRegion {
    let (col, row) = tile_for(index);
    let tiles = ATLAS_TILES as f32;
    AtlasRegion {
        u_min: col as f32 / tiles,
        v_min: row as f32 / tiles,
        u_max: (col + 1) as f32 / tiles,
        v_max: (row + 1) as f32 / tiles,
    }
}

/// Map a template UV into a tile: `((u + col) / 16, (v + row) / 16)`.
pub fn tile_uv(index: u32, u: f32, v: f32) -> [f32; 2] {
    let (col, row) = tile_for(index);
    let tiles = ATLAS_TILES as f32;
    [(u + col as f32) / tiles, (v + row as f32) / tiles]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_for() {
        assert_eq!(tile_for(0), (0, 0));
        assert_eq!(tile_for(15), (15, 0));
        assert_eq!(tile_for(16), (0, 1));
        assert_eq!(tile_for(37), (5, 2));
        assert_eq!(tile_for(255), (15, 15));
    }

    #[test]
    fn test_tile_for_code_is_one_based() {
        assert_eq!(tile_for_code(0), None);
        assert_eq!(tile_for_code(1), Some((0, 0)));
        assert_eq!(tile_for_code(5), Some((4, 0)));
        assert_eq!(tile_for_code(17), Some((0, 1)));
    }

    #[test]
    fn test_tile_region() {
        let region = tile_region(18);
        assert!((region.u_min - 2.0 / 16.0).abs() < 1e-6);
        assert!((region.v_min - 1.0 / 16.0).abs() < 1e-6);
        assert!((region.width() - 1.0 / 16.0).abs() < 1e-6);
        assert!((region.height() - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_tile_uv_matches_region_transform() {
        for index in [0, 7, 16, 100, 255] {
            let region = tile_region(index);
            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
                let a = tile_uv(index, u, v);
                let b = region.transform_uv(u, v);
                assert!((a[0] - b[0]).abs() < 1e-6);
                assert!((a[1] - b[1]).abs() < 1e-6);
                assert!(region.contains(a));
            }
        }
    }

    #[test]
    fn test_atlas_region_transform() {
        let region = AtlasRegion {
            u_min: 0.25,
            v_min: 0.5,
            u_max: 0.5,
            v_max: 0.75,
        };

        let [u, v] = region.transform_uv(0.0, 0.0);
        assert!((u - 0.25).abs() < 0.001);
        assert!((v - 0.5).abs() < 0.001);

        let [u, v] = region.transform_uv(1.0, 1.0);
        assert!((u - 0.5).abs() < 0.001);
        assert!((v - 0.75).abs() < 0.001);
        assert!(!region.contains([0.1, 0.6]));
    }
}
