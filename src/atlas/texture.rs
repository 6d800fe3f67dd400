//! Decoded atlas image.

use super::indexer::ATLAS_TILES;
use crate::error::{MesherError, Result};
use image::ImageEncoder;
use std::path::Path;

/// A decoded RGBA texture atlas.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    /// Width of the atlas in pixels.
    pub width: u32,
    /// Height of the atlas in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixel data.
    pub pixels: Vec<u8>,
}

impl TextureAtlas {
    /// Wrap an RGBA buffer, checking that it is tightly packed.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MesherError::Atlas(format!(
                "atlas has zero size ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(MesherError::Atlas(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        if width % ATLAS_TILES != 0 || height % ATLAS_TILES != 0 {
            log::warn!(
                "Atlas size {}x{} is not a multiple of {} tiles; tiles will straddle texels",
                width,
                height,
                ATLAS_TILES
            );
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an atlas from encoded image bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Decode an atlas image file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let atlas = Self::from_bytes(&data)?;
        log::debug!("Decoded atlas {:?} ({}x{})", path, atlas.width, atlas.height);
        Ok(atlas)
    }

    /// A plain white atlas, used when meshing without textures.
    pub fn empty() -> Self {
        Self {
            width: ATLAS_TILES,
            height: ATLAS_TILES,
            pixels: vec![255; (ATLAS_TILES * ATLAS_TILES * 4) as usize],
        }
    }

    /// Pixel size of one atlas tile.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.width / ATLAS_TILES, self.height / ATLAS_TILES)
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| MesherError::Atlas(format!("Failed to encode PNG: {}", e)))?;

        Ok(bytes)
    }
}
