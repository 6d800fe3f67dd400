//! Texture atlas indexing.
//!
//! Grid codes select tiles in a single image split into 16x16 equal tiles.
//! Code `N` maps to 0-based index `N - 1`, then to `(index % 16, index / 16)`.

pub mod indexer;
mod texture;

pub use indexer::{tile_for, tile_for_code, tile_region, tile_uv, AtlasRegion, ATLAS_TILES};
pub use texture::TextureAtlas;
