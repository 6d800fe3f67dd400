//! Mesh export formats.
//!
//! This module provides the raw GPU buffer exporter and a Wavefront OBJ writer.

pub mod obj;
pub mod raw;

pub use obj::{export_obj, ObjExport};
pub use raw::{export_raw, RawManifest, RawMeshData};
