//! Wavefront OBJ export.
//!
//! OBJ is a simple, widely-supported text-based 3D format.
//! This exports positions with vertex colors, UVs, one normal per quad and
//! one material per texture group.

use crate::atlas::TextureAtlas;
use crate::error::{MesherError, Result};
use crate::mesher::geometry::VERTICES_PER_QUAD;
use crate::mesher::{MesherOutput, UvMapping};
use std::fmt::Write;

/// Export a mesh to OBJ format.
/// Returns (obj_content, mtl_content) as strings.
///
/// With atlas UVs every material samples `<name>_atlas.png`, which the
/// caller writes next to the files; with per-group textures each material
/// references its group label.
pub fn export_obj(output: &MesherOutput, name: &str) -> Result<(String, String)> {
    export_obj_with(output, name, true)
}

fn export_obj_with(
    output: &MesherOutput,
    name: &str,
    atlas_texture: bool,
) -> Result<(String, String)> {
    let mut obj = String::with_capacity(256 + output.vertex_count() * 120);
    let mut mtl = String::with_capacity(512);

    write_obj(&mut obj, output, name).map_err(format_error)?;
    write_mtl(&mut mtl, output, name, atlas_texture).map_err(format_error)?;

    Ok((obj, mtl))
}

fn format_error(e: std::fmt::Error) -> MesherError {
    MesherError::Export(format!("Failed to format OBJ: {}", e))
}

fn material_name(name: &str, group: usize) -> String {
    format!("{}_group_{}", name, group)
}

fn write_obj(obj: &mut String, output: &MesherOutput, name: &str) -> std::fmt::Result {
    let vertices = &output.mesh.vertices;

    writeln!(obj, "# Voxel Mesher OBJ Export")?;
    writeln!(obj, "# Vertices: {}", vertices.len())?;
    writeln!(obj, "# Triangles: {}", output.triangle_count())?;
    writeln!(obj)?;
    writeln!(obj, "mtllib {}.mtl", name)?;
    writeln!(obj)?;
    writeln!(obj, "o {}", name)?;
    writeln!(obj)?;

    for vertex in vertices {
        writeln!(
            obj,
            "v {} {} {} {} {} {}",
            vertex.position[0],
            vertex.position[1],
            vertex.position[2],
            vertex.color[0],
            vertex.color[1],
            vertex.color[2]
        )?;
    }
    writeln!(obj)?;

    for vertex in vertices {
        writeln!(obj, "vt {} {}", vertex.uv[0], vertex.uv[1])?;
    }
    writeln!(obj)?;

    for quad in vertices.chunks_exact(VERTICES_PER_QUAD) {
        let n = quad_normal(quad[0].position, quad[1].position, quad[2].position);
        writeln!(obj, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    writeln!(obj)?;

    for (gi, group) in output.batches.groups.iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        writeln!(obj, "usemtl {}", material_name(name, gi))?;
        for quad in group.start_quad as usize..group.end_quad as usize {
            let normal = quad + 1;
            let base = quad * VERTICES_PER_QUAD + 1;
            for tri in 0..2 {
                let i = base + tri * 3;
                writeln!(
                    obj,
                    "f {}/{}/{} {}/{}/{} {}/{}/{}",
                    i,
                    i,
                    normal,
                    i + 1,
                    i + 1,
                    normal,
                    i + 2,
                    i + 2,
                    normal
                )?;
            }
        }
    }

    Ok(())
}

fn write_mtl(
    mtl: &mut String,
    output: &MesherOutput,
    name: &str,
    atlas_texture: bool,
) -> std::fmt::Result {
    writeln!(mtl, "# Voxel Mesher Material")?;

    for (gi, group) in output.batches.groups.iter().enumerate() {
        writeln!(mtl)?;
        writeln!(mtl, "newmtl {}", material_name(name, gi))?;
        writeln!(mtl, "Ka 1.0 1.0 1.0")?;
        writeln!(mtl, "Kd 1.0 1.0 1.0")?;
        writeln!(mtl, "Ks 0.0 0.0 0.0")?;
        writeln!(mtl, "Ns 10.0")?;
        writeln!(mtl, "d 1.0")?;
        writeln!(mtl, "illum 1")?;
        match output.uv_mapping {
            UvMapping::Atlas if atlas_texture => writeln!(mtl, "map_Kd {}_atlas.png", name)?,
            UvMapping::Atlas => {}
            UvMapping::PerGroupTexture => writeln!(mtl, "map_Kd {}", group.label)?,
        }
    }

    Ok(())
}

fn quad_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f32::EPSILON {
        return [0.0, 1.0, 0.0];
    }
    [n[0] / len, n[1] / len, n[2] / len]
}

/// Export mesh and atlas to OBJ format bytes for writing to files.
pub struct ObjExport {
    pub obj: String,
    pub mtl: String,
    /// PNG of the atlas, present when the mesh uses atlas UVs and an atlas
    /// was supplied.
    pub texture_png: Option<Vec<u8>>,
}

impl ObjExport {
    /// Without an atlas, atlas-mapped materials carry no `map_Kd` so the
    /// MTL never names a file that is not written.
    pub fn from_output(output: &MesherOutput, atlas: Option<&TextureAtlas>, name: &str) -> Result<Self> {
        let (obj, mtl) = export_obj_with(output, name, atlas.is_some())?;
        let texture_png = match (output.uv_mapping, atlas) {
            (UvMapping::Atlas, Some(atlas)) => Some(atlas.to_png()?),
            _ => None,
        };
        Ok(Self {
            obj,
            mtl,
            texture_png,
        })
    }

    /// Write `<name>.obj`, `<name>.mtl` and, if present, `<name>_atlas.png`.
    pub fn write_to_dir<P: AsRef<std::path::Path>>(&self, dir: P, name: &str) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::write(dir.join(format!("{}.obj", name)), &self.obj)?;
        std::fs::write(dir.join(format!("{}.mtl", name)), &self.mtl)?;
        if let Some(png) = &self.texture_png {
            std::fs::write(dir.join(format!("{}_atlas.png", name)), png)?;
        }
        log::info!("Wrote {}.obj to {:?}", name, dir);
        Ok(())
    }
}
