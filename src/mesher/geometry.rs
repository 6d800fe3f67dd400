//! Mesh geometry types and the unit-cube face templates.

use crate::atlas::AtlasRegion;
use crate::types::{Axis, CellPosition, Face};

/// Floats per interleaved vertex: position (3), UV (2), color (3).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Vertices per quad (two triangles, no index buffer).
pub const VERTICES_PER_QUAD: usize = 6;

/// World units between neighboring cell centers.
pub const CELL_SPACING: f32 = 2.0;

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Shading color (RGB multiplier).
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], color: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }

    /// The vertex as 8 interleaved floats.
    pub fn to_array(&self) -> [f32; FLOATS_PER_VERTEX] {
        [
            self.position[0],
            self.position[1],
            self.position[2],
            self.uv[0],
            self.uv[1],
            self.color[0],
            self.color[1],
            self.color[2],
        ]
    }
}

/// One corner of a face template: offset from the cell center and local UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateVertex {
    pub offset: [f32; 3],
    pub uv: [f32; 2],
}

const fn tv(x: f32, y: f32, z: f32, u: f32, v: f32) -> TemplateVertex {
    TemplateVertex {
        offset: [x, y, z],
        uv: [u, v],
    }
}

/// Six vertices (two counter-clockwise triangles) for one face of a
/// `[-1, 1]^3` cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceTemplate {
    /// Axis the face is perpendicular to.
    pub normal_axis: Axis,
    /// Outward normal of the triangles.
    pub normal: [f32; 3],
    pub vertices: [TemplateVertex; VERTICES_PER_QUAD],
}

impl FaceTemplate {
    pub const BOTTOM: FaceTemplate = FaceTemplate {
        normal_axis: Axis::Y,
        normal: [0.0, -1.0, 0.0],
        vertices: [
            tv(-1.0, -1.0, -1.0, 0.0, 0.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(1.0, -1.0, 1.0, 1.0, 1.0),
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
        ],
    };

    /// The bottom plane of the cell wound to face upwards. Used for floor
    /// tiles of two-material cells without a side texture.
    pub const FLOOR: FaceTemplate = FaceTemplate {
        normal_axis: Axis::Y,
        normal: [0.0, 1.0, 0.0],
        vertices: [
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(-1.0, -1.0, -1.0, 0.0, 0.0),
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
            tv(1.0, -1.0, 1.0, 1.0, 1.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
        ],
    };

    pub const TOP: FaceTemplate = FaceTemplate {
        normal_axis: Axis::Y,
        normal: [0.0, 1.0, 0.0],
        vertices: [
            tv(-1.0, 1.0, -1.0, 0.0, 0.0),
            tv(-1.0, 1.0, 1.0, 0.0, 1.0),
            tv(1.0, 1.0, -1.0, 1.0, 0.0),
            tv(1.0, 1.0, -1.0, 1.0, 0.0),
            tv(-1.0, 1.0, 1.0, 0.0, 1.0),
            tv(1.0, 1.0, 1.0, 1.0, 1.0),
        ],
    };

    pub const LEFT: FaceTemplate = FaceTemplate {
        normal_axis: Axis::X,
        normal: [-1.0, 0.0, 0.0],
        vertices: [
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
            tv(-1.0, 1.0, -1.0, 1.0, 0.0),
            tv(-1.0, -1.0, -1.0, 0.0, 0.0),
            tv(-1.0, -1.0, 1.0, 0.0, 1.0),
            tv(-1.0, 1.0, 1.0, 1.0, 1.0),
            tv(-1.0, 1.0, -1.0, 1.0, 0.0),
        ],
    };

    pub const RIGHT: FaceTemplate = FaceTemplate {
        normal_axis: Axis::X,
        normal: [1.0, 0.0, 0.0],
        vertices: [
            tv(1.0, -1.0, 1.0, 1.0, 1.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(1.0, 1.0, -1.0, 0.0, 0.0),
            tv(1.0, -1.0, 1.0, 1.0, 1.0),
            tv(1.0, 1.0, -1.0, 0.0, 0.0),
            tv(1.0, 1.0, 1.0, 0.0, 1.0),
        ],
    };

    pub const BACK: FaceTemplate = FaceTemplate {
        normal_axis: Axis::Z,
        normal: [0.0, 0.0, -1.0],
        vertices: [
            tv(-1.0, -1.0, -1.0, 0.0, 0.0),
            tv(-1.0, 1.0, -1.0, 0.0, 1.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(1.0, -1.0, -1.0, 1.0, 0.0),
            tv(-1.0, 1.0, -1.0, 0.0, 1.0),
            tv(1.0, 1.0, -1.0, 1.0, 1.0),
        ],
    };

    pub const FRONT: FaceTemplate = FaceTemplate {
        normal_axis: Axis::Z,
        normal: [0.0, 0.0, 1.0],
        vertices: [
            tv(-1.0, -1.0, 1.0, 1.0, 0.0),
            tv(1.0, -1.0, 1.0, 0.0, 0.0),
            tv(-1.0, 1.0, 1.0, 1.0, 1.0),
            tv(1.0, -1.0, 1.0, 0.0, 0.0),
            tv(1.0, 1.0, 1.0, 0.0, 1.0),
            tv(-1.0, 1.0, 1.0, 1.0, 1.0),
        ],
    };

    /// The outward-facing template for a cube face.
    pub fn for_face(face: Face) -> &'static FaceTemplate {
        match face {
            Face::Bottom => &Self::BOTTOM,
            Face::Top => &Self::TOP,
            Face::Left => &Self::LEFT,
            Face::Right => &Self::RIGHT,
            Face::Back => &Self::BACK,
            Face::Front => &Self::FRONT,
        }
    }
}

/// A triangle-list mesh: every 6 vertices form one quad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one face of the cell at `pos`, mapping template UVs into `region`.
    pub fn push_face(
        &mut self,
        template: &FaceTemplate,
        pos: CellPosition,
        region: &AtlasRegion,
        color: [f32; 3],
    ) {
        let base = [
            CELL_SPACING * pos.x as f32,
            CELL_SPACING * pos.y as f32,
            CELL_SPACING * pos.z as f32,
        ];
        self.vertices.extend(template.vertices.iter().map(|tv| {
            Vertex::new(
                [
                    tv.offset[0] + base[0],
                    tv.offset[1] + base[1],
                    tv.offset[2] + base[2],
                ],
                region.transform_uv(tv.uv[0], tv.uv[1]),
                color,
            )
        }));
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Get the number of quads.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertices of quad `index`.
    pub fn quad(&self, index: usize) -> Option<&[Vertex]> {
        let start = index.checked_mul(VERTICES_PER_QUAD)?;
        self.vertices.get(start..start + VERTICES_PER_QUAD)
    }

    /// Interleaved `[x, y, z, u, v, r, g, b]` floats for GPU upload.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * FLOATS_PER_VERTEX);
        for vertex in &self.vertices {
            out.extend_from_slice(&vertex.to_array());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        [n[0] / len, n[1] / len, n[2] / len]
    }

    fn check_winding(template: &FaceTemplate) {
        for tri in template.vertices.chunks(3) {
            let n = triangle_normal(tri[0].offset, tri[1].offset, tri[2].offset);
            for i in 0..3 {
                assert!(
                    (n[i] - template.normal[i]).abs() < 1e-5,
                    "winding {:?} does not match normal {:?}",
                    n,
                    template.normal
                );
            }
        }
    }

    #[test]
    fn test_templates_wind_outwards() {
        for face in Face::ALL {
            let template = FaceTemplate::for_face(face);
            let (x, y, z) = face.offset();
            assert_eq!(template.normal, [x as f32, y as f32, z as f32]);
            assert_eq!(template.normal_axis, face.axis());
            check_winding(template);
        }
    }

    #[test]
    fn test_floor_faces_up_on_bottom_plane() {
        check_winding(&FaceTemplate::FLOOR);
        assert_eq!(FaceTemplate::FLOOR.normal, [0.0, 1.0, 0.0]);
        assert!(FaceTemplate::FLOOR
            .vertices
            .iter()
            .all(|v| v.offset[1] == -1.0));
    }

    #[test]
    fn test_templates_cover_unit_square_uvs() {
        for face in Face::ALL {
            let template = FaceTemplate::for_face(face);
            for corner in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
                assert!(template.vertices.iter().any(|v| v.uv == corner));
            }
        }
    }

    #[test]
    fn test_push_face_offsets_and_uvs() {
        let mut mesh = Mesh::new();
        let region = AtlasRegion {
            u_min: 0.5,
            v_min: 0.25,
            u_max: 0.5625,
            v_max: 0.3125,
        };
        mesh.push_face(
            &FaceTemplate::TOP,
            CellPosition::new(1, 2, -3),
            &region,
            [1.0, 1.0, 1.0],
        );

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.quad_count(), 1);
        assert_eq!(mesh.triangle_count(), 2);
        // (-1, 1, -1) + (2, 4, -6)
        assert_eq!(mesh.vertices[0].position, [1.0, 5.0, -7.0]);
        assert_eq!(mesh.vertices[0].uv, [0.5, 0.25]);
        assert!(mesh.vertices.iter().all(|v| region.contains(v.uv)));
    }

    #[test]
    fn test_interleaved_layout() {
        let mut mesh = Mesh::new();
        mesh.vertices
            .push(Vertex::new([1.0, 2.0, 3.0], [0.25, 0.75], [0.5, 0.6, 0.7]));
        assert_eq!(
            mesh.interleaved(),
            vec![1.0, 2.0, 3.0, 0.25, 0.75, 0.5, 0.6, 0.7]
        );
    }
}
