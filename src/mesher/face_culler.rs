//! Face culling between adjacent cells.
//!
//! A face is emitted only when the neighbor across it is empty in the channel
//! that decides visibility. Positions outside the grid always count as empty,
//! so boundary faces are kept.
//!
//! Single-material cells test the one channel on all six faces.
//! Two-material cells split the rules:
//! - cells with no side texture are floor tiles and emit only an
//!   upward-facing quad on their bottom plane, when the cell below has no base;
//! - cells with a side texture emit a top quad when the cell above has no
//!   base, and side quads where the neighbor has no side texture. They never
//!   emit a bottom quad.

use super::geometry::FaceTemplate;
use crate::grid::{CellModel, Channel, Grid};
use crate::types::{CellPosition, Face};

/// A face the mesher should emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleFace {
    /// The cube face this quad belongs to (used for shading).
    pub face: Face,
    /// Geometry to emit.
    pub template: &'static FaceTemplate,
    /// Texture code of the quad (1-based).
    pub code: u16,
}

/// Face culler over a grid.
#[derive(Debug, Clone, Copy)]
pub struct FaceCuller<'a> {
    grid: &'a Grid,
}

impl<'a> FaceCuller<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Check if the face of the cell at `pos` is hidden by its neighbor.
    ///
    /// Only looks at the neighbor; use [`visible_face`](Self::visible_face)
    /// for the full emission rules.
    pub fn should_cull(&self, pos: CellPosition, face: Face) -> bool {
        let channel = match (self.grid.model(), face) {
            (CellModel::TwoMaterial, f) if f.is_side() => Channel::Side,
            _ => Channel::Base,
        };
        !self.grid.is_empty_at(pos.neighbor(face), channel)
    }

    /// The quad to emit for `face` of the cell at `pos`, if any.
    pub fn visible_face(&self, pos: CellPosition, face: Face) -> Option<VisibleFace> {
        match self.grid.model() {
            CellModel::Single => self.single_face(pos, face),
            CellModel::TwoMaterial => self.two_material_face(pos, face),
        }
    }

    /// All quads for the cell at `pos`, in emission order
    /// (bottom, top, left, right, back, front).
    pub fn visible_faces(&self, pos: CellPosition) -> impl Iterator<Item = VisibleFace> + 'a {
        let culler = *self;
        Face::ALL
            .into_iter()
            .filter_map(move |face| culler.visible_face(pos, face))
    }

    fn single_face(&self, pos: CellPosition, face: Face) -> Option<VisibleFace> {
        let code = self.grid.code(pos, Channel::Base);
        if code == 0 || self.should_cull(pos, face) {
            return None;
        }
        Some(VisibleFace {
            face,
            template: FaceTemplate::for_face(face),
            code,
        })
    }

    fn two_material_face(&self, pos: CellPosition, face: Face) -> Option<VisibleFace> {
        let base = self.grid.code(pos, Channel::Base);
        if base == 0 {
            return None;
        }
        let side = self.grid.code(pos, Channel::Side);

        match face {
            Face::Bottom => {
                if side != 0 || self.should_cull(pos, face) {
                    return None;
                }
                Some(VisibleFace {
                    face,
                    template: &FaceTemplate::FLOOR,
                    code: base,
                })
            }
            Face::Top => {
                if side == 0 || self.should_cull(pos, face) {
                    return None;
                }
                Some(VisibleFace {
                    face,
                    template: &FaceTemplate::TOP,
                    code: base,
                })
            }
            _ => {
                if side == 0 || self.should_cull(pos, face) {
                    return None;
                }
                Some(VisibleFace {
                    face,
                    template: FaceTemplate::for_face(face),
                    code: side,
                })
            }
        }
    }
}
