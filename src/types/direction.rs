//! Face direction and axis types.

/// The six faces of a cell's cube.
///
/// Naming follows the camera's default frame: `Left`/`Right` are -X/+X,
/// `Back`/`Front` are -Z/+Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Bottom,
    Top,
    Left,
    Right,
    Back,
    Front,
}

impl Face {
    /// All six faces in emission order.
    pub const ALL: [Face; 6] = [
        Face::Bottom,
        Face::Top,
        Face::Left,
        Face::Right,
        Face::Back,
        Face::Front,
    ];

    /// The four side faces in emission order.
    pub const SIDES: [Face; 4] = [Face::Left, Face::Right, Face::Back, Face::Front];

    /// Get the neighbor offset for this face.
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Face::Bottom => (0, -1, 0),
            Face::Top => (0, 1, 0),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Back => (0, 0, -1),
            Face::Front => (0, 0, 1),
        }
    }

    /// Get the axis this face is perpendicular to.
    pub fn axis(&self) -> Axis {
        match self {
            Face::Bottom | Face::Top => Axis::Y,
            Face::Left | Face::Right => Axis::X,
            Face::Back | Face::Front => Axis::Z,
        }
    }

    /// True for the four vertical faces.
    pub fn is_side(&self) -> bool {
        self.axis() != Axis::Y
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Face::Bottom => write!(f, "bottom"),
            Face::Top => write!(f, "top"),
            Face::Left => write!(f, "left"),
            Face::Right => write!(f, "right"),
            Face::Back => write!(f, "back"),
            Face::Front => write!(f, "front"),
        }
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}
