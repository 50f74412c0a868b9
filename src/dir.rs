//! Horizontal directions used to link tiles and probe neighbor columns.
use bevy::math::IVec3;
use strum::{Display, EnumIter};

/// One of the four horizontal directions on the tile plane.
///
/// `y` is the vertical axis, so North/South move along `z` and East/West along `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Dir {
    NORTH = 0,
    EAST = 1,
    SOUTH = 2,
    WEST = 3,
}

pub use self::Dir::*;

impl Dir {
    /// Directions in compass order. Used for cover lookups.
    pub fn cardinal() -> std::iter::Copied<std::slice::Iter<'static, Dir>> {
        [NORTH, EAST, SOUTH, WEST].iter().copied()
    }

    /// The order in which neighbor links are appended to a tile's adjacency list.
    pub fn link_order() -> std::iter::Copied<std::slice::Iter<'static, Dir>> {
        [NORTH, SOUTH, EAST, WEST].iter().copied()
    }

    pub fn vector(self) -> IVec3 {
        match self {
            NORTH => IVec3::new(0, 0, 1),
            EAST => IVec3::new(1, 0, 0),
            SOUTH => IVec3::new(0, 0, -1),
            WEST => IVec3::new(-1, 0, 0),
        }
    }
}
