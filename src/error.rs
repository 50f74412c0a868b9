//! Errors surfaced by grid construction and queries.
use bevy::math::{IVec3, UVec3, Vec3};

use crate::TileId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavError {
    /// Flood fill discovered a tile outside the working lattice.
    /// The level is larger than `max_level_size` allows.
    #[error("tile at lattice coordinate {coord} lies outside the 0..{bound} lattice")]
    OutOfBounds { coord: IVec3, bound: u32 },
    /// The origin column has no tiles, so there is nothing to flood fill from.
    #[error("no tile found in the origin column at {origin}")]
    EmptyLevel { origin: Vec3 },
    #[error("tile {0} is not part of the grid")]
    TileNotFound(TileId),
    #[error("no tile at grid coordinate {0}")]
    CoordNotFound(UVec3),
}

impl NavError {
    /// True for errors caused by a misconfigured level or lattice bound.
    pub fn is_configuration(&self) -> bool {
        matches!(self, NavError::OutOfBounds { .. } | NavError::EmptyLevel { .. })
    }
}
