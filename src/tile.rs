//! This module defines `NavTile`, the unit of navigable space in a `NavGrid`.
use bevy::{
    math::{UVec3, Vec3},
    prelude::Entity,
};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use strum::Display;

use crate::TileId;

/// What a tile is currently used for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
pub enum TileKind {
    /// Empty or non-existent cell.
    #[default]
    None,
    /// Agents can stand on and move through this tile.
    Walkable,
    /// An agent is standing on this tile.
    Obstructed,
    /// Half height cover. Only usable for wall-hide interactions.
    LowObstacle,
    /// Full height cover. Only usable for wall-hide interactions.
    HighObstacle,
}

impl TileKind {
    /// Tiles a movement range search may step onto.
    /// Obstructed tiles are kept so occupied tiles can be offered as targets.
    pub fn is_traversable(self) -> bool {
        matches!(self, TileKind::Walkable | TileKind::Obstructed)
    }

    /// Tiles an agent can hide against.
    pub fn is_cover(self) -> bool {
        matches!(self, TileKind::LowObstacle | TileKind::HighObstacle)
    }
}

/// A single tile in the `NavGrid`.
#[derive(Debug, Clone)]
pub struct NavTile {
    /// Grid coordinate, relative to the clipped grid origin.
    pub(crate) coord: UVec3,
    /// World position reported by the sampler.
    pub(crate) position: Vec3,
    /// World position of the tile's top surface.
    pub(crate) anchor: Vec3,
    pub(crate) kind: TileKind,
    /// Agent standing on the tile. Only meaningful while `kind` is `Obstructed`.
    pub(crate) occupant: Option<Entity>,
    /// Linked neighbors, in `Dir::link_order()`. Not necessarily symmetric.
    pub(crate) adjacent: SmallVec<[TileId; 4]>,
}

impl NavTile {
    pub(crate) fn new(coord: UVec3, position: Vec3, anchor: Vec3, kind: TileKind) -> Self {
        NavTile {
            coord,
            position,
            anchor,
            kind,
            occupant: None,
            adjacent: SmallVec::new(),
        }
    }

    pub fn coord(&self) -> UVec3 {
        self.coord
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Top surface of the tile. Used for heuristics and agent placement.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    /// Tiles this tile links to.
    pub fn adjacent(&self) -> &[TileId] {
        &self.adjacent
    }

    pub fn is_adjacent_to(&self, other: TileId) -> bool {
        self.adjacent.contains(&other)
    }
}

impl PartialEq for NavTile {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for NavTile {}

impl Hash for NavTile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}
