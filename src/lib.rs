//! Tile navigation for turn-based tactics.
//!
//! A [`grid::NavGrid`] is discovered once per level by flood filling columns through a
//! [`sampler::WorldSampler`], linked into a four-way adjacency graph that can step one level up
//! or down, and then queried for paths ([`grid::NavGrid::find_path`]) and movement ranges
//! ([`grid::NavGrid::reachable`]).
use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

mod macros;

mod astar;
pub mod dir;
pub mod error;
mod flood_fill;
pub mod grid;
mod neighbor;
pub mod path;
pub mod reachable;
pub mod sampler;
pub mod tile;

pub mod prelude {
    pub use crate::dir::*;
    pub use crate::error::NavError;
    pub use crate::grid::{NavGrid, NavSettings, NavSettingsBuilder};
    pub use crate::path::Path;
    pub use crate::reachable::{ReachEntry, Reachable};
    pub use crate::sampler::{ColumnHit, LevelSampler, ProbeRange, WorldSampler};
    pub use crate::tile::{NavTile, TileKind};
    pub use crate::TileId;
}

/// Identifies a tile within its `NavGrid`.
pub type TileId = usize;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
type FxIndexSet<K> = IndexSet<K, BuildHasherDefault<FxHasher>>;
