//! Movement range search: breadth-first from a start tile, spending one point of
//! budget per hop.
use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use slab::Slab;

use crate::{path::Path, tile::NavTile, FxIndexMap, TileId};

/// Search record for a reached tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReachEntry {
    /// Budget left after moving here.
    pub remaining: i32,
    /// The tile this one was reached from. `None` for the start tile.
    pub previous: Option<TileId>,
}

/// Tiles reachable from a start tile within a movement budget.
///
/// Iteration follows discovery order, start first.
#[derive(Clone, Debug)]
pub struct Reachable {
    start: TileId,
    budget: i32,
    entries: FxIndexMap<TileId, ReachEntry>,
}

impl Reachable {
    pub fn start(&self) -> TileId {
        self.start
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.entries.contains_key(&tile)
    }

    pub fn get(&self, tile: TileId) -> Option<&ReachEntry> {
        self.entries.get(&tile)
    }

    /// Budget left on arriving at `tile`. This seeds the next action's movement points.
    pub fn remaining(&self, tile: TileId) -> Option<i32> {
        self.entries.get(&tile).map(|entry| entry.remaining)
    }

    /// Number of hops from the start to `tile`.
    pub fn hops_to(&self, tile: TileId) -> Option<u32> {
        self.remaining(tile)
            .map(|remaining| (self.budget - remaining) as u32)
    }

    /// The route to `tile` following the search's back-pointers, start first.
    pub fn path_to(&self, tile: TileId) -> Option<Path> {
        if !self.contains(tile) {
            return None;
        }

        Some(Path::from_back_pointers(tile, |current| {
            self.entries.get(&current).and_then(|entry| entry.previous)
        }))
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &ReachEntry)> + '_ {
        self.entries.iter().map(|(tile, entry)| (*tile, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Breadth-first search from `start` that stops expanding once the budget runs out.
///
/// Only `Walkable` and `Obstructed` tiles are stepped onto. Obstructed tiles stay in so an
/// occupied tile can be offered as a target; whether moving there is allowed is up to the caller.
/// The start tile is always reached, whatever its kind or the budget.
pub(crate) fn reachable_tiles(tiles: &Slab<NavTile>, start: TileId, budget: i32) -> Reachable {
    let mut entries: FxIndexMap<TileId, ReachEntry> = FxIndexMap::default();
    let mut queued: FxHashMap<TileId, ReachEntry> = FxHashMap::default();
    let mut queue = VecDeque::new();

    queued.insert(
        start,
        ReachEntry {
            remaining: budget,
            previous: None,
        },
    );
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let Some(entry) = queued.remove(&current) else {
            continue;
        };
        entries.insert(current, entry);

        for &next in tiles[current].adjacent.iter() {
            if entries.contains_key(&next)
                || queued.contains_key(&next)
                || !tiles[next].kind.is_traversable()
            {
                continue;
            }

            let remaining = entry.remaining - 1;
            if remaining >= 0 {
                queued.insert(
                    next,
                    ReachEntry {
                        remaining,
                        previous: Some(current),
                    },
                );
                queue.push_back(next);
            }
        }
    }

    Reachable {
        start,
        budget,
        entries,
    }
}
