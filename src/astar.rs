//! Best-first A* over the tile adjacency graph.
//!
//! Scores live in a per-search table, never on the tiles, so any number of
//! searches may run against the same grid.
use bevy::{log, math::Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use slab::Slab;

use crate::{path::Path, tile::NavTile, FxIndexSet, TileId};

#[derive(Clone, Copy, Debug)]
struct Score {
    g: f32,
    f: f32,
    previous: Option<TileId>,
}

/// Scores a tile the moment it joins the open set.
///
/// The parent is whichever of the tile's own adjacent tiles is already open or closed
/// with the lowest g, not necessarily the tile that discovered it. A tile entered through
/// a one-way link has no such neighbor and falls back to `discovered_by`.
fn score_tile(
    tiles: &Slab<NavTile>,
    tile: TileId,
    discovered_by: TileId,
    goal_anchor: Vec3,
    open: &FxIndexSet<TileId>,
    closed: &FxHashSet<TileId>,
    scores: &FxHashMap<TileId, Score>,
) -> Score {
    let mut previous = None;
    let mut best = f32::INFINITY;

    for &adjacent in tiles[tile].adjacent.iter() {
        if !open.contains(&adjacent) && !closed.contains(&adjacent) {
            continue;
        }

        if let Some(score) = scores.get(&adjacent) {
            if score.g < best {
                best = score.g;
                previous = Some(adjacent);
            }
        }
    }

    if previous.is_none() {
        previous = Some(discovered_by);
        best = scores.get(&discovered_by).map_or(f32::INFINITY, |score| score.g);
    }

    let g = best + 1.0;
    let h = tiles[tile].anchor.distance(goal_anchor);

    Score {
        g,
        f: g + h,
        previous,
    }
}

/// Lowest f in the open set. Ties go to the tile opened first.
fn lowest_f(open: &FxIndexSet<TileId>, scores: &FxHashMap<TileId, Score>) -> Option<TileId> {
    let mut lowest = None;
    let mut lowest_f = f32::INFINITY;

    for tile in open.iter() {
        if let Some(score) = scores.get(tile) {
            if score.f < lowest_f {
                lowest_f = score.f;
                lowest = Some(*tile);
            }
        }
    }

    lowest
}

/// A* search between two tiles of a linked grid.
///
/// Edges cost one and the heuristic is the straight line distance between tile anchors.
/// Tile kinds are not filtered here.
///
/// # Returns
/// * `Option<Path>` - The tiles from `start` to `goal` inclusive, or `None` when the open set
///   runs dry first. An empty path when `start == goal`.
pub(crate) fn astar_tiles(tiles: &Slab<NavTile>, start: TileId, goal: TileId) -> Option<Path> {
    if start == goal {
        return Some(Path::empty());
    }

    let goal_anchor = tiles[goal].anchor;

    let mut open: FxIndexSet<TileId> = FxIndexSet::default();
    let mut closed: FxHashSet<TileId> = FxHashSet::default();
    let mut scores: FxHashMap<TileId, Score> = FxHashMap::default();

    open.insert(start);
    scores.insert(
        start,
        Score {
            g: 0.0,
            f: tiles[start].anchor.distance(goal_anchor),
            previous: None,
        },
    );

    let mut current = start;

    while !open.is_empty() {
        if current == goal {
            return Some(Path::from_back_pointers(goal, |tile| {
                scores.get(&tile).and_then(|score| score.previous)
            }));
        }

        open.shift_remove(&current);
        closed.insert(current);

        for &next in tiles[current].adjacent.iter() {
            if open.contains(&next) || closed.contains(&next) {
                continue;
            }

            open.insert(next);
            let score =
                score_tile(tiles, next, current, goal_anchor, &open, &closed, &scores);
            scores.insert(next, score);
        }

        current = match lowest_f(&open, &scores) {
            Some(tile) => tile,
            None => break,
        };
    }

    log::debug!("No path from tile {} to tile {}", start, goal);
    None
}
