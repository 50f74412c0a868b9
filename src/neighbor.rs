//! Adjacency linking between tiles, including the one-level vertical fallback.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use bevy::math::UVec3;
use ndarray::ArrayView3;
use slab::Slab;
use smallvec::SmallVec;

use crate::{dir::Dir, tile::NavTile, TileId};

/// Resolves the tile `coord` links to in direction `dir`.
///
/// Looks at the cell next to `coord` first, then one level above it, then one level below.
/// Resolution is directional: a tile reached through the upper fallback need not resolve
/// back to `coord`.
pub(crate) fn resolve_neighbor(
    cells: &ArrayView3<Option<TileId>>,
    coord: UVec3,
    dir: Dir,
) -> Option<TileId> {
    let shape = cells.shape();
    if coord.x as usize >= shape[0] || coord.y as usize >= shape[1] || coord.z as usize >= shape[2]
    {
        return None;
    }

    let target = coord.as_ivec3() + dir.vector();
    if target.x < 0
        || target.z < 0
        || target.x as usize >= shape[0]
        || target.z as usize >= shape[2]
    {
        return None;
    }

    let x = target.x as usize;
    let y = coord.y as usize;
    let z = target.z as usize;

    if let Some(tile) = cells[[x, y, z]] {
        return Some(tile);
    }

    if y + 1 < shape[1] {
        if let Some(tile) = cells[[x, y + 1, z]] {
            return Some(tile);
        }
    }

    if y >= 1 {
        if let Some(tile) = cells[[x, y - 1, z]] {
            return Some(tile);
        }
    }

    None
}

fn links_for(cells: &ArrayView3<Option<TileId>>, coord: UVec3) -> SmallVec<[TileId; 4]> {
    Dir::link_order()
        .filter_map(|dir| resolve_neighbor(cells, coord, dir))
        .collect()
}

/// Fills every tile's adjacency list. Runs once after the grid is assembled.
pub(crate) fn link_adjacency(cells: &ArrayView3<Option<TileId>>, tiles: &mut Slab<NavTile>) {
    let entries: Vec<(TileId, UVec3)> = cells
        .indexed_iter()
        .filter_map(|((x, y, z), cell)| cell.map(|id| (id, UVec3::new(x as u32, y as u32, z as u32))))
        .collect();

    #[cfg(feature = "parallel")]
    let links: Vec<(TileId, SmallVec<[TileId; 4]>)> = entries
        .par_iter()
        .map(|&(id, coord)| (id, links_for(cells, coord)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let links: Vec<(TileId, SmallVec<[TileId; 4]>)> = entries
        .iter()
        .map(|&(id, coord)| (id, links_for(cells, coord)))
        .collect();

    for (id, adjacent) in links {
        tiles[id].adjacent = adjacent;
    }
}
