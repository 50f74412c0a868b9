//! Tile discovery: flood fills outward from an origin column, probing each
//! neighboring column through a `WorldSampler` until no new tiles turn up.
use bevy::{
    log::warn,
    math::{IVec3, UVec3, Vec2, Vec3},
};
use ndarray::{s, Array2, Array3};

use crate::{
    dir::Dir,
    error::NavError,
    grid::NavSettings,
    sampler::{ColumnHit, WorldSampler},
};

/// Tiles discovered by `flood_fill`, still addressed in the working lattice.
pub(crate) struct Discovered {
    lattice: Array3<Option<usize>>,
    hits: Vec<(IVec3, ColumnHit)>,
    min: IVec3,
    max: IVec3,
}

impl Discovered {
    /// Extents of the minimal box containing every discovered tile.
    pub(crate) fn dimensions(&self) -> UVec3 {
        (self.max - self.min + IVec3::ONE).as_uvec3()
    }

    /// Copies the tiles out of the lattice, reindexed so the bounding box starts at zero.
    /// Tiles are yielded in x, y, z order.
    pub(crate) fn clip(self) -> Vec<(UVec3, ColumnHit)> {
        let min = self.min.as_uvec3();
        let max = self.max.as_uvec3();

        let window = self.lattice.slice(s![
            min.x as usize..=max.x as usize,
            min.y as usize..=max.y as usize,
            min.z as usize..=max.z as usize
        ]);

        window
            .indexed_iter()
            .filter_map(|((x, y, z), entry)| {
                entry.map(|index| {
                    (
                        UVec3::new(x as u32, y as u32, z as u32),
                        self.hits[index].1,
                    )
                })
            })
            .collect()
    }
}

struct FloodFill<'a, S: WorldSampler + ?Sized> {
    sampler: &'a S,
    settings: &'a NavSettings,
    center: IVec3,
    lattice: Array3<Option<usize>>,
    columns: Array2<bool>,
    hits: Vec<(IVec3, ColumnHit)>,
    min: IVec3,
    max: IVec3,
}

impl<S: WorldSampler + ?Sized> FloodFill<'_, S> {
    fn lattice_index(&self, coord: IVec3) -> Option<(usize, usize, usize)> {
        let size = self.settings.max_level_size as i32;
        if coord.cmplt(IVec3::ZERO).any() || coord.cmpge(IVec3::splat(size)).any() {
            return None;
        }
        Some((coord.x as usize, coord.y as usize, coord.z as usize))
    }

    fn is_column_visited(&self, x: i32, z: i32) -> bool {
        if x < 0 || z < 0 {
            return false;
        }
        self.columns
            .get((x as usize, z as usize))
            .copied()
            .unwrap_or(false)
    }

    /// World height of the tile sitting on the lattice center, if there is one yet.
    fn origin_height(&self) -> Option<(i32, f32)> {
        let (x, y, z) = self.lattice_index(self.center)?;
        self.lattice[(x, y, z)].map(|index| {
            let (coord, hit) = &self.hits[index];
            (coord.y, hit.position.y)
        })
    }

    /// Probes one column and records its tiles.
    /// Returns the indices of the tiles that were added.
    fn probe(&mut self, column: Vec2, candidate: IVec3) -> Result<Vec<usize>, NavError> {
        if self.is_column_visited(candidate.x, candidate.z) {
            return Ok(Vec::new());
        }

        let mut added = Vec::new();

        for hit in self
            .sampler
            .probe_column(column, self.settings.probe_range)
        {
            let coord = match self.origin_height() {
                Some((origin_level, origin_y)) => {
                    let levels =
                        ((hit.position.y - origin_y) / self.settings.tile_size.y).floor() as i32;
                    IVec3::new(candidate.x, origin_level + levels, candidate.z)
                }
                None => candidate,
            };

            let Some(index) = self.lattice_index(coord) else {
                return Err(NavError::OutOfBounds {
                    coord,
                    bound: self.settings.max_level_size,
                });
            };

            if self.lattice[index].is_some() {
                warn!("Two tiles share lattice coordinate {}, keeping the last", coord);
            }

            self.hits.push((coord, hit));
            let hit_index = self.hits.len() - 1;
            self.lattice[index] = Some(hit_index);
            self.columns[(index.0, index.2)] = true;

            self.min = self.min.min(coord);
            self.max = self.max.max(coord);

            added.push(hit_index);
        }

        Ok(added)
    }
}

/// Discovers every tile reachable by column probes from `origin`.
///
/// The origin column maps to the center of a `max_level_size` cube. The first tile found
/// anchors vertical levels: every later tile's level is the origin's level offset by the
/// floored world height difference, measured in tile heights.
pub(crate) fn flood_fill<S: WorldSampler + ?Sized>(
    sampler: &S,
    origin: Vec3,
    settings: &NavSettings,
) -> Result<Discovered, NavError> {
    let size = settings.max_level_size as usize;
    let center = IVec3::splat((settings.max_level_size / 2) as i32);

    let mut fill = FloodFill {
        sampler,
        settings,
        center,
        lattice: Array3::from_elem((size, size, size), None),
        columns: Array2::from_elem((size, size), false),
        hits: Vec::new(),
        min: center,
        max: center,
    };

    let mut stack = fill.probe(Vec2::new(origin.x, origin.z), center)?;
    if stack.is_empty() {
        return Err(NavError::EmptyLevel { origin });
    }

    while let Some(index) = stack.pop() {
        let (coord, hit) = fill.hits[index];

        for dir in Dir::link_order() {
            let offset = dir.vector().as_vec3() * settings.tile_size;
            let column = Vec2::new(hit.position.x + offset.x, hit.position.z + offset.z);

            let added = fill.probe(column, coord + dir.vector())?;
            stack.extend(added);
        }
    }

    Ok(Discovered {
        lattice: fill.lattice,
        hits: fill.hits,
        min: fill.min,
        max: fill.max,
    })
}
