//! This module contains `NavGrid`, the main type of the crate, and the settings it is built with.
use bevy::{
    log::{info, warn},
    math::{UVec3, Vec3},
    prelude::{Entity, Resource},
};
use ndarray::{Array3, ArrayView3};
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    astar::astar_tiles,
    dir::Dir,
    error::NavError,
    flood_fill::flood_fill,
    macros::timed,
    neighbor::{link_adjacency, resolve_neighbor},
    path::Path,
    reachable::{reachable_tiles, Reachable},
    sampler::{ColumnHit, ProbeRange, WorldSampler},
    tile::{NavTile, TileKind},
    TileId,
};

/// Settings for discovering tiles from a `WorldSampler`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavSettings {
    /// World size of one tile. `x` and `z` space column probes, `y` is one vertical level.
    pub tile_size: Vec3,
    /// Size of the working lattice along every axis. The origin column maps to its center,
    /// so a level can reach half this many tiles in each direction.
    pub max_level_size: u32,
    /// Vertical range handed to every column probe.
    pub probe_range: ProbeRange,
}

impl Default for NavSettings {
    fn default() -> Self {
        NavSettings {
            tile_size: Vec3::new(2.0, 1.0, 2.0),
            max_level_size: 50,
            probe_range: ProbeRange::default(),
        }
    }
}

/// Builder for `NavSettings`.
///
/// Example usage:
/// ```
/// use bevy::math::Vec3;
/// use bevy_tactics_nav::prelude::*;
///
/// let settings = NavSettingsBuilder::new()
///     .tile_size(Vec3::new(1.0, 0.5, 1.0))
///     .max_level_size(64)
///     .probe_range(-20.0, 20.0)
///     .build();
///
/// assert_eq!(settings.max_level_size, 64);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NavSettingsBuilder {
    settings: NavSettings,
}

impl NavSettingsBuilder {
    pub fn new() -> Self {
        NavSettingsBuilder::default()
    }

    /// World size of one tile. Every component must be positive.
    pub fn tile_size(mut self, tile_size: Vec3) -> Self {
        if tile_size.cmple(Vec3::ZERO).any() {
            panic!("Tile size must be positive on every axis");
        }

        self.settings.tile_size = tile_size;
        self
    }

    /// Lattice size along each axis. Must be at least 1.
    pub fn max_level_size(mut self, max_level_size: u32) -> Self {
        if max_level_size < 1 {
            panic!("Max level size must be at least 1");
        }

        self.settings.max_level_size = max_level_size;
        self
    }

    /// Vertical range column probes cover, in world units.
    pub fn probe_range(mut self, min: f32, max: f32) -> Self {
        if min > max {
            panic!("Probe range minimum must not exceed its maximum");
        }

        self.settings.probe_range = ProbeRange::new(min, max);
        self
    }

    /// Builds the [`NavSettings`] from the current builder state.
    pub fn build(self) -> NavSettings {
        self.settings
    }
}

/// `NavGrid` is the tile graph every navigation query runs against.
///
/// Build it once when a level loads and hand it by reference to whatever needs paths or
/// movement ranges. Queries take `&self` and keep their scratch state to themselves.
/// Only tile kind and occupancy change after construction.
///
/// # Example
/// ```
/// use bevy::math::{UVec3, Vec3};
/// use bevy_tactics_nav::prelude::*;
///
/// let sampler = LevelSampler::flat(Vec3::new(2.0, 1.0, 2.0), 5, 5);
/// let grid = NavGrid::build(Vec3::ZERO, &sampler, &NavSettings::default()).unwrap();
///
/// let path = grid
///     .find_path_between(UVec3::new(2, 0, 2), UVec3::new(4, 0, 4))
///     .unwrap()
///     .expect("open floor");
/// assert_eq!(path.len(), 5);
///
/// let start = grid.tile_at(UVec3::new(2, 0, 2)).unwrap();
/// let range = grid.reachable(start, 1).unwrap();
/// assert_eq!(range.len(), 5);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct NavGrid {
    settings: NavSettings,
    cells: Array3<Option<TileId>>,
    tiles: Slab<NavTile>,
}

impl NavGrid {
    /// Discovers the level through `sampler`, starting from the column under `origin`,
    /// and links the tiles found.
    ///
    /// Fails with a configuration error if the level does not fit the settings' lattice
    /// or the origin column has no tile.
    pub fn build<S: WorldSampler + ?Sized>(
        origin: Vec3,
        sampler: &S,
        settings: &NavSettings,
    ) -> Result<Self, NavError> {
        let discovered = timed!("Flood filled level", { flood_fill(sampler, origin, settings)? });

        let dimensions = discovered.dimensions();
        let grid = NavGrid::assemble(dimensions, discovered.clip(), *settings);

        info!(
            "Built nav grid with {} tiles in {}x{}x{} cells",
            grid.len(),
            dimensions.x,
            dimensions.y,
            dimensions.z
        );

        Ok(grid)
    }

    /// Builds a grid from tiles at known grid coordinates, for levels whose layout is
    /// already authored. Coordinates are shifted so the bounding box starts at zero.
    /// World positions are the coordinates scaled by the tile size.
    pub fn from_cells<I>(cells: I, settings: &NavSettings) -> Self
    where
        I: IntoIterator<Item = (UVec3, TileKind)>,
    {
        let cells: Vec<(UVec3, TileKind)> = cells.into_iter().collect();

        let Some(min) = cells.iter().map(|(coord, _)| *coord).reduce(UVec3::min) else {
            return NavGrid::assemble(UVec3::ZERO, Vec::new(), *settings);
        };
        let max = cells
            .iter()
            .map(|(coord, _)| *coord)
            .fold(min, UVec3::max);

        let placed = cells
            .into_iter()
            .map(|(coord, kind)| {
                let position = coord.as_vec3() * settings.tile_size;
                let anchor = position + Vec3::Y * settings.tile_size.y;
                (
                    coord - min,
                    ColumnHit::new(position, kind).with_anchor(anchor),
                )
            })
            .collect();

        NavGrid::assemble(max - min + UVec3::ONE, placed, *settings)
    }

    fn assemble(dimensions: UVec3, placed: Vec<(UVec3, ColumnHit)>, settings: NavSettings) -> Self {
        let mut cells = Array3::from_elem(
            (
                dimensions.x as usize,
                dimensions.y as usize,
                dimensions.z as usize,
            ),
            None,
        );
        let mut tiles = Slab::with_capacity(placed.len());

        for (coord, hit) in placed {
            let id = tiles.insert(NavTile::new(coord, hit.position, hit.anchor, hit.kind));
            let cell = &mut cells[[coord.x as usize, coord.y as usize, coord.z as usize]];

            if let Some(replaced) = cell.replace(id) {
                warn!("Replacing tile at {} with a later one", coord);
                tiles.remove(replaced);
            }
        }

        timed!("Linked adjacency", {
            link_adjacency(&cells.view(), &mut tiles);
        });

        NavGrid {
            settings,
            cells,
            tiles,
        }
    }

    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    /// A view of the cell lattice. Each cell holds the id of the tile at that coordinate.
    pub fn view(&self) -> ArrayView3<'_, Option<TileId>> {
        self.cells.view()
    }

    pub fn dimensions(&self) -> UVec3 {
        let shape = self.cells.shape();
        UVec3::new(shape[0] as u32, shape[1] as u32, shape[2] as u32)
    }

    /// Extent along `x`.
    pub fn width(&self) -> u32 {
        self.dimensions().x
    }

    /// Number of vertical levels.
    pub fn height(&self) -> u32 {
        self.dimensions().y
    }

    /// Extent along `z`.
    pub fn depth(&self) -> u32 {
        self.dimensions().z
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn in_bounds(&self, coord: UVec3) -> bool {
        coord.cmplt(self.dimensions()).all()
    }

    pub fn tile(&self, id: TileId) -> Option<&NavTile> {
        self.tiles.get(id)
    }

    /// Id of the tile at a grid coordinate.
    pub fn tile_at(&self, coord: UVec3) -> Option<TileId> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.cells[[coord.x as usize, coord.y as usize, coord.z as usize]]
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &NavTile)> + '_ {
        self.tiles.iter()
    }

    /// Grid coordinates along a path, in order.
    pub fn path_coords(&self, path: &Path) -> Vec<UVec3> {
        path.tiles()
            .iter()
            .filter_map(|&id| self.tiles.get(id).map(|tile| tile.coord))
            .collect()
    }

    /// The tile an agent standing at `position` is on: the highest tile whose column holds
    /// the point and whose top is not above it.
    pub fn tile_under(&self, position: Vec3) -> Option<TileId> {
        const TOLERANCE: f32 = 1e-3;
        let half = self.settings.tile_size * 0.5;

        self.tiles
            .iter()
            .filter(|(_, tile)| {
                (tile.anchor.x - position.x).abs() <= half.x
                    && (tile.anchor.z - position.z).abs() <= half.z
                    && tile.anchor.y <= position.y + TOLERANCE
            })
            .max_by(|(_, a), (_, b)| a.anchor.y.total_cmp(&b.anchor.y))
            .map(|(id, _)| id)
    }

    /// The tile `coord` links to in direction `dir`, with the same one-level vertical
    /// fallback used when the grid was linked. `None` when `coord` lies outside the grid.
    pub fn get_adjacent(&self, coord: UVec3, dir: Dir) -> Option<TileId> {
        resolve_neighbor(&self.cells.view(), coord, dir)
    }

    /// Kind of the tile in direction `dir`, or `TileKind::None` when there is none.
    pub fn adjacent_kind(&self, coord: UVec3, dir: Dir) -> TileKind {
        self.get_adjacent(coord, dir)
            .and_then(|id| self.tiles.get(id))
            .map_or(TileKind::None, |tile| tile.kind)
    }

    /// Directions, in compass order, where an agent on `tile` could hide against cover.
    pub fn cover_directions(&self, tile: TileId) -> Result<SmallVec<[Dir; 4]>, NavError> {
        let coord = self.checked_tile(tile)?.coord;

        Ok(Dir::cardinal()
            .filter(|&dir| self.adjacent_kind(coord, dir).is_cover())
            .collect())
    }

    /// Shortest path between two tiles.
    ///
    /// Returns `Ok(None)` when the goal can't be reached and an empty path when `start`
    /// already is the goal. Fails if either tile is not part of this grid.
    pub fn find_path(&self, start: TileId, goal: TileId) -> Result<Option<Path>, NavError> {
        self.checked_tile(start)?;
        self.checked_tile(goal)?;

        Ok(astar_tiles(&self.tiles, start, goal))
    }

    /// [`NavGrid::find_path`] addressed by grid coordinates.
    pub fn find_path_between(&self, start: UVec3, goal: UVec3) -> Result<Option<Path>, NavError> {
        let start = self.checked_coord(start)?;
        let goal = self.checked_coord(goal)?;

        Ok(astar_tiles(&self.tiles, start, goal))
    }

    /// Every tile reachable from `start` spending at most `budget` hops.
    /// A budget of zero or less reaches only `start`.
    pub fn reachable(&self, start: TileId, budget: i32) -> Result<Reachable, NavError> {
        self.checked_tile(start)?;

        Ok(reachable_tiles(&self.tiles, start, budget))
    }

    pub fn set_kind(&mut self, tile: TileId, kind: TileKind) -> Result<(), NavError> {
        let tile = self.checked_tile_mut(tile)?;
        tile.kind = kind;
        if kind != TileKind::Obstructed {
            tile.occupant = None;
        }
        Ok(())
    }

    /// Marks `tile` as held by `agent`.
    pub fn occupy(&mut self, tile: TileId, agent: Entity) -> Result<(), NavError> {
        let tile = self.checked_tile_mut(tile)?;
        tile.kind = TileKind::Obstructed;
        tile.occupant = Some(agent);
        Ok(())
    }

    /// Frees `tile`, making it walkable again.
    pub fn vacate(&mut self, tile: TileId) -> Result<(), NavError> {
        self.set_kind(tile, TileKind::Walkable)
    }

    /// Moves `agent` from one tile to another.
    pub fn relocate(&mut self, from: TileId, to: TileId, agent: Entity) -> Result<(), NavError> {
        self.checked_tile(to)?;
        self.vacate(from)?;
        self.occupy(to, agent)
    }

    fn checked_tile(&self, tile: TileId) -> Result<&NavTile, NavError> {
        self.tiles.get(tile).ok_or_else(|| {
            warn!("Tile {} is not part of the grid", tile);
            NavError::TileNotFound(tile)
        })
    }

    fn checked_tile_mut(&mut self, tile: TileId) -> Result<&mut NavTile, NavError> {
        self.tiles.get_mut(tile).ok_or(NavError::TileNotFound(tile))
    }

    fn checked_coord(&self, coord: UVec3) -> Result<TileId, NavError> {
        self.tile_at(coord).ok_or_else(|| {
            warn!("No tile at {}", coord);
            NavError::CoordNotFound(coord)
        })
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{IVec3, UVec3, Vec3};

    use crate::{
        dir::*,
        error::NavError,
        grid::{NavGrid, NavSettings, NavSettingsBuilder},
        sampler::{ColumnHit, LevelSampler},
        tile::TileKind,
    };

    fn unit_settings() -> NavSettings {
        NavSettingsBuilder::new().tile_size(Vec3::ONE).build()
    }

    /// Level coordinates, kinds and adjacency in a comparable form.
    fn snapshot(grid: &NavGrid) -> Vec<(UVec3, TileKind, Vec<UVec3>)> {
        let mut tiles: Vec<_> = grid
            .tiles()
            .map(|(_, tile)| {
                let links = tile
                    .adjacent()
                    .iter()
                    .map(|&id| grid.tile(id).unwrap().coord())
                    .collect();
                (tile.coord(), tile.kind(), links)
            })
            .collect();
        tiles.sort_by_key(|(coord, _, _)| (coord.x, coord.y, coord.z));
        tiles
    }

    /// Two floors joined by a single step: ground at level 0 over x 0..4, an upper
    /// walkway at level 1 over x 4..6, and a cover block beside the ground floor.
    fn two_floor_sampler() -> LevelSampler {
        let mut sampler = LevelSampler::new(Vec3::ONE);
        for x in 0..4 {
            for z in 0..2 {
                sampler.place_cell(IVec3::new(x, 0, z), TileKind::Walkable);
            }
        }
        for x in 4..6 {
            sampler.place_cell(IVec3::new(x, 1, 0), TileKind::Walkable);
        }
        sampler.place_cell(IVec3::new(0, 0, 2), TileKind::LowObstacle);
        sampler
    }

    #[test]
    fn test_default_settings() {
        let settings = NavSettings::default();
        assert_eq!(settings.tile_size, Vec3::new(2.0, 1.0, 2.0));
        assert_eq!(settings.max_level_size, 50);
    }

    #[test]
    #[should_panic]
    fn test_builder_rejects_zero_lattice() {
        let _ = NavSettingsBuilder::new().max_level_size(0);
    }

    #[test]
    #[should_panic]
    fn test_builder_rejects_flat_tiles() {
        let _ = NavSettingsBuilder::new().tile_size(Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_build_scenario_grid() {
        let sampler = LevelSampler::flat(Vec3::new(2.0, 1.0, 2.0), 5, 5);
        let grid = NavGrid::build(Vec3::ZERO, &sampler, &NavSettings::default()).unwrap();

        assert_eq!(grid.dimensions(), UVec3::new(5, 1, 5));
        assert_eq!(grid.len(), 25);

        let path = grid
            .find_path_between(UVec3::new(2, 0, 2), UVec3::new(4, 0, 4))
            .unwrap()
            .unwrap();

        assert_eq!(path.len(), 5);
        let coords = grid.path_coords(&path);
        assert_eq!(coords[0], UVec3::new(2, 0, 2));
        assert_eq!(coords[4], UVec3::new(4, 0, 4));
        for pair in coords.windows(2) {
            let step = pair[0].as_ivec3() - pair[1].as_ivec3();
            assert_eq!(step.x.abs() + step.z.abs(), 1);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let sampler = two_floor_sampler();

        let first = NavGrid::build(Vec3::ZERO, &sampler, &unit_settings()).unwrap();
        let second = NavGrid::build(Vec3::ZERO, &sampler, &unit_settings()).unwrap();

        assert_eq!(snapshot(&first), snapshot(&second));
    }

    #[test]
    fn test_build_bounds() {
        let grid = NavGrid::build(Vec3::ZERO, &two_floor_sampler(), &unit_settings()).unwrap();

        assert_eq!(grid.dimensions(), UVec3::new(6, 2, 3));
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.depth(), 3);
        assert_eq!(grid.len(), 11);

        for (_, tile) in grid.tiles() {
            assert!(grid.in_bounds(tile.coord()));
        }
    }

    #[test]
    fn test_build_from_any_origin_matches() {
        let sampler = two_floor_sampler();

        let from_corner = NavGrid::build(Vec3::ZERO, &sampler, &unit_settings()).unwrap();
        let from_walkway =
            NavGrid::build(Vec3::new(5.0, 1.0, 0.0), &sampler, &unit_settings()).unwrap();

        assert_eq!(snapshot(&from_corner), snapshot(&from_walkway));
    }

    #[test]
    fn test_build_step_links() {
        let grid = NavGrid::build(Vec3::ZERO, &two_floor_sampler(), &unit_settings()).unwrap();

        let ground_edge = grid.tile_at(UVec3::new(3, 0, 0)).unwrap();
        let walkway = grid.tile_at(UVec3::new(4, 1, 0)).unwrap();
        let behind = grid.tile_at(UVec3::new(3, 0, 1)).unwrap();

        assert_eq!(grid.get_adjacent(UVec3::new(3, 0, 0), EAST), Some(walkway));
        assert_eq!(grid.get_adjacent(UVec3::new(4, 1, 0), WEST), Some(ground_edge));
        assert_eq!(grid.get_adjacent(UVec3::new(3, 0, 1), EAST), None);
        assert_eq!(grid.tile(behind).unwrap().adjacent().len(), 2);
    }

    #[test]
    fn test_build_out_of_bounds() {
        let sampler = LevelSampler::flat(Vec3::ONE, 30, 1);
        let settings = NavSettingsBuilder::new()
            .tile_size(Vec3::ONE)
            .max_level_size(20)
            .build();

        let err = NavGrid::build(Vec3::ZERO, &sampler, &settings).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_get_adjacent_outside_grid() {
        let grid = NavGrid::from_cells(
            (0..3).map(|x| (UVec3::new(x, 0, 0), TileKind::Walkable)),
            &unit_settings(),
        );

        assert_eq!(grid.get_adjacent(UVec3::new(u32::MAX, 0, 0), EAST), None);
        assert_eq!(grid.get_adjacent(UVec3::new(3, 0, 0), WEST), None);
        assert_eq!(grid.adjacent_kind(UVec3::new(3, 0, 0), WEST), TileKind::None);
        assert_eq!(
            grid.get_adjacent(UVec3::new(1, 0, 0), WEST),
            grid.tile_at(UVec3::new(0, 0, 0))
        );
    }

    #[test]
    fn test_from_cells_asymmetric_step() {
        // A's east cell is empty but the one above holds B. B's west cell holds C, so B
        // never links back to A.
        let grid = NavGrid::from_cells(
            [
                (UVec3::new(0, 0, 0), TileKind::Walkable),
                (UVec3::new(0, 1, 0), TileKind::Walkable),
                (UVec3::new(1, 1, 0), TileKind::Walkable),
            ],
            &unit_settings(),
        );

        let a = grid.tile_at(UVec3::new(0, 0, 0)).unwrap();
        let b = grid.tile_at(UVec3::new(1, 1, 0)).unwrap();
        let c = grid.tile_at(UVec3::new(0, 1, 0)).unwrap();

        assert!(grid.tile(a).unwrap().is_adjacent_to(b));
        assert!(!grid.tile(b).unwrap().is_adjacent_to(a));
        assert!(grid.tile(b).unwrap().is_adjacent_to(c));
    }

    #[test]
    fn test_from_cells_reindexes_to_zero() {
        let grid = NavGrid::from_cells(
            [
                (UVec3::new(3, 2, 5), TileKind::Walkable),
                (UVec3::new(4, 2, 5), TileKind::Walkable),
            ],
            &unit_settings(),
        );

        assert_eq!(grid.dimensions(), UVec3::new(2, 1, 1));
        assert!(grid.tile_at(UVec3::new(0, 0, 0)).is_some());
        assert!(grid.tile_at(UVec3::new(1, 0, 0)).is_some());
    }

    #[test]
    fn test_from_cells_empty() {
        let grid = NavGrid::from_cells(Vec::new(), &unit_settings());
        assert!(grid.is_empty());
        assert_eq!(grid.dimensions(), UVec3::ZERO);
    }

    #[test]
    fn test_find_path_disconnected() {
        let grid = NavGrid::from_cells(
            [
                (UVec3::new(0, 0, 0), TileKind::Walkable),
                (UVec3::new(2, 0, 0), TileKind::Walkable),
            ],
            &unit_settings(),
        );

        let path = grid
            .find_path_between(UVec3::new(0, 0, 0), UVec3::new(2, 0, 0))
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn test_find_path_self() {
        let grid = NavGrid::from_cells([(UVec3::ZERO, TileKind::Walkable)], &unit_settings());
        let tile = grid.tile_at(UVec3::ZERO).unwrap();

        let path = grid.find_path(tile, tile).unwrap().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_find_path_unknown_tiles() {
        let grid = NavGrid::from_cells([(UVec3::ZERO, TileKind::Walkable)], &unit_settings());
        let tile = grid.tile_at(UVec3::ZERO).unwrap();

        assert_eq!(grid.find_path(tile, 99).unwrap_err(), NavError::TileNotFound(99));
        assert_eq!(
            grid.find_path_between(UVec3::ZERO, UVec3::new(4, 0, 0))
                .unwrap_err(),
            NavError::CoordNotFound(UVec3::new(4, 0, 0))
        );
        assert!(grid.reachable(42, 3).is_err());
    }

    #[test]
    fn test_path_climbs_step() {
        let grid = NavGrid::build(Vec3::ZERO, &two_floor_sampler(), &unit_settings()).unwrap();

        let path = grid
            .find_path_between(UVec3::new(0, 0, 0), UVec3::new(5, 1, 0))
            .unwrap()
            .unwrap();

        assert_eq!(path.len(), 6);
        assert_eq!(*grid.path_coords(&path).last().unwrap(), UVec3::new(5, 1, 0));
    }

    #[test]
    fn test_reachable_scenario_zero_budget() {
        let grid = NavGrid::build(Vec3::ZERO, &two_floor_sampler(), &unit_settings()).unwrap();
        let start = grid.tile_at(UVec3::new(1, 0, 1)).unwrap();

        let reachable = grid.reachable(start, 0).unwrap();
        assert_eq!(reachable.tiles().collect::<Vec<_>>(), vec![start]);
    }

    #[test]
    fn test_reachable_walks_around_cover() {
        let grid = NavGrid::build(Vec3::ZERO, &two_floor_sampler(), &unit_settings()).unwrap();
        let start = grid.tile_at(UVec3::new(0, 0, 1)).unwrap();
        let cover = grid.tile_at(UVec3::new(0, 0, 2)).unwrap();

        let reachable = grid.reachable(start, 10).unwrap();
        assert!(!reachable.contains(cover));
        // Everything else on both floors is in range.
        assert_eq!(reachable.len(), 10);
    }

    #[test]
    fn test_occupancy() {
        let mut grid = NavGrid::from_cells(
            [
                (UVec3::new(0, 0, 0), TileKind::Walkable),
                (UVec3::new(1, 0, 0), TileKind::Walkable),
            ],
            &unit_settings(),
        );
        let from = grid.tile_at(UVec3::new(0, 0, 0)).unwrap();
        let to = grid.tile_at(UVec3::new(1, 0, 0)).unwrap();
        let agent = bevy::prelude::Entity::from_raw(7);

        grid.occupy(from, agent).unwrap();
        assert_eq!(grid.tile(from).unwrap().kind(), TileKind::Obstructed);
        assert_eq!(grid.tile(from).unwrap().occupant(), Some(agent));

        grid.relocate(from, to, agent).unwrap();
        assert_eq!(grid.tile(from).unwrap().kind(), TileKind::Walkable);
        assert_eq!(grid.tile(from).unwrap().occupant(), None);
        assert_eq!(grid.tile(to).unwrap().occupant(), Some(agent));

        assert!(grid.relocate(to, 99, agent).is_err());
        assert_eq!(grid.tile(to).unwrap().occupant(), Some(agent));
    }

    #[test]
    fn test_cover_directions() {
        let grid = NavGrid::from_cells(
            [
                (UVec3::new(1, 0, 0), TileKind::Walkable),
                (UVec3::new(1, 0, 1), TileKind::HighObstacle),
                (UVec3::new(0, 0, 0), TileKind::LowObstacle),
                (UVec3::new(2, 0, 0), TileKind::Walkable),
            ],
            &unit_settings(),
        );
        let tile = grid.tile_at(UVec3::new(1, 0, 0)).unwrap();

        let cover = grid.cover_directions(tile).unwrap();
        assert_eq!(cover.as_slice(), &[NORTH, WEST]);
        assert_eq!(grid.adjacent_kind(UVec3::new(1, 0, 0), SOUTH), TileKind::None);
        assert_eq!(grid.adjacent_kind(UVec3::new(1, 0, 0), EAST), TileKind::Walkable);
    }

    #[test]
    fn test_tile_under() {
        let mut sampler = two_floor_sampler();
        // A balcony above the ground floor at x 1.
        sampler.insert(
            ColumnHit::new(Vec3::new(1.0, 3.0, 0.0), TileKind::Walkable)
                .with_anchor(Vec3::new(1.0, 4.0, 0.0)),
        );
        let grid = NavGrid::build(Vec3::ZERO, &sampler, &unit_settings()).unwrap();

        let ground = grid.tile_under(Vec3::new(1.2, 1.5, 0.1)).unwrap();
        assert_eq!(grid.tile(ground).unwrap().coord().y, 0);

        let balcony = grid.tile_under(Vec3::new(1.0, 4.0, 0.0)).unwrap();
        assert_eq!(grid.tile(balcony).unwrap().coord().y, 3);

        assert!(grid.tile_under(Vec3::new(10.0, 1.0, 10.0)).is_none());
    }

    #[test]
    fn test_concurrent_queries() {
        let grid = NavGrid::build(
            Vec3::ZERO,
            &LevelSampler::flat(Vec3::ONE, 8, 8),
            &unit_settings(),
        )
        .unwrap();
        let start = grid.tile_at(UVec3::new(0, 0, 0)).unwrap();
        let goal = grid.tile_at(UVec3::new(7, 0, 7)).unwrap();

        std::thread::scope(|scope| {
            let paths = scope.spawn(|| grid.find_path(start, goal).unwrap().unwrap().len());
            let range = scope.spawn(|| grid.reachable(start, 3).unwrap().len());

            assert_eq!(paths.join().unwrap(), 15);
            assert_eq!(range.join().unwrap(), 10);
        });
    }
}
