//! The `WorldSampler` trait the grid builder uses to discover tiles, and
//! `LevelSampler`, an implementation backed by authored level data.
use bevy::math::{IVec3, Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::tile::TileKind;

/// Vertical extent a column probe covers, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeRange {
    pub min: f32,
    pub max: f32,
}

impl ProbeRange {
    pub fn new(min: f32, max: f32) -> Self {
        ProbeRange { min, max }
    }

    pub fn contains(&self, height: f32) -> bool {
        height >= self.min && height <= self.max
    }
}

impl Default for ProbeRange {
    fn default() -> Self {
        ProbeRange {
            min: -100.0,
            max: 100.0,
        }
    }
}

/// A tile found by probing a world column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnHit {
    /// World position of the tile. Its `y` decides the tile's vertical level.
    pub position: Vec3,
    /// World position of the tile's top surface.
    pub anchor: Vec3,
    pub kind: TileKind,
}

impl ColumnHit {
    /// A hit whose top surface is its position.
    pub fn new(position: Vec3, kind: TileKind) -> Self {
        ColumnHit {
            position,
            anchor: position,
            kind,
        }
    }

    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Spatial oracle the grid builder discovers tiles through.
///
/// `column` holds the world `x` in `column.x` and the world `z` in `column.y`.
/// Implementations report every tile occupying that column within `range`.
/// Physics raycasts, heightmaps or authored level data all fit.
pub trait WorldSampler {
    fn probe_column(&self, column: Vec2, range: ProbeRange) -> Vec<ColumnHit>;
}

impl<F> WorldSampler for F
where
    F: Fn(Vec2, ProbeRange) -> Vec<ColumnHit>,
{
    fn probe_column(&self, column: Vec2, range: ProbeRange) -> Vec<ColumnHit> {
        self(column, range)
    }
}

/// A `WorldSampler` over tiles placed by hand or loaded from level data.
///
/// Tiles are bucketed by the column their position rounds to, so probes
/// anywhere within half a tile of a column's center find its tiles.
/// Hits come back bottom to top.
///
/// # Example
/// ```
/// use bevy::math::{IVec3, Vec3};
/// use bevy_tactics_nav::prelude::*;
///
/// let sampler = LevelSampler::new(Vec3::new(2.0, 1.0, 2.0))
///     .with_cell(IVec3::new(0, 0, 0), TileKind::Walkable)
///     .with_cell(IVec3::new(1, 0, 0), TileKind::LowObstacle);
///
/// let grid = NavGrid::build(Vec3::ZERO, &sampler, &NavSettings::default()).unwrap();
/// assert_eq!(grid.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LevelSampler {
    tile_size: Vec3,
    columns: FxHashMap<(i32, i32), Vec<ColumnHit>>,
}

impl LevelSampler {
    pub fn new(tile_size: Vec3) -> Self {
        LevelSampler {
            tile_size,
            columns: FxHashMap::default(),
        }
    }

    /// A `width` by `depth` floor of walkable tiles starting at the world origin.
    pub fn flat(tile_size: Vec3, width: i32, depth: i32) -> Self {
        let mut sampler = LevelSampler::new(tile_size);
        for x in 0..width {
            for z in 0..depth {
                sampler.place_cell(IVec3::new(x, 0, z), TileKind::Walkable);
            }
        }
        sampler
    }

    pub fn tile_size(&self) -> Vec3 {
        self.tile_size
    }

    /// Places a tile at a world position.
    pub fn insert(&mut self, hit: ColumnHit) {
        let key = self.column_key(Vec2::new(hit.position.x, hit.position.z));
        let column = self.columns.entry(key).or_default();
        column.push(hit);
        column.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    }

    /// Places a tile on the lattice implied by the tile size.
    /// Its top surface sits one tile height above its position.
    pub fn place_cell(&mut self, cell: IVec3, kind: TileKind) {
        let position = cell.as_vec3() * self.tile_size;
        let anchor = position + Vec3::Y * self.tile_size.y;
        self.insert(ColumnHit::new(position, kind).with_anchor(anchor));
    }

    pub fn with_cell(mut self, cell: IVec3, kind: TileKind) -> Self {
        self.place_cell(cell, kind);
        self
    }

    /// Removes every tile in the column containing `cell`.
    pub fn clear_column(&mut self, cell: IVec3) {
        self.columns.remove(&(cell.x, cell.z));
    }

    fn column_key(&self, column: Vec2) -> (i32, i32) {
        (
            (column.x / self.tile_size.x).round() as i32,
            (column.y / self.tile_size.z).round() as i32,
        )
    }
}

impl WorldSampler for LevelSampler {
    fn probe_column(&self, column: Vec2, range: ProbeRange) -> Vec<ColumnHit> {
        self.columns
            .get(&self.column_key(column))
            .map(|hits| {
                hits.iter()
                    .filter(|hit| range.contains(hit.position.y))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}
