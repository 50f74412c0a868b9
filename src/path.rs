//! This module defines the `Path` returned by path and reachability queries.
use std::collections::VecDeque;

use crate::TileId;

/// An ordered sequence of tiles, start first and goal last.
///
/// Every step costs one, so `cost` is the number of hops.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub(crate) tiles: VecDeque<TileId>,
    cost: u32,
}

impl Path {
    /// Create a new path from a vector of tiles.
    /// # Arguments
    /// * `tiles` - Tiles in travel order
    /// * `cost` - The total movement cost of the path
    ///
    pub fn new(tiles: Vec<TileId>, cost: u32) -> Self {
        Path {
            tiles: tiles.into_iter().collect(),
            cost,
        }
    }

    /// A path with no tiles. Returned when the start already is the goal.
    pub fn empty() -> Self {
        Path::default()
    }

    /// Builds a path by walking back-pointers from `end` until `previous` runs out.
    pub(crate) fn from_back_pointers<F>(end: TileId, mut previous: F) -> Self
    where
        F: FnMut(TileId) -> Option<TileId>,
    {
        let mut steps = vec![end];
        let mut current = end;

        while let Some(prev) = previous(current) {
            steps.push(prev);
            current = prev;
        }

        steps.reverse();
        let cost = steps.len() as u32 - 1;
        Path::new(steps, cost)
    }

    /// Returns true if the path contains the given tile.
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    /// Returns the path as a slice of tiles.
    /// Useful for drawing path previews.
    pub fn tiles(&self) -> &[TileId] {
        self.tiles.as_slices().0
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn first(&self) -> Option<TileId> {
        self.tiles.front().copied()
    }

    pub fn last(&self) -> Option<TileId> {
        self.tiles.back().copied()
    }

    /// Pops the first tile of the path.
    pub fn pop(&mut self) -> Option<TileId> {
        self.tiles.pop_front()
    }

    /// Returns the next tile in the path without removing it.
    pub fn next(&self) -> Option<TileId> {
        self.tiles.front().copied()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for Path {}

impl IntoIterator for Path {
    type Item = TileId;
    type IntoIter = std::collections::vec_deque::IntoIter<TileId>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_back_pointers() {
        // 3 -> 1 -> 0
        let previous = |tile: TileId| match tile {
            3 => Some(1),
            1 => Some(0),
            _ => None,
        };

        let path = Path::from_back_pointers(3, previous);
        assert_eq!(path.tiles(), &[0, 1, 3]);
        assert_eq!(path.cost(), 2);
        assert_eq!(path.first(), Some(0));
        assert_eq!(path.last(), Some(3));
    }

    #[test]
    fn test_single_tile_path() {
        let path = Path::from_back_pointers(5, |_| None);
        assert_eq!(path.len(), 1);
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn test_pop_and_next() {
        let mut path = Path::new(vec![4, 5, 6], 2);
        assert_eq!(path.next(), Some(4));
        assert_eq!(path.pop(), Some(4));
        assert_eq!(path.next(), Some(5));
        assert!(path.contains(6));
        assert!(!path.contains(4));
    }

    #[test]
    fn test_empty() {
        let path = Path::empty();
        assert!(path.is_empty());
        assert_eq!(path.first(), None);
    }
}
