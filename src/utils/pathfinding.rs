//! # Pathfinding
//!
//! Uniform-cost search over walkable tiles.
//!
//! The search is seeded at the destination and expands to every reachable
//! tile, so one [`DijkstraMap`] answers "how do I get there" for any number
//! of movers as long as the destination stays put. Occupants are ignored;
//! only tile walkability matters.

use crate::game::{GameMap, Position};
use pathfinding::prelude::{build_path, dijkstra_all};
use std::collections::HashMap;

/// Cost surface toward a single destination.
#[derive(Debug, Clone)]
pub struct DijkstraMap {
    destination: Position,
    parents: HashMap<Position, (Position, u32)>,
}

impl DijkstraMap {
    /// Runs the search from `destination` over the map's walkable tiles.
    pub fn compute(map: &GameMap, destination: Position) -> Self {
        let parents = dijkstra_all(&destination, |&pos: &Position| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|&next| map.is_walkable(next))
                .map(|next| (next, 1u32))
                .collect::<Vec<_>>()
        });

        Self {
            destination,
            parents,
        }
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    /// Number of steps from `start` to the destination, if reachable.
    pub fn distance_from(&self, start: Position) -> Option<u32> {
        if start == self.destination {
            return Some(0);
        }
        self.parents.get(&start).map(|&(_, cost)| cost)
    }

    /// Waypoints from `start` to the destination.
    ///
    /// The start tile is excluded and the destination is the last element.
    /// The path is empty when `start` already is the destination or cannot
    /// reach it.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{DijkstraMap, GameMap, Position, Tile};
    ///
    /// let mut map = GameMap::new(6, 3, 1);
    /// for x in 1..5 {
    ///     map.set_tile(Position::new(x, 1), Tile::floor()).unwrap();
    /// }
    ///
    /// let surface = DijkstraMap::compute(&map, Position::new(4, 1));
    /// let path = surface.path_from(Position::new(1, 1));
    /// assert_eq!(
    ///     path,
    ///     vec![Position::new(2, 1), Position::new(3, 1), Position::new(4, 1)]
    /// );
    /// ```
    pub fn path_from(&self, start: Position) -> Vec<Position> {
        if start == self.destination || !self.parents.contains_key(&start) {
            return Vec::new();
        }

        // build_path walks from the search origin (our destination) to `start`
        let mut path = build_path(&start, &self.parents);
        path.reverse();
        path.remove(0);
        path
    }
}

/// Computes a one-off path between two positions.
pub fn path_to(map: &GameMap, from: Position, to: Position) -> Vec<Position> {
    DijkstraMap::compute(map, to).path_from(from)
}

/// Reuses the last cost surface while its destination does not change.
#[derive(Debug, Clone, Default)]
pub struct PathCache {
    surface: Option<DijkstraMap>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path from `from` to `to`, recomputing the surface only when `to` moved.
    pub fn path(&mut self, map: &GameMap, from: Position, to: Position) -> Vec<Position> {
        match &self.surface {
            Some(surface) if surface.destination() == to => surface.path_from(from),
            _ => {
                let surface = DijkstraMap::compute(map, to);
                let path = surface.path_from(from);
                self.surface = Some(surface);
                path
            }
        }
    }

    /// Drops the cached surface, e.g. after the map changed.
    pub fn clear(&mut self) {
        self.surface = None;
    }
}
