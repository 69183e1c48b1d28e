//! # Generation Module
//!
//! Procedural content generation for dungeon floors.
//!
//! This module builds each floor of the dungeon: rectangular rooms placed
//! without overlap, L-shaped corridors between consecutive rooms, and the
//! monsters and items seeded into every room from floor-gated tables.

pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod population;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use population::*;

use crate::config;
use crate::game::{GameMap, Position, Tile, TileType};
use crate::{UndercroftError, UndercroftResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the floor size, how many rooms are attempted and how big they
/// may be. The depth selects the population tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Dungeon depth of the floor to build
    pub depth: u32,
    /// Map width in tiles
    pub map_width: u32,
    /// Map height in tiles
    pub map_height: u32,
    /// Number of room placement attempts
    pub max_rooms: u32,
    /// Minimum room edge, walls included
    pub min_room_size: u32,
    /// Maximum room edge, walls included
    pub max_room_size: u32,
}

impl GenerationConfig {
    /// Creates the standard configuration for the first floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.depth, 1);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// assert!(config.map_width > config.max_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            depth: config::FIRST_DEPTH,
            map_width: config::MAP_WIDTH,
            map_height: config::MAP_HEIGHT,
            max_rooms: config::MAX_ROOMS,
            min_room_size: config::MIN_ROOM_SIZE,
            max_room_size: config::MAX_ROOM_SIZE,
        }
    }

    /// Creates a configuration for testing with smaller, simpler floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            depth: config::FIRST_DEPTH,
            map_width: 40,
            map_height: 24,
            max_rooms: 6,
            min_room_size: 4,
            max_room_size: 7,
        }
    }

    /// Standard configuration for a given depth.
    pub fn for_depth(seed: u64, depth: u32) -> Self {
        Self {
            depth,
            ..Self::new(seed)
        }
    }

    /// Checks that rooms of every allowed size fit on the map.
    pub fn validate(&self) -> UndercroftResult<()> {
        if self.min_room_size < 3 {
            return Err(UndercroftError::GenerationFailed(format!(
                "Rooms need at least one interior tile, got minimum size {}",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(UndercroftError::GenerationFailed(format!(
                "Minimum room size {} exceeds maximum {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size >= self.map_width || self.max_room_size >= self.map_height {
            return Err(UndercroftError::GenerationFailed(format!(
                "Rooms up to {} tiles do not fit a {}x{} map",
                self.max_room_size, self.map_width, self.map_height
            )));
        }
        if self.max_rooms == 0 {
            return Err(UndercroftError::GenerationFailed(
                "At least one room placement attempt is required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A room candidate during generation.
///
/// Only its bounds and center matter once it has been stamped into the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectangularRoom {
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: u32,
    /// Height of the room (including walls)
    pub height: u32,
}

impl RectangularRoom {
    /// Creates a new room with the given bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{Position, RectangularRoom};
    ///
    /// let room = RectangularRoom::new(Position::new(5, 5), 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// ```
    pub fn new(top_left: Position, width: u32, height: u32) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right corner of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Checks if a position is inside this room, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if this room overlaps or touches another room.
    ///
    /// The test is inclusive, so accepted rooms always keep at least one
    /// tile between their walls.
    pub fn intersects(&self, other: &RectangularRoom) -> bool {
        self.top_left.x <= other.top_left.x + other.width as i32
            && self.top_left.x + self.width as i32 >= other.top_left.x
            && self.top_left.y <= other.top_left.y + other.height as i32
            && self.top_left.y + self.height as i32 >= other.top_left.y
    }

    /// Gets all floor positions within this room.
    pub fn interior_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Draws a uniformly random interior position.
    ///
    /// The room must have at least one interior tile.
    pub fn random_interior_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let bottom_right = self.bottom_right();
        Position::new(
            rng.gen_range(self.top_left.x + 1..=bottom_right.x - 1),
            rng.gen_range(self.top_left.y + 1..=bottom_right.y - 1),
        )
    }

    /// The room's tile buffer: a wall border around a floor interior.
    pub fn tiles(&self) -> Vec<Vec<Tile>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let border =
                            x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1;
                        if border {
                            Tile::wall()
                        } else {
                            Tile::floor()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Trait for procedural generators.
///
/// Generators take a configuration and a seeded random number generator, so
/// the same inputs always produce the same content.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> UndercroftResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> UndercroftResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a floor meets basic requirements.
    pub fn validate_map(map: &GameMap) -> UndercroftResult<()> {
        let floor_count = map
            .tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.tile_type == TileType::Floor)
            .count();

        if floor_count == 0 {
            return Err(UndercroftError::GenerationFailed(
                "Map has no floor tiles".to_string(),
            ));
        }

        match map.down_stairs {
            Some(stairs) if map.is_walkable(stairs) => Ok(()),
            _ => Err(UndercroftError::GenerationFailed(
                "Map has no reachable down staircase".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.map_width, 80);
        assert_eq!(config.map_height, 43);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());
        assert_eq!(GenerationConfig::for_depth(1, 6).depth, 6);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GenerationConfig::new(1);
        config.max_room_size = 80;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.min_room_size = 2;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.min_room_size = 9;
        config.max_room_size = 6;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.max_rooms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_room_geometry() {
        let room = RectangularRoom::new(Position::new(5, 5), 10, 8);

        assert_eq!(room.bottom_right(), Position::new(14, 12));
        assert_eq!(room.center(), Position::new(10, 9));

        assert!(room.contains(Position::new(5, 5)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(4, 5)));
        assert!(!room.contains(Position::new(15, 12)));
    }

    #[test]
    fn test_room_intersection_is_inclusive() {
        let room1 = RectangularRoom::new(Position::new(5, 5), 10, 8);
        let overlapping = RectangularRoom::new(Position::new(10, 8), 6, 6);
        let touching = RectangularRoom::new(Position::new(15, 5), 5, 5);
        let apart = RectangularRoom::new(Position::new(16, 5), 5, 5);
        // Tall but narrow rooms are checked against height, not width
        let below = RectangularRoom::new(Position::new(5, 14), 3, 9);

        assert!(room1.intersects(&overlapping));
        assert!(overlapping.intersects(&room1));
        assert!(room1.intersects(&touching));
        assert!(!room1.intersects(&apart));
        assert!(!apart.intersects(&room1));
        assert!(!room1.intersects(&below));
        assert!(!below.intersects(&room1));
    }

    #[test]
    fn test_room_tiles_buffer() {
        let room = RectangularRoom::new(Position::new(0, 0), 4, 5);
        let tiles = room.tiles();

        assert_eq!(tiles.len(), 5);
        assert!(tiles.iter().all(|row| row.len() == 4));
        assert_eq!(tiles[0][0].tile_type, TileType::Wall);
        assert_eq!(tiles[1][1].tile_type, TileType::Floor);
        assert_eq!(tiles[3][2].tile_type, TileType::Floor);
        assert_eq!(tiles[4][2].tile_type, TileType::Wall);
        assert_eq!(tiles[2][3].tile_type, TileType::Wall);

        let floors = tiles
            .iter()
            .flatten()
            .filter(|tile| tile.tile_type == TileType::Floor)
            .count();
        assert_eq!(floors, room.interior_positions().len());
    }

    #[test]
    fn test_random_interior_position() {
        let room = RectangularRoom::new(Position::new(3, 4), 5, 6);
        let interior: HashSet<_> = room.interior_positions().into_iter().collect();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            assert!(interior.contains(&room.random_interior_position(&mut rng)));
        }
    }

    #[test]
    fn test_validate_map() {
        let mut map = GameMap::new(10, 10, 1);
        assert!(utils::validate_map(&map).is_err());

        map.set_tile(Position::new(5, 5), Tile::floor()).unwrap();
        assert!(utils::validate_map(&map).is_err());

        map.place_down_stairs(Position::new(5, 6)).unwrap();
        assert!(utils::validate_map(&map).is_ok());
    }
}
