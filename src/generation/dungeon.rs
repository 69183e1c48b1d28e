//! # Dungeon Generation
//!
//! Room-and-corridor floor layout.
//!
//! A floor is built by attempting `max_rooms` random rectangles, keeping the
//! ones that touch no earlier room, seeding each kept room with monsters and
//! items, then joining consecutive rooms with L-shaped corridors. The player
//! enters at the center of the first room and the down staircase sits at the
//! center of the last one.

use crate::game::{GameMap, Position, Tile};
use crate::generation::{
    utils, EncounterGenerator, GenerationConfig, Generator, ItemGenerator, RectangularRoom,
};
use crate::{UndercroftError, UndercroftResult};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng};
use std::collections::{HashSet, VecDeque};

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// This generator creates floors by:
/// 1. Placing rooms randomly, discarding any that touch an earlier room
/// 2. Populating each kept room as it is placed
/// 3. Connecting consecutive rooms with L-shaped corridors
/// 4. Placing the down staircase in the last room
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Monster tables used for every room
    pub encounters: EncounterGenerator,
    /// Item tables used for every room
    pub items: ItemGenerator,
    /// Whether to flood-fill the result and reject disconnected floors
    pub ensure_connectivity: bool,
}

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator with the standard population tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{GenerationConfig, Generator, RoomCorridorGenerator};
    /// use undercroft::generation::utils;
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let config = GenerationConfig::for_testing(3);
    /// let mut rng = utils::create_rng(&config);
    /// let map = generator.generate(&config, &mut rng).unwrap();
    /// assert!(map.down_stairs.is_some());
    /// ```
    pub fn new() -> Self {
        Self {
            encounters: EncounterGenerator::new(),
            items: ItemGenerator::new(),
            ensure_connectivity: true,
        }
    }

    /// Builds a floor and also returns the rooms that were kept, in
    /// placement order.
    pub fn generate_layout(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> UndercroftResult<(GameMap, Vec<RectangularRoom>)> {
        config.validate()?;

        let mut map = GameMap::new(config.map_width, config.map_height, config.depth);
        let rooms = self.place_rooms(&mut map, config, rng);

        let first = rooms.first().copied().ok_or_else(|| {
            UndercroftError::GenerationFailed("Failed to place any rooms".to_string())
        })?;

        for pair in rooms.windows(2) {
            let horizontal_first = rng.gen_bool(0.5);
            carve_corridor(&mut map, pair[0].center(), pair[1].center(), horizontal_first)?;
        }

        map.player_start = first.center();
        if let Some(last) = rooms.last() {
            map.place_down_stairs(last.center())?;
        }

        if self.ensure_connectivity {
            validate_connectivity(&map, &rooms)?;
        }
        utils::validate_map(&map)?;

        info!(
            "Generated floor {} ({}x{}) with {} rooms and {} entities",
            config.depth,
            map.width,
            map.height,
            rooms.len(),
            map.entities().count()
        );

        Ok((map, rooms))
    }

    /// Makes `max_rooms` placement attempts, stamping and populating every
    /// accepted room as it is placed.
    fn place_rooms(
        &self,
        map: &mut GameMap,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Vec<RectangularRoom> {
        let mut rooms: Vec<RectangularRoom> = Vec::new();

        for attempt in 0..config.max_rooms {
            let candidate = self.room_candidate(config, rng);

            if rooms.iter().any(|room| room.intersects(&candidate)) {
                debug!("Room attempt {} at {} overlaps, skipping", attempt, candidate.top_left);
                continue;
            }

            map.stamp_room(&candidate);

            // The first room's center is where the player will stand
            let reserved = rooms.first().unwrap_or(&candidate).center();
            self.encounters
                .populate(map, &candidate, config.depth, Some(reserved), rng);
            self.items
                .populate(map, &candidate, config.depth, Some(reserved), rng);

            rooms.push(candidate);
        }

        rooms
    }

    /// Draws a room size, then a top-left corner leaving at least one tile
    /// of solid rock on the right and bottom edges.
    fn room_candidate(&self, config: &GenerationConfig, rng: &mut StdRng) -> RectangularRoom {
        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);

        let x = rng.gen_range(0..=config.map_width - width - 1);
        let y = rng.gen_range(0..=config.map_height - height - 1);

        RectangularRoom::new(Position::new(x as i32, y as i32), width, height)
    }
}

impl Generator<GameMap> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> UndercroftResult<GameMap> {
        self.generate_layout(config, rng).map(|(map, _)| map)
    }

    fn validate(&self, map: &GameMap, _config: &GenerationConfig) -> UndercroftResult<()> {
        utils::validate_map(map)
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tiles of the corridor from `start` to `end`, excluding `start`.
///
/// Walks one axis until it lines up with `end`, then the other. Every step
/// moves exactly one tile along a single axis, so consecutive tiles are
/// always cardinal neighbours.
pub fn corridor_between(start: Position, end: Position, horizontal_first: bool) -> Vec<Position> {
    let mut current = start;
    let mut horizontal = horizontal_first;
    let mut tiles = Vec::new();

    while current != end {
        let step = if horizontal {
            (end.x - current.x).signum()
        } else {
            (end.y - current.y).signum()
        };

        if step == 0 {
            horizontal = !horizontal;
            continue;
        }

        if horizontal {
            current.x += step;
        } else {
            current.y += step;
        }
        tiles.push(current);
    }

    tiles
}

/// Carves floor along the corridor between two room centers.
pub fn carve_corridor(
    map: &mut GameMap,
    start: Position,
    end: Position,
    horizontal_first: bool,
) -> UndercroftResult<()> {
    for pos in corridor_between(start, end, horizontal_first) {
        map.set_tile(pos, Tile::floor())?;
    }
    Ok(())
}

/// Checks that every room interior is reachable from the first room's
/// center over walkable, cardinally adjacent tiles.
pub fn validate_connectivity(map: &GameMap, rooms: &[RectangularRoom]) -> UndercroftResult<()> {
    let start = match rooms.first() {
        Some(room) => room.center(),
        None => return Ok(()),
    };

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for adjacent in pos.cardinal_adjacent_positions() {
            if map.is_walkable(adjacent) && visited.insert(adjacent) {
                queue.push_back(adjacent);
            }
        }
    }

    for (index, room) in rooms.iter().enumerate() {
        if let Some(pos) = room
            .interior_positions()
            .into_iter()
            .find(|pos| !visited.contains(pos))
        {
            return Err(UndercroftError::GenerationFailed(format!(
                "Room {} is not connected to the start ({} unreachable)",
                index, pos
            )));
        }
    }

    Ok(())
}

/// Number of seeds tried before giving up on a floor.
const GENERATION_ATTEMPTS: u64 = 8;

/// Builds a complete, populated floor from plain parameters.
///
/// The result depends only on the arguments. Should a layout fail
/// validation, generation retries with derived seeds before reporting an
/// error.
///
/// # Examples
///
/// ```
/// use undercroft::generate_dungeon;
///
/// let map = generate_dungeon(80, 43, 10, 5, 10, 1, 42).unwrap();
/// assert_eq!(map.width, 80);
/// assert!(map.is_walkable(map.player_start));
///
/// let again = generate_dungeon(80, 43, 10, 5, 10, 1, 42).unwrap();
/// assert_eq!(map.down_stairs, again.down_stairs);
/// ```
pub fn generate_dungeon(
    width: u32,
    height: u32,
    max_rooms: u32,
    min_size: u32,
    max_size: u32,
    depth: u32,
    seed: u64,
) -> UndercroftResult<GameMap> {
    let generator = RoomCorridorGenerator::new();
    let mut config = GenerationConfig {
        seed,
        depth,
        map_width: width,
        map_height: height,
        max_rooms,
        min_room_size: min_size,
        max_room_size: max_size,
    };
    config.validate()?;

    let mut last_error = None;
    for attempt in 0..GENERATION_ATTEMPTS {
        config.seed = seed.wrapping_add(attempt);
        let mut rng = utils::create_rng(&config);
        match generator.generate(&config, &mut rng) {
            Ok(map) => return Ok(map),
            Err(err) => {
                warn!(
                    "{} attempt {} for floor {} failed: {}",
                    generator.generator_type(),
                    attempt + 1,
                    depth,
                    err
                );
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        UndercroftError::GenerationFailed("No generation attempts were made".to_string())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileType;

    #[test]
    fn test_corridor_between_horizontal_first() {
        let tiles = corridor_between(Position::new(2, 2), Position::new(5, 4), true);
        assert_eq!(
            tiles,
            vec![
                Position::new(3, 2),
                Position::new(4, 2),
                Position::new(5, 2),
                Position::new(5, 3),
                Position::new(5, 4),
            ]
        );
    }

    #[test]
    fn test_corridor_between_vertical_first() {
        let tiles = corridor_between(Position::new(5, 4), Position::new(2, 2), false);
        assert_eq!(tiles.first(), Some(&Position::new(5, 3)));
        assert_eq!(tiles.last(), Some(&Position::new(2, 2)));
        assert_eq!(tiles.len(), 5);
        for pair in tiles.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn test_corridor_between_same_point() {
        assert!(corridor_between(Position::new(3, 3), Position::new(3, 3), true).is_empty());
    }

    #[test]
    fn test_generation_with_small_level() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing(12345);
        let mut rng = utils::create_rng(&config);

        let (map, rooms) = generator.generate_layout(&config, &mut rng).unwrap();
        assert_eq!(map.width, config.map_width);
        assert_eq!(map.height, config.map_height);
        assert!(!rooms.is_empty());
        assert!(rooms.len() <= config.max_rooms as usize);

        assert_eq!(map.player_start, rooms[0].center());
        assert_eq!(map.down_stairs, Some(rooms[rooms.len() - 1].center()));
        let stairs = map.down_stairs.unwrap();
        assert_eq!(map.tile_at(stairs).unwrap().tile_type, TileType::StairsDown);
    }

    #[test]
    fn test_rooms_never_touch() {
        let generator = RoomCorridorGenerator::new();
        for seed in 0..20 {
            let config = GenerationConfig::new(seed);
            let mut rng = utils::create_rng(&config);
            let (_, rooms) = generator.generate_layout(&config, &mut rng).unwrap();

            for (i, a) in rooms.iter().enumerate() {
                for b in rooms.iter().skip(i + 1) {
                    assert!(!a.intersects(b), "seed {} placed touching rooms", seed);
                }
            }
        }
    }

    #[test]
    fn test_player_start_is_never_occupied() {
        let generator = RoomCorridorGenerator::new();
        for seed in 0..30 {
            let config = GenerationConfig::for_depth(seed, 7);
            let mut rng = utils::create_rng(&config);
            let map = generator.generate(&config, &mut rng).unwrap();
            assert!(!map.is_occupied(map.player_start));
        }
    }

    #[test]
    fn test_single_room_floor() {
        let generator = RoomCorridorGenerator::new();
        let mut config = GenerationConfig::for_testing(9);
        config.max_rooms = 1;
        let mut rng = utils::create_rng(&config);

        let (map, rooms) = generator.generate_layout(&config, &mut rng).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(map.down_stairs, Some(map.player_start));
    }

    #[test]
    fn test_connectivity_rejects_isolated_room() {
        let mut map = GameMap::new(30, 12, 1);
        let a = RectangularRoom::new(Position::new(1, 1), 5, 5);
        let b = RectangularRoom::new(Position::new(20, 3), 5, 5);
        map.stamp_room(&a);
        map.stamp_room(&b);
        assert!(validate_connectivity(&map, &[a, b]).is_err());

        carve_corridor(&mut map, a.center(), b.center(), true).unwrap();
        assert!(validate_connectivity(&map, &[a, b]).is_ok());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let first = generate_dungeon(60, 30, 8, 4, 8, 2, 77).unwrap();
        let second = generate_dungeon(60, 30, 8, 4, 8, 2, 77).unwrap();

        assert_eq!(first.tiles, second.tiles);
        assert_eq!(first.player_start, second.player_start);
        let names = |map: &GameMap| -> Vec<(String, Position)> {
            map.entities().map(|e| (e.name.clone(), e.position)).collect()
        };
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_generate_dungeon_rejects_bad_parameters() {
        assert!(generate_dungeon(10, 10, 5, 5, 12, 1, 1).is_err());
        assert!(generate_dungeon(40, 40, 0, 5, 8, 1, 1).is_err());
    }
}
