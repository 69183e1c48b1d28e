//! # Encounter Generation
//!
//! Monster templates and the floor tables deciding which monsters appear
//! and how many share a room.

use crate::game::world::{Color, Graphic};
use crate::game::{Actor, Ai, Entity, EntityId, Fighter, GameMap, Inventory, Level, Position};
use crate::generation::population::{populate_room, FloorMaximum, WeightedTable};
use crate::generation::RectangularRoom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Every kind of monster the dungeon can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Orc,
    Troll,
}

impl MonsterKind {
    pub fn name(self) -> &'static str {
        match self {
            MonsterKind::Orc => "Orc",
            MonsterKind::Troll => "Troll",
        }
    }

    /// Builds a fresh monster entity.
    pub fn build(self, id: EntityId, position: Position) -> Entity {
        let (graphic, fighter, xp) = match self {
            MonsterKind::Orc => (
                Graphic::new('o', Color(63, 127, 63), Color::BLACK),
                Fighter::new(10, 3, 0),
                35,
            ),
            MonsterKind::Troll => (
                Graphic::new('T', Color(0, 127, 0), Color::BLACK),
                Fighter::new(16, 4, 1),
                100,
            ),
        };

        Entity::new_actor(
            id,
            self.name(),
            position,
            graphic,
            Actor::new(
                fighter,
                Some(Ai::hostile()),
                Inventory::new(0),
                Level::monster(xp),
            ),
        )
    }

    /// Builds a monster and places it on the map.
    pub fn spawn(self, map: &mut GameMap, position: Position) -> EntityId {
        let id = map.allocate_id();
        map.add_entity(self.build(id, position))
    }
}

/// How many monsters a room may hold and which ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterGenerator {
    pub max_per_room: FloorMaximum,
    pub table: WeightedTable<MonsterKind>,
}

impl EncounterGenerator {
    /// The standard monster tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{EncounterGenerator, MonsterKind};
    ///
    /// let encounters = EncounterGenerator::new();
    /// assert_eq!(encounters.max_per_room.value_for(1), 2);
    /// assert_eq!(encounters.table.weights_for(1), vec![(MonsterKind::Orc, 80)]);
    /// ```
    pub fn new() -> Self {
        Self {
            max_per_room: FloorMaximum::new(&[(1, 2), (4, 3), (6, 5)]),
            table: WeightedTable::new(vec![
                (0, vec![(MonsterKind::Orc, 80)]),
                (3, vec![(MonsterKind::Troll, 15)]),
                (5, vec![(MonsterKind::Troll, 30)]),
                (7, vec![(MonsterKind::Troll, 60)]),
            ]),
        }
    }

    /// Seeds a room with monsters for the given depth.
    pub fn populate<R: Rng + ?Sized>(
        &self,
        map: &mut GameMap,
        room: &RectangularRoom,
        depth: u32,
        reserved: Option<Position>,
        rng: &mut R,
    ) -> Vec<EntityId> {
        populate_room(
            map,
            room,
            self.max_per_room.value_for(depth),
            reserved,
            rng,
            |rng| self.table.choose(depth, rng),
            MonsterKind::spawn,
        )
    }
}

impl Default for EncounterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest monster group a room on `depth` can hold.
pub fn max_monsters_for_floor(depth: u32) -> u32 {
    EncounterGenerator::new().max_per_room.value_for(depth)
}
