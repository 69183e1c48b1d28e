//! Property tests for generated floors.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};
use undercroft::generation::utils;
use undercroft::{
    generate_dungeon, GameMap, GenerationConfig, Position, RoomCorridorGenerator, TileType,
};

/// Every tile reachable from `start` over walkable tiles, 8-way.
fn reachable_from(map: &GameMap, start: Position) -> HashSet<Position> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for next in pos.adjacent_positions() {
            if map.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_rooms_never_overlap(seed in any::<u64>(), depth in 1_u32..10) {
        let config = GenerationConfig::for_depth(seed, depth);
        let mut rng = utils::create_rng(&config);
        let (_, rooms) = RoomCorridorGenerator::new()
            .generate_layout(&config, &mut rng)
            .expect("standard configuration always generates");

        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                let disjoint = a.bottom_right().x < b.top_left.x
                    || b.bottom_right().x < a.top_left.x
                    || a.bottom_right().y < b.top_left.y
                    || b.bottom_right().y < a.top_left.y;
                prop_assert!(disjoint, "seed={seed}: {:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn every_room_is_reachable_from_the_start(seed in any::<u64>(), depth in 1_u32..10) {
        let config = GenerationConfig::for_depth(seed, depth);
        let mut rng = utils::create_rng(&config);
        let (map, rooms) = RoomCorridorGenerator::new()
            .generate_layout(&config, &mut rng)
            .expect("standard configuration always generates");

        let reachable = reachable_from(&map, map.player_start);
        for room in &rooms {
            for pos in room.interior_positions() {
                prop_assert!(reachable.contains(&pos), "seed={seed}: {} unreachable", pos);
            }
        }
        let stairs = map.down_stairs.expect("every floor has stairs");
        prop_assert!(reachable.contains(&stairs));
    }

    #[test]
    fn floors_have_one_staircase_and_sane_entities(seed in any::<u64>(), depth in 1_u32..10) {
        let map = generate_dungeon(80, 43, 10, 5, 10, depth, seed)
            .expect("standard parameters always generate");

        let stairs = map
            .positions()
            .filter(|&pos| map.tile_at(pos).map(|t| t.tile_type) == Some(TileType::StairsDown))
            .count();
        prop_assert_eq!(stairs, 1);

        let mut occupied = HashSet::new();
        for entity in map.entities() {
            prop_assert!(map.is_walkable(entity.position));
            prop_assert!(entity.position != map.player_start);
            prop_assert!(occupied.insert(entity.position), "two entities share {}", entity.position);
            prop_assert_eq!(entity.id.depth, depth);
        }
    }

    #[test]
    fn generation_is_reproducible(seed in any::<u64>()) {
        let a = generate_dungeon(60, 30, 8, 4, 8, 3, seed).expect("generates");
        let b = generate_dungeon(60, 30, 8, 4, 8, 3, seed).expect("generates");
        prop_assert_eq!(&a.tiles, &b.tiles);
        prop_assert_eq!(a.entity_ids(), b.entity_ids());
    }
}

/// Deep floors are allowed to hold trolls; shallow ones never do.
#[test]
fn trolls_only_appear_from_floor_three() {
    for seed in 0..40 {
        let map = generate_dungeon(80, 43, 10, 5, 10, 2, seed).expect("generates");
        assert!(map.entities().all(|entity| entity.name != "Troll"));
    }

    let deep_trolls: usize = (0..40)
        .map(|seed| {
            let map = generate_dungeon(80, 43, 10, 5, 10, 8, seed).expect("generates");
            map.entities().filter(|entity| entity.name == "Troll").count()
        })
        .sum();
    assert!(deep_trolls > 0);
}

/// Shallow floors only ever spawn health potions.
#[test]
fn first_floor_items_are_potions() {
    for seed in 0..40 {
        let map = generate_dungeon(80, 43, 10, 5, 10, 1, seed).expect("generates");
        assert!(map.items().all(|item| item.name == "Health Potion"));
    }
}
