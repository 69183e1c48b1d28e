//! Integration tests for field of view on generated floors.

use proptest::prelude::*;
use undercroft::{config, generate_dungeon, Position};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Recomputing from the same spot gives the same visible set.
    #[test]
    fn visibility_is_idempotent(seed in any::<u64>(), pick in any::<usize>()) {
        let mut map = generate_dungeon(80, 43, 10, 5, 10, 1, seed).expect("generates");
        let floors: Vec<Position> = map.positions().filter(|&pos| map.is_walkable(pos)).collect();
        let observer = floors[pick % floors.len()];

        map.update_visibility(observer, config::FOV_RADIUS);
        let first = map.visible_positions();
        map.update_visibility(observer, config::FOV_RADIUS);
        let second = map.visible_positions();

        prop_assert_eq!(first, second);
    }

    /// Every visible tile has been seen, and the observer always sees itself.
    #[test]
    fn visible_tiles_are_remembered(seed in any::<u64>()) {
        let mut map = generate_dungeon(80, 43, 10, 5, 10, 1, seed).expect("generates");
        let start = map.player_start;
        let stairs = map.down_stairs.expect("stairs");

        map.update_visibility(start, config::FOV_RADIUS);
        map.update_visibility(stairs, config::FOV_RADIUS);

        prop_assert!(map.is_visible(stairs));
        for pos in map.positions() {
            if map.is_visible(pos) {
                prop_assert!(map.is_seen(pos));
            }
        }
        // The first spot is still remembered after moving away
        prop_assert!(map.is_seen(start));
    }
}

/// Nothing beyond the radius is ever lit.
#[test]
fn visibility_respects_radius() {
    for seed in 0..10 {
        let mut map = generate_dungeon(80, 43, 10, 5, 10, 1, seed).expect("generates");
        let start = map.player_start;
        map.update_visibility(start, config::FOV_RADIUS);

        for pos in map.visible_positions() {
            assert!(pos.chebyshev_distance(start) <= config::FOV_RADIUS as u32);
        }
    }
}
