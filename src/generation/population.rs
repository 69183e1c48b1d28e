//! # Population Tables
//!
//! Floor-indexed tables deciding how much spawns in a room and what it is.
//!
//! Both tables are keyed by a floor threshold. A [`FloorMaximum`] is a step
//! function: the value of the highest threshold not above the current floor
//! applies. A [`WeightedTable`] accumulates: every threshold at or below the
//! current floor contributes its entries, and a later threshold that names an
//! entry again replaces that entry's weight.

use crate::game::{EntityId, GameMap, Position};
use crate::generation::RectangularRoom;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Step function from floor to a maximum count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorMaximum {
    steps: Vec<(u32, u32)>,
}

impl FloorMaximum {
    /// Builds the table from `(floor, value)` pairs in any order.
    pub fn new(steps: &[(u32, u32)]) -> Self {
        let mut steps = steps.to_vec();
        steps.sort_by_key(|&(floor, _)| floor);
        Self { steps }
    }

    /// Value for a floor; zero below the first threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::FloorMaximum;
    ///
    /// let table = FloorMaximum::new(&[(1, 2), (4, 3), (6, 5)]);
    /// assert_eq!(table.value_for(1), 2);
    /// assert_eq!(table.value_for(5), 3);
    /// assert_eq!(table.value_for(30), 5);
    /// ```
    pub fn value_for(&self, floor: u32) -> u32 {
        self.steps
            .iter()
            .take_while(|&&(threshold, _)| threshold <= floor)
            .last()
            .map(|&(_, value)| value)
            .unwrap_or(0)
    }
}

/// Depth-gated weighted choice between spawn kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTable<T> {
    tiers: Vec<(u32, Vec<(T, u32)>)>,
}

impl<T: Copy + PartialEq> WeightedTable<T> {
    /// Builds the table from `(floor, entries)` tiers in any order.
    pub fn new(tiers: Vec<(u32, Vec<(T, u32)>)>) -> Self {
        let mut tiers = tiers;
        tiers.sort_by_key(|(floor, _)| *floor);
        Self { tiers }
    }

    /// Active entries and weights for a floor, in first-introduced order.
    pub fn weights_for(&self, floor: u32) -> Vec<(T, u32)> {
        let mut active: Vec<(T, u32)> = Vec::new();

        for (_, entries) in self.tiers.iter().take_while(|(threshold, _)| *threshold <= floor) {
            for &(kind, weight) in entries {
                match active.iter_mut().find(|(existing, _)| *existing == kind) {
                    Some(slot) => slot.1 = weight,
                    None => active.push((kind, weight)),
                }
            }
        }

        active.retain(|&(_, weight)| weight > 0);
        active
    }

    /// Draws one entry for a floor, or None when nothing is available yet.
    pub fn choose<R: Rng + ?Sized>(&self, floor: u32, rng: &mut R) -> Option<T> {
        let active = self.weights_for(floor);
        let distribution = WeightedIndex::new(active.iter().map(|&(_, weight)| weight)).ok()?;
        Some(active[distribution.sample(rng)].0)
    }
}

/// Seeds a room's interior with up to `maximum` entities.
///
/// Draws a count in `0..=maximum`, then for each slot a random interior
/// position. Slots landing on an occupied tile or on `reserved` are skipped
/// rather than redrawn. `choose` picks what to spawn and `spawn` places it.
pub fn populate_room<T, R, C, S>(
    map: &mut GameMap,
    room: &RectangularRoom,
    maximum: u32,
    reserved: Option<Position>,
    rng: &mut R,
    mut choose: C,
    spawn: S,
) -> Vec<EntityId>
where
    R: Rng + ?Sized,
    C: FnMut(&mut R) -> Option<T>,
    S: Fn(T, &mut GameMap, Position) -> EntityId,
{
    let count = rng.gen_range(0..=maximum);
    let mut spawned = Vec::new();

    for _ in 0..count {
        let position = room.random_interior_position(rng);
        if reserved == Some(position) || map.is_occupied(position) {
            continue;
        }
        if let Some(kind) = choose(rng) {
            spawned.push(spawn(kind, map, position));
        }
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MonsterKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Spawn {
        Rat,
        Bat,
        Ogre,
    }

    fn table() -> WeightedTable<Spawn> {
        WeightedTable::new(vec![
            (3, vec![(Spawn::Ogre, 10)]),
            (0, vec![(Spawn::Rat, 80), (Spawn::Bat, 20)]),
            (5, vec![(Spawn::Ogre, 50), (Spawn::Bat, 0)]),
        ])
    }

    #[test]
    fn test_floor_maximum_steps() {
        let table = FloorMaximum::new(&[(4, 2), (1, 1)]);
        assert_eq!(table.value_for(0), 0);
        assert_eq!(table.value_for(1), 1);
        assert_eq!(table.value_for(3), 1);
        assert_eq!(table.value_for(4), 2);
        assert_eq!(table.value_for(99), 2);
    }

    #[test]
    fn test_weights_unlock_with_depth() {
        let table = table();
        assert_eq!(table.weights_for(1), vec![(Spawn::Rat, 80), (Spawn::Bat, 20)]);
        assert_eq!(
            table.weights_for(3),
            vec![(Spawn::Rat, 80), (Spawn::Bat, 20), (Spawn::Ogre, 10)]
        );
    }

    #[test]
    fn test_later_tier_overrides_weight() {
        // Bat drops out entirely once its weight is set to zero
        assert_eq!(
            table().weights_for(5),
            vec![(Spawn::Rat, 80), (Spawn::Ogre, 50)]
        );
    }

    #[test]
    fn test_choose_only_returns_active_entries() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let spawn = table.choose(1, &mut rng).unwrap();
            assert_ne!(spawn, Spawn::Ogre);
        }
    }

    #[test]
    fn test_choose_empty_table() {
        let table: WeightedTable<Spawn> = WeightedTable::new(vec![(4, vec![(Spawn::Rat, 1)])]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(table.choose(2, &mut rng), None);
    }

    #[test]
    fn test_populate_room_respects_interior_and_reservation() {
        let mut map = GameMap::new(20, 20, 1);
        let room = RectangularRoom::new(Position::new(2, 2), 5, 5);
        map.stamp_room(&room);
        let reserved = room.center();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..20 {
            let ids = populate_room(
                &mut map,
                &room,
                4,
                Some(reserved),
                &mut rng,
                |_| Some(MonsterKind::Orc),
                MonsterKind::spawn,
            );
            for id in ids {
                let pos = map.entity(id).unwrap().position;
                assert!(room.interior_positions().contains(&pos));
                assert_ne!(pos, reserved);
            }
        }

        // Never two entities on one tile
        let mut positions: Vec<_> = map.entities().map(|e| e.position).collect();
        let total = positions.len();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), total);
        assert!(total <= 8);
    }

    #[test]
    fn test_choose_is_deterministic() {
        let table = table();
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        let first: Vec<_> = (0..20).map(|_| table.choose(6, &mut a)).collect();
        let second: Vec<_> = (0..20).map(|_| table.choose(6, &mut b)).collect();
        assert_eq!(first, second);
    }
}
