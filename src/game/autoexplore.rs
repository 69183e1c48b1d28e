//! # Autoexplore Module
//!
//! A headless player driver that dives for the down stairs.
//!
//! Each call picks exactly one player action by priority: spend a pending
//! level up, drink a potion when badly hurt, fight anything adjacent, grab
//! items underfoot, take the stairs when standing on them, and otherwise walk
//! the shortest route to the stairs. Walking is done with bumps, so a monster
//! standing in the way gets attacked.

use crate::game::{
    BumpAction, ConcreteAction, Consumable, DescendStairsAction, Direction, GameState,
    LevelUpAction, LevelUpChoice, MeleeAction, PickUpAction, Position, UseItemAction,
};
use crate::utils::path_to;
use crate::UndercroftResult;
use log::debug;

/// Autoexplore state carried between calls.
#[derive(Debug, Clone, Default)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Remaining steps of the route being followed
    pub current_path: Vec<Position>,
    /// Where the current route leads
    pub target: Option<Position>,
}

impl AutoexploreState {
    /// Creates a new, disabled autoexplore state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver that is already switched on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.reset();
        }
        self.enabled
    }

    /// Forgets the current route, e.g. after a floor change.
    pub fn reset(&mut self) {
        self.current_path.clear();
        self.target = None;
    }

    /// Picks the player's next action.
    ///
    /// Returns `None` once the game is over or no route to the stairs exists.
    pub fn next_action(&mut self, state: &GameState) -> UndercroftResult<Option<ConcreteAction>> {
        if state.is_game_over() {
            return Ok(None);
        }

        let player = state.player()?;
        let actor = player.id;
        let position = player.position;
        let stats = state.player_stats()?;

        if stats.level.requires_level_up() {
            return Ok(Some(ConcreteAction::LevelUp(LevelUpAction {
                actor,
                choice: LevelUpChoice::Constitution,
            })));
        }

        let badly_hurt = stats.fighter.hp() * 2 <= stats.fighter.max_hp;
        if badly_hurt && stats.fighter.hp() < stats.fighter.max_hp {
            let potion = stats.inventory.items().iter().find(|item| {
                matches!(
                    item.as_item().and_then(|i| i.consumable),
                    Some(Consumable::Healing { .. })
                )
            });
            if let Some(potion) = potion {
                debug!("Autoexplore drinks {} at {} HP", potion.name, stats.fighter.hp());
                return Ok(Some(ConcreteAction::UseItem(UseItemAction {
                    actor,
                    item: potion.id,
                    target: None,
                })));
            }
        }

        let adjacent_enemy = state.map.actors().find(|entity| {
            entity.id != actor
                && entity.has_ai()
                && entity.position.chebyshev_distance(position) == 1
        });
        if let Some(enemy) = adjacent_enemy {
            if let Some(direction) = Direction::from_delta(enemy.position - position) {
                return Ok(Some(ConcreteAction::Melee(MeleeAction { actor, direction })));
            }
        }

        if !stats.inventory.is_full() && state.map.items_at(position).next().is_some() {
            return Ok(Some(ConcreteAction::PickUp(PickUpAction { actor })));
        }

        let stairs = match state.map.down_stairs {
            Some(stairs) => stairs,
            None => return Ok(None),
        };
        if stairs == position {
            self.reset();
            return Ok(Some(ConcreteAction::DescendStairs(DescendStairsAction {
                actor,
            })));
        }

        // Arrived at the previous step
        if self.current_path.first() == Some(&position) {
            self.current_path.remove(0);
        }

        let on_route = self.target == Some(stairs)
            && self
                .current_path
                .first()
                .map_or(false, |next| next.chebyshev_distance(position) == 1);
        if !on_route {
            self.current_path = path_to(&state.map, position, stairs);
            self.target = Some(stairs);
        }

        if self.current_path.is_empty() {
            debug!("Autoexplore found no route from {} to {}", position, stairs);
            return Ok(None);
        }

        // The step is only dropped once reached, since a bump may attack instead
        let next = self.current_path[0];
        match Direction::from_delta(next - position) {
            Some(direction) => Ok(Some(ConcreteAction::Bump(BumpAction { actor, direction }))),
            None => {
                self.reset();
                Ok(None)
            }
        }
    }
}
