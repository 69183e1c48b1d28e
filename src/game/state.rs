//! # Game State Module
//!
//! Central game state and the turn scheduler.
//!
//! [`GameState`] owns the current floor, knows which entity is the player and
//! drives one complete turn per player action: the player acts, every
//! monster on the floor answers in map order, then the player's field of view
//! is recomputed. It also builds the next floor when the player takes the
//! stairs and folds every event into running statistics.

use crate::game::ai;
use crate::game::entities::build_player;
use crate::game::{
    Action, ActionContext, Actor, AutoexploreState, ConcreteAction, Entity, EntityId, GameEvent,
    GameMap, Position,
};
use crate::generation::{generate_dungeon, GenerationConfig};
use crate::utils::PathCache;
use crate::{config, UndercroftError, UndercroftResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lines of history kept in the message log.
const MESSAGE_LOG_CAPACITY: usize = 200;

/// Central game state containing all game data and systems.
///
/// This is the main coordination point for all game operations. It owns the
/// current floor outright; descending replaces the map wholesale and carries
/// only the player entity across.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The floor the player is on
    pub map: GameMap,
    /// The player entity ID
    pub player_id: EntityId,
    /// Number of completed turns
    pub turn_number: u64,
    /// Random number generator seed
    pub rng_seed: u64,
    /// Floor size and room parameters used for every new floor
    pub config: GenerationConfig,
    /// Game statistics for player progress
    pub statistics: GameStatistics,
    /// Current game completion state
    pub completion_state: GameCompletionState,
    /// Most recent log lines, oldest first
    pub messages: Vec<String>,
    /// Random number generator for monster decisions
    #[serde(skip, default = "unseeded_rng")]
    rng: StdRng,
    /// Cost surface reused while the player stands still
    #[serde(skip)]
    paths: PathCache,
    /// Autoexplore driver state (not serialized)
    #[serde(skip)]
    pub autoexplore_state: AutoexploreState,
}

fn unseeded_rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of enemies the player killed
    pub enemies_defeated: u32,
    /// Number of items picked up
    pub items_collected: u32,
    /// Number of consumables used up
    pub items_used: u32,
    /// Total damage dealt by the player
    pub damage_dealt: u64,
    /// Total damage taken by the player
    pub damage_taken: u64,
    /// Total HP recovered by the player
    pub health_recovered: u64,
    /// Experience earned
    pub experience_gained: u64,
    /// Number of times the player has died
    pub deaths: u32,
    /// Deepest floor reached
    pub max_depth_reached: u32,
    /// Number of staircases taken
    pub floors_descended: u32,
    /// Total steps taken by the player
    pub steps_taken: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    ///
    /// Only events involving `player` count.
    pub fn update_from_event(&mut self, event: &GameEvent, player: EntityId) {
        match event {
            GameEvent::EntityMoved { entity_id, .. } if *entity_id == player => {
                self.steps_taken += 1;
            }
            GameEvent::EntityDamaged {
                entity_id,
                damage,
                source,
            } => {
                if *entity_id == player {
                    self.damage_taken += *damage as u64;
                } else if *source == Some(player) {
                    self.damage_dealt += *damage as u64;
                }
            }
            GameEvent::EntityDied { entity_id, killer } => {
                if *entity_id == player {
                    self.deaths += 1;
                } else if *killer == Some(player) {
                    self.enemies_defeated += 1;
                }
            }
            GameEvent::HealthRecovered { entity_id, amount } if *entity_id == player => {
                self.health_recovered += *amount as u64;
            }
            GameEvent::ItemPickedUp { entity_id, .. } if *entity_id == player => {
                self.items_collected += 1;
            }
            GameEvent::ItemConsumed { entity_id, .. } if *entity_id == player => {
                self.items_used += 1;
            }
            GameEvent::XpGained { entity_id, amount } if *entity_id == player => {
                self.experience_gained += u64::from(*amount);
            }
            GameEvent::DescendedStairs { entity_id, .. } if *entity_id == player => {
                self.floors_descended += 1;
            }
            _ => {}
        }
    }
}

/// Game completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player died; only the log may still be read
    PlayerDied,
}

impl GameState {
    /// Starts a new game on the standard first floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{GameCompletionState, GameState};
    ///
    /// let state = GameState::new(12345).unwrap();
    /// assert_eq!(state.turn_number, 0);
    /// assert_eq!(state.depth(), 1);
    /// assert_eq!(state.completion_state, GameCompletionState::Playing);
    /// assert_eq!(state.player().unwrap().position, state.map.player_start);
    /// ```
    pub fn new(seed: u64) -> UndercroftResult<Self> {
        Self::with_config(GenerationConfig::new(seed))
    }

    /// Starts a new game with custom floor parameters.
    pub fn with_config(config: GenerationConfig) -> UndercroftResult<Self> {
        config.validate()?;
        let seed = config.seed;
        let mut map = build_floor(&config, config.depth)?;

        let start = map.player_start;
        let player = build_player(&mut map, start);
        let player_id = map.add_entity(player);
        map.update_visibility(start, config::FOV_RADIUS);

        let mut statistics = GameStatistics::new();
        statistics.max_depth_reached = map.depth;

        info!("New game with seed {} on floor {}", seed, map.depth);

        Ok(Self {
            map,
            player_id,
            turn_number: 0,
            rng_seed: seed,
            config,
            statistics,
            completion_state: GameCompletionState::Playing,
            messages: vec!["Hello and welcome, adventurer, to yet another dungeon!".to_string()],
            rng: StdRng::seed_from_u64(seed),
            paths: PathCache::new(),
            autoexplore_state: AutoexploreState::new(),
        })
    }

    /// Current dungeon depth.
    pub fn depth(&self) -> u32 {
        self.map.depth
    }

    /// The player entity.
    pub fn player(&self) -> UndercroftResult<&Entity> {
        self.map
            .entity(self.player_id)
            .ok_or_else(|| UndercroftError::InvalidState("No player found".to_string()))
    }

    /// The player's combat and inventory components.
    pub fn player_stats(&self) -> UndercroftResult<&Actor> {
        self.player()?
            .as_actor()
            .ok_or_else(|| UndercroftError::InvalidState("Player is not an actor".to_string()))
    }

    pub fn player_position(&self) -> UndercroftResult<Position> {
        Ok(self.player()?.position)
    }

    /// Whether no further actions will be accepted.
    pub fn is_game_over(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    /// Resolves one player action and, if it took time, the monsters' reply.
    ///
    /// A failed action changes nothing and gives the monsters no turn; its
    /// reason is logged and returned as the error. Taking the stairs builds
    /// the next floor in place of the monster turn.
    pub fn process_player_action(
        &mut self,
        action: &ConcreteAction,
    ) -> UndercroftResult<Vec<GameEvent>> {
        if self.is_game_over() {
            return Err(UndercroftError::PlayerDead);
        }
        if action.actor() != self.player_id {
            return Err(UndercroftError::InvalidState(format!(
                "{} is not the player",
                action.actor()
            )));
        }

        let mut events = {
            let mut ctx = ActionContext::new(&mut self.map, self.player_id);
            match action.perform(&mut ctx) {
                Ok(events) => events,
                Err(UndercroftError::Impossible(reason)) => {
                    debug!("Player {} failed: {}", action.action_type(), reason);
                    self.push_message(reason.to_string());
                    return Err(reason.into());
                }
                Err(other) => return Err(other),
            }
        };

        let descended = events
            .iter()
            .any(|event| matches!(event, GameEvent::DescendedStairs { .. }));

        if descended {
            events.extend(self.enter_next_floor()?);
        } else if action.consumes_turn() {
            events.extend(self.handle_enemy_turns());
        }

        if action.consumes_turn() {
            self.turn_number += 1;
        }

        let position = self.player_position()?;
        self.map.update_visibility(position, config::FOV_RADIUS);

        self.record(&events);
        Ok(events)
    }

    /// Gives every living monster on the floor one action, in map order.
    fn handle_enemy_turns(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut ctx = ActionContext::new(&mut self.map, self.player_id);

        for id in ctx.map.entity_ids() {
            if id == self.player_id {
                continue;
            }
            if !ctx.map.entity(self.player_id).map_or(false, Entity::is_alive) {
                break;
            }
            events.extend(ai::take_turn(&mut ctx, id, &mut self.rng, &mut self.paths));
        }

        events
    }

    /// Replaces the current floor with a freshly generated deeper one and
    /// moves the player onto its start tile.
    fn enter_next_floor(&mut self) -> UndercroftResult<Vec<GameEvent>> {
        let depth = self.map.depth + 1;
        let mut next = build_floor(&self.config, depth)?;

        let mut player = self
            .map
            .remove_entity(self.player_id)
            .ok_or_else(|| UndercroftError::InvalidState("No player found".to_string()))?;
        player.position = next.player_start;
        next.add_entity(player);

        self.map = next;
        self.paths.clear();
        self.autoexplore_state.reset();
        self.statistics.max_depth_reached = self.statistics.max_depth_reached.max(depth);

        info!("Player descended to floor {}", depth);
        Ok(Vec::new())
    }

    /// Folds events into statistics, the message log and the completion state.
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            self.statistics.update_from_event(event, self.player_id);

            match event {
                GameEvent::Message { text, .. } => self.push_message(text.clone()),
                GameEvent::EntityDied { entity_id, .. } if *entity_id == self.player_id => {
                    info!("Player died on floor {} after {} turns", self.depth(), self.turn_number);
                    self.completion_state = GameCompletionState::PlayerDied;
                }
                _ => {}
            }
        }
    }

    fn push_message(&mut self, text: String) {
        self.messages.push(text);
        if self.messages.len() > MESSAGE_LOG_CAPACITY {
            let excess = self.messages.len() - MESSAGE_LOG_CAPACITY;
            self.messages.drain(..excess);
        }
    }

    /// Toggles the autoexplore driver.
    pub fn toggle_autoexplore(&mut self) -> bool {
        self.autoexplore_state.toggle()
    }

    /// Next action the autoexplore driver would take, if it is enabled.
    pub fn autoexplore_action(&mut self) -> UndercroftResult<Option<ConcreteAction>> {
        if !self.autoexplore_state.enabled || self.is_game_over() {
            return Ok(None);
        }
        let mut driver = std::mem::take(&mut self.autoexplore_state);
        let action = driver.next_action(self);
        self.autoexplore_state = driver;
        action
    }

    /// Saves the game state to JSON.
    pub fn save_to_json(&self) -> UndercroftResult<String> {
        serde_json::to_string_pretty(self).map_err(UndercroftError::from)
    }

    /// Loads game state from JSON.
    ///
    /// The random number generator is reseeded from the seed and turn count.
    pub fn load_from_json(json: &str) -> UndercroftResult<Self> {
        let mut state: Self = serde_json::from_str(json)?;
        state.rng = StdRng::seed_from_u64(state.rng_seed.wrapping_add(state.turn_number));
        if !state.map.contains_entity(state.player_id) {
            return Err(UndercroftError::InvalidState(format!(
                "Saved player {} is not on the saved floor",
                state.player_id
            )));
        }
        Ok(state)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> UndercroftResult<()> {
        fs::write(path, self.save_to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> UndercroftResult<Self> {
        Self::load_from_json(&fs::read_to_string(path)?)
    }
}

/// Generates the floor for `depth` from the game's base configuration.
///
/// Each depth gets its own seed derived from the game seed, so a floor is the
/// same no matter how the player got there.
fn build_floor(config: &GenerationConfig, depth: u32) -> UndercroftResult<GameMap> {
    generate_dungeon(
        config.map_width,
        config.map_height,
        config.max_rooms,
        config.min_room_size,
        config.max_room_size,
        depth,
        config.seed.wrapping_add(u64::from(depth) * 1000),
    )
}
