//! # AI Module
//!
//! Monster behaviour as a small state machine.
//!
//! An actor's [`Ai`] is taken out of the entity, asked for a decision, and
//! the resulting state is put back before the chosen action runs. A failed
//! monster action never aborts the turn; the monster simply waits.

use crate::game::actions::{
    Action, ActionContext, BumpAction, ConcreteAction, GameEvent, MeleeAction, MessageCategory,
    MoveAction, WaitAction,
};
use crate::game::world::GameMap;
use crate::game::{Direction, EntityId, Position};
use crate::utils::PathCache;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Whether a hostile monster has noticed its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileState {
    Idle,
    Pursuing,
}

/// Chases and attacks the player once it has been seen.
///
/// Keeps following its last path after losing sight of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileAi {
    pub state: HostileState,
    /// Remaining waypoints toward the last known target position
    pub path: Vec<Position>,
}

impl HostileAi {
    pub fn new() -> Self {
        Self {
            state: HostileState::Idle,
            path: Vec::new(),
        }
    }
}

impl Default for HostileAi {
    fn default() -> Self {
        Self::new()
    }
}

/// Behaviour attached to a non-player actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    Hostile(HostileAi),
    /// Stumbles around at random, then returns to `previous`
    Confused {
        previous: Box<Ai>,
        turns_remaining: u32,
    },
}

/// What an AI wants to do this turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: ConcreteAction,
    /// State to store back on the actor
    pub next: Ai,
    /// Events produced by the state change itself
    pub events: Vec<GameEvent>,
}

/// Read-only world view plus the shared resources an AI may use.
pub struct AiContext<'a> {
    pub map: &'a GameMap,
    pub target: EntityId,
    pub rng: &'a mut StdRng,
    pub paths: &'a mut PathCache,
}

impl Ai {
    pub fn hostile() -> Self {
        Ai::Hostile(HostileAi::new())
    }

    /// Wraps an existing behaviour in confusion for `turns` turns.
    pub fn confused(previous: Ai, turns: u32) -> Self {
        Ai::Confused {
            previous: Box::new(previous),
            turns_remaining: turns,
        }
    }

    pub fn is_confused(&self) -> bool {
        matches!(self, Ai::Confused { .. })
    }

    /// Chooses an action for `actor` and the state it moves to.
    pub fn decide(self, actor: EntityId, ctx: &mut AiContext<'_>) -> Decision {
        match self {
            Ai::Hostile(hostile) => decide_hostile(hostile, actor, ctx),
            Ai::Confused {
                previous,
                turns_remaining,
            } => decide_confused(*previous, turns_remaining, actor, ctx),
        }
    }
}

fn wait(actor: EntityId) -> ConcreteAction {
    ConcreteAction::Wait(WaitAction { actor })
}

fn decide_hostile(mut ai: HostileAi, actor: EntityId, ctx: &mut AiContext<'_>) -> Decision {
    let (position, target_position) = match (ctx.map.entity(actor), ctx.map.entity(ctx.target)) {
        (Some(me), Some(target)) => (me.position, target.position),
        _ => {
            return Decision {
                action: wait(actor),
                next: Ai::Hostile(ai),
                events: Vec::new(),
            }
        }
    };

    // Visibility is symmetric: if the player can see this tile, this actor sees the player
    let can_see_target = ctx.map.is_visible(position);
    if can_see_target {
        ai.state = HostileState::Pursuing;

        if position.chebyshev_distance(target_position) <= 1 {
            if let Some(direction) = Direction::from_delta(target_position - position) {
                return Decision {
                    action: ConcreteAction::Melee(MeleeAction { actor, direction }),
                    next: Ai::Hostile(ai),
                    events: Vec::new(),
                };
            }
        }

        ai.path = ctx.paths.path(ctx.map, position, target_position);
    }

    let action = if ai.path.is_empty() {
        None
    } else {
        let next = ai.path.remove(0);
        match Direction::from_delta(next - position) {
            Some(direction) => Some(ConcreteAction::Move(MoveAction { actor, direction })),
            None => {
                // Knocked off the path; forget it
                ai.path.clear();
                None
            }
        }
    };

    let action = action.unwrap_or_else(|| {
        if !can_see_target {
            ai.state = HostileState::Idle;
        }
        wait(actor)
    });

    Decision {
        action,
        next: Ai::Hostile(ai),
        events: Vec::new(),
    }
}

fn decide_confused(
    previous: Ai,
    turns_remaining: u32,
    actor: EntityId,
    ctx: &mut AiContext<'_>,
) -> Decision {
    if turns_remaining == 0 {
        let name = ctx
            .map
            .entity(actor)
            .map(|entity| entity.name.clone())
            .unwrap_or_default();
        return Decision {
            action: wait(actor),
            next: previous,
            events: vec![
                GameEvent::Message {
                    text: format!("The {} is no longer confused.", name),
                    category: MessageCategory::StatusEffect,
                },
                GameEvent::StatusExpired { entity_id: actor },
            ],
        };
    }

    let directions = Direction::all();
    let direction = directions[ctx.rng.gen_range(0..directions.len())];
    Decision {
        action: ConcreteAction::Bump(BumpAction { actor, direction }),
        next: Ai::Confused {
            previous: Box::new(previous),
            turns_remaining: turns_remaining - 1,
        },
        events: Vec::new(),
    }
}

/// Runs one turn for an AI-driven actor.
///
/// Actors without AI (the player, corpses) are skipped. Failed actions are
/// logged and treated as waiting.
pub fn take_turn(
    ctx: &mut ActionContext<'_>,
    actor: EntityId,
    rng: &mut StdRng,
    paths: &mut PathCache,
) -> Vec<GameEvent> {
    let ai = match ctx
        .map
        .entity_mut(actor)
        .filter(|entity| entity.is_alive())
        .and_then(|entity| entity.as_actor_mut())
        .and_then(|stats| stats.ai.take())
    {
        Some(ai) => ai,
        None => return Vec::new(),
    };

    let decision = {
        let mut ai_ctx = AiContext {
            map: ctx.map,
            target: ctx.player,
            rng,
            paths,
        };
        ai.decide(actor, &mut ai_ctx)
    };

    if let Some(stats) = ctx
        .map
        .entity_mut(actor)
        .and_then(|entity| entity.as_actor_mut())
    {
        stats.ai = Some(decision.next);
    }

    let mut events = decision.events;
    match decision.action.perform(ctx) {
        Ok(action_events) => events.extend(action_events),
        Err(error) => debug!(
            "{} could not {}: {}; waiting instead",
            actor,
            decision.action.action_type(),
            error
        ),
    }
    events
}
