//! # Actions Module
//!
//! Command objects that are the only way entity state changes.
//!
//! Every action validates all of its preconditions before touching the map.
//! It then either applies its whole effect and returns the resulting
//! [`GameEvent`]s, or fails with an [`Impossible`] reason having changed
//! nothing.

use crate::game::ai::Ai;
use crate::game::entities::{Consumable, EquipmentSlot, LevelUpChoice};
use crate::game::world::GameMap;
use crate::game::{Direction, Entity, EntityId, Position};
use crate::{UndercroftError, UndercroftResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Recoverable reasons an action cannot be carried out.
///
/// The `Display` text is the line shown to the player.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impossible {
    #[error("That way is blocked.")]
    Blocked,

    #[error("Nothing to attack.")]
    NothingToAttack,

    #[error("Your inventory is full.")]
    InventoryFull,

    #[error("There is nothing here to pick up.")]
    NothingToPickUp,

    #[error("You are not carrying that.")]
    NotCarried,

    #[error("{0} cannot be used.")]
    NotUsable(String),

    #[error("{0} cannot be equipped.")]
    CannotEquip(String),

    #[error("Your health is already full.")]
    AlreadyFullHealth,

    #[error("No enemy is close enough to strike.")]
    NoTargetInRange,

    #[error("You must select an enemy to target.")]
    MustTargetEnemy,

    #[error("You cannot target an area that you cannot see.")]
    TargetNotVisible,

    #[error("You cannot confuse yourself!")]
    CannotTargetSelf,

    #[error("You must select an area to target.")]
    MustTargetArea,

    #[error("There are no targets in the radius.")]
    NoTargetsInRadius,

    #[error("There are no stairs here.")]
    NoStairs,

    #[error("You have no level up pending.")]
    NoLevelUpPending,
}

/// Rough category of a log line, for colouring by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageCategory {
    Info,
    PlayerAttack,
    EnemyAttack,
    PlayerDeath,
    EnemyDeath,
    HealthRecovered,
    StatusEffect,
    Descend,
    LevelUp,
}

/// Something that happened while resolving an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A line for the message log
    Message {
        text: String,
        category: MessageCategory,
    },
    EntityMoved {
        entity_id: EntityId,
        from: Position,
        to: Position,
    },
    EntityDamaged {
        entity_id: EntityId,
        damage: i32,
        source: Option<EntityId>,
    },
    EntityDied {
        entity_id: EntityId,
        killer: Option<EntityId>,
    },
    HealthRecovered {
        entity_id: EntityId,
        amount: i32,
    },
    ItemPickedUp {
        entity_id: EntityId,
        item_id: EntityId,
    },
    ItemDropped {
        entity_id: EntityId,
        item_id: EntityId,
        position: Position,
    },
    ItemConsumed {
        entity_id: EntityId,
        item_id: EntityId,
    },
    ItemEquipped {
        entity_id: EntityId,
        item_id: EntityId,
        slot: EquipmentSlot,
    },
    ItemUnequipped {
        entity_id: EntityId,
        item_id: EntityId,
        slot: EquipmentSlot,
    },
    XpGained {
        entity_id: EntityId,
        amount: u32,
    },
    LevelUpAvailable {
        entity_id: EntityId,
    },
    LeveledUp {
        entity_id: EntityId,
        choice: LevelUpChoice,
        level: u32,
    },
    StatusApplied {
        entity_id: EntityId,
        turns: u32,
    },
    StatusExpired {
        entity_id: EntityId,
    },
    /// The actor left the floor; the scheduler builds the next one
    DescendedStairs {
        entity_id: EntityId,
        from_depth: u32,
    },
}

impl GameEvent {
    fn message(text: impl Into<String>, category: MessageCategory) -> Self {
        GameEvent::Message {
            text: text.into(),
            category,
        }
    }
}

/// Everything an action may read or mutate.
pub struct ActionContext<'a> {
    pub map: &'a mut GameMap,
    /// Handle of the player, used for message wording and XP awards
    pub player: EntityId,
}

impl<'a> ActionContext<'a> {
    pub fn new(map: &'a mut GameMap, player: EntityId) -> Self {
        Self { map, player }
    }
}

/// Events produced by a successful action.
pub type ActionResult = UndercroftResult<Vec<GameEvent>>;

/// A command performed by one actor against the current floor.
pub trait Action {
    /// The entity performing the action.
    fn actor(&self) -> EntityId;

    /// Validates and applies the action.
    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult;

    /// Whether monsters get their turn after this action succeeds.
    fn consumes_turn(&self) -> bool {
        true
    }

    /// Short name for logging.
    fn action_type(&self) -> &'static str;
}

/// Does nothing and takes a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitAction {
    pub actor: EntityId,
}

impl Action for WaitAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, _ctx: &mut ActionContext<'_>) -> ActionResult {
        Ok(Vec::new())
    }

    fn action_type(&self) -> &'static str {
        "wait"
    }
}

/// Steps one tile in a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl Action for MoveAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let from = entity(ctx.map, self.actor)?.position;
        let to = from.step(self.direction);

        if !ctx.map.is_in_bounds(to)
            || !ctx.map.is_walkable(to)
            || ctx.map.blocking_entity_at(to).is_some()
        {
            return Err(Impossible::Blocked.into());
        }

        entity_mut(ctx.map, self.actor)?.position = to;
        Ok(vec![GameEvent::EntityMoved {
            entity_id: self.actor,
            from,
            to,
        }])
    }

    fn action_type(&self) -> &'static str {
        "move"
    }
}

/// Attacks an actor in a direction, or moves there when nobody is in the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl Action for BumpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let destination = entity(ctx.map, self.actor)?.position.step(self.direction);

        if ctx.map.actor_at(destination).is_some() {
            MeleeAction {
                actor: self.actor,
                direction: self.direction,
            }
            .perform(ctx)
        } else {
            MoveAction {
                actor: self.actor,
                direction: self.direction,
            }
            .perform(ctx)
        }
    }

    fn action_type(&self) -> &'static str {
        "bump"
    }
}

/// Attacks the living actor in a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeleeAction {
    pub actor: EntityId,
    pub direction: Direction,
}

impl Action for MeleeAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let attacker = entity(ctx.map, self.actor)?;
        let destination = attacker.position.step(self.direction);
        let target = ctx
            .map
            .actor_at(destination)
            .ok_or(Impossible::NothingToAttack)?;

        let attack = actor_stats(attacker)?.effective_attack();
        let defense = actor_stats(target)?.effective_defense();
        let damage = attack - defense;

        let target_id = target.id;
        let description = format!("{} attacks {}", attacker.name, target.name);
        let category = if self.actor == ctx.player {
            MessageCategory::PlayerAttack
        } else {
            MessageCategory::EnemyAttack
        };

        if damage <= 0 {
            return Ok(vec![GameEvent::message(
                format!("{} but does no damage.", description),
                category,
            )]);
        }

        let mut events = vec![GameEvent::message(
            format!("{} for {} hit points.", description, damage),
            category,
        )];
        events.extend(apply_damage(ctx, target_id, damage, Some(self.actor))?);
        Ok(events)
    }

    fn action_type(&self) -> &'static str {
        "melee"
    }
}

/// Picks up an item lying on the actor's tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickUpAction {
    pub actor: EntityId,
}

impl Action for PickUpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let picker = entity(ctx.map, self.actor)?;
        let item_id = ctx
            .map
            .items_at(picker.position)
            .next()
            .map(|item| item.id)
            .ok_or(Impossible::NothingToPickUp)?;
        if actor_stats(picker)?.inventory.is_full() {
            return Err(Impossible::InventoryFull.into());
        }

        let item = ctx
            .map
            .remove_entity(item_id)
            .ok_or_else(|| dangling(item_id))?;
        let text = format!("You picked up the {}!", item.name);
        let inventory = &mut actor_stats_mut(ctx.map, self.actor)?.inventory;
        if let Err(item) = inventory.insert(item) {
            ctx.map.add_entity(item);
            return Err(Impossible::InventoryFull.into());
        }

        Ok(vec![
            GameEvent::ItemPickedUp {
                entity_id: self.actor,
                item_id,
            },
            GameEvent::message(text, MessageCategory::Info),
        ])
    }

    fn action_type(&self) -> &'static str {
        "pick_up"
    }
}

/// Drops a carried item onto the actor's tile, unequipping it first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAction {
    pub actor: EntityId,
    pub item: EntityId,
}

impl Action for DropAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let holder = entity(ctx.map, self.actor)?;
        let position = holder.position;
        if !actor_stats(holder)?.inventory.contains(self.item) {
            return Err(Impossible::NotCarried.into());
        }

        let mut events = Vec::new();
        let actor = actor_stats_mut(ctx.map, self.actor)?;
        if let Some(slot) = actor.equipment.unequip(self.item) {
            events.push(GameEvent::ItemUnequipped {
                entity_id: self.actor,
                item_id: self.item,
                slot,
            });
        }
        let mut item = actor
            .inventory
            .remove(self.item)
            .ok_or_else(|| dangling(self.item))?;

        item.position = position;
        let text = format!("You dropped the {}.", item.name);
        ctx.map.add_entity(item);

        events.push(GameEvent::ItemDropped {
            entity_id: self.actor,
            item_id: self.item,
            position,
        });
        events.push(GameEvent::message(text, MessageCategory::Info));
        Ok(events)
    }

    fn action_type(&self) -> &'static str {
        "drop"
    }
}

/// Uses a carried item, optionally aimed at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseItemAction {
    pub actor: EntityId,
    pub item: EntityId,
    pub target: Option<Position>,
}

impl Action for UseItemAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let user = entity(ctx.map, self.actor)?;
        let item = actor_stats(user)?
            .inventory
            .get(self.item)
            .ok_or(Impossible::NotCarried)?;
        let components = item.as_item().ok_or_else(|| dangling(self.item))?;

        let consumable = match (components.consumable, components.equippable) {
            (Some(consumable), _) => consumable,
            (None, Some(_)) => {
                return EquipAction {
                    actor: self.actor,
                    item: self.item,
                }
                .perform(ctx)
            }
            (None, None) => return Err(Impossible::NotUsable(item.name.clone()).into()),
        };
        let item_name = item.name.clone();

        let mut events = match consumable {
            Consumable::Healing { amount } => self.heal(ctx, amount, &item_name)?,
            Consumable::Lightning { damage, max_range } => {
                self.lightning(ctx, damage, max_range)?
            }
            Consumable::Confusion { turns } => self.confuse(ctx, turns)?,
            Consumable::Fireball { damage, radius } => self.fireball(ctx, damage, radius)?,
        };

        // The user may have died from its own fireball; the item is spent either way
        actor_stats_mut(ctx.map, self.actor)?
            .inventory
            .remove(self.item);
        events.push(GameEvent::ItemConsumed {
            entity_id: self.actor,
            item_id: self.item,
        });
        Ok(events)
    }

    fn action_type(&self) -> &'static str {
        "use_item"
    }
}

impl UseItemAction {
    fn heal(&self, ctx: &mut ActionContext<'_>, amount: i32, item_name: &str) -> ActionResult {
        let fighter = &mut actor_stats_mut(ctx.map, self.actor)?.fighter;
        if fighter.hp() >= fighter.max_hp {
            return Err(Impossible::AlreadyFullHealth.into());
        }

        let recovered = fighter.heal(amount);
        Ok(vec![
            GameEvent::message(
                format!("You consume the {}, and recover {} HP!", item_name, recovered),
                MessageCategory::HealthRecovered,
            ),
            GameEvent::HealthRecovered {
                entity_id: self.actor,
                amount: recovered,
            },
        ])
    }

    fn lightning(&self, ctx: &mut ActionContext<'_>, damage: i32, max_range: i32) -> ActionResult {
        let origin = entity(ctx.map, self.actor)?.position;
        let mut closest: Option<(EntityId, f64)> = None;
        let mut closest_distance = (max_range + 1) as f64;

        for candidate in ctx.map.actors() {
            if candidate.id == self.actor || !ctx.map.is_visible(candidate.position) {
                continue;
            }
            let distance = origin.euclidean_distance(candidate.position);
            if distance < closest_distance {
                closest = Some((candidate.id, distance));
                closest_distance = distance;
            }
        }

        let (target_id, _) = closest.ok_or(Impossible::NoTargetInRange)?;
        let target_name = entity(ctx.map, target_id)?.name.clone();

        let mut events = vec![GameEvent::message(
            format!(
                "A lightning bolt strikes the {} with a loud thunder, for {} damage!",
                target_name, damage
            ),
            MessageCategory::PlayerAttack,
        )];
        events.extend(apply_damage(ctx, target_id, damage, Some(self.actor))?);
        Ok(events)
    }

    fn confuse(&self, ctx: &mut ActionContext<'_>, turns: u32) -> ActionResult {
        let target = self.target.ok_or(Impossible::MustTargetEnemy)?;
        if !ctx.map.is_visible(target) {
            return Err(Impossible::TargetNotVisible.into());
        }
        let victim = ctx
            .map
            .actor_at(target)
            .ok_or(Impossible::MustTargetEnemy)?;
        if victim.id == self.actor {
            return Err(Impossible::CannotTargetSelf.into());
        }
        if actor_stats(victim)?.ai.is_none() {
            return Err(Impossible::MustTargetEnemy.into());
        }

        let victim_id = victim.id;
        let text = format!(
            "The eyes of the {} look vacant, as it starts to stumble around!",
            victim.name
        );

        let actor = actor_stats_mut(ctx.map, victim_id)?;
        if let Some(previous) = actor.ai.take() {
            actor.ai = Some(Ai::confused(previous, turns));
        }

        Ok(vec![
            GameEvent::message(text, MessageCategory::StatusEffect),
            GameEvent::StatusApplied {
                entity_id: victim_id,
                turns,
            },
        ])
    }

    fn fireball(&self, ctx: &mut ActionContext<'_>, damage: i32, radius: i32) -> ActionResult {
        let target = self.target.ok_or(Impossible::MustTargetArea)?;
        if !ctx.map.is_visible(target) {
            return Err(Impossible::TargetNotVisible.into());
        }

        let victims: Vec<(EntityId, String)> = ctx
            .map
            .actors()
            .filter(|actor| actor.position.euclidean_distance(target) <= radius as f64)
            .map(|actor| (actor.id, actor.name.clone()))
            .collect();
        if victims.is_empty() {
            return Err(Impossible::NoTargetsInRadius.into());
        }

        let mut events = Vec::new();
        for (victim_id, name) in victims {
            events.push(GameEvent::message(
                format!(
                    "The {} is engulfed in a fiery explosion, taking {} damage!",
                    name, damage
                ),
                MessageCategory::PlayerAttack,
            ));
            events.extend(apply_damage(ctx, victim_id, damage, Some(self.actor))?);
        }
        Ok(events)
    }
}

/// Toggles an equippable item in or out of its slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipAction {
    pub actor: EntityId,
    pub item: EntityId,
}

impl Action for EquipAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let actor = actor_stats_mut(ctx.map, self.actor)?;
        let item = actor
            .inventory
            .get(self.item)
            .ok_or(Impossible::NotCarried)?;
        let slot = item
            .as_item()
            .and_then(|components| components.equippable)
            .map(|equippable| equippable.slot)
            .ok_or_else(|| Impossible::CannotEquip(item.name.clone()))?;
        let item_name = item.name.clone();

        let mut events = Vec::new();
        let previous = actor.equipment.set_slot(slot, None);

        if let Some(previous_id) = previous {
            let previous_name = actor
                .inventory
                .get(previous_id)
                .map(|entity| entity.name.clone())
                .unwrap_or_default();
            events.push(GameEvent::message(
                format!("You remove the {}.", previous_name),
                MessageCategory::Info,
            ));
            events.push(GameEvent::ItemUnequipped {
                entity_id: self.actor,
                item_id: previous_id,
                slot,
            });
            if previous_id == self.item {
                return Ok(events);
            }
        }

        actor.equipment.set_slot(slot, Some(self.item));
        events.push(GameEvent::message(
            format!("You equip the {}.", item_name),
            MessageCategory::Info,
        ));
        events.push(GameEvent::ItemEquipped {
            entity_id: self.actor,
            item_id: self.item,
            slot,
        });
        Ok(events)
    }

    fn action_type(&self) -> &'static str {
        "equip"
    }
}

/// Takes the down staircase under the actor.
///
/// Only reports the descent; building the next floor is the scheduler's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescendStairsAction {
    pub actor: EntityId,
}

impl Action for DescendStairsAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let position = entity(ctx.map, self.actor)?.position;
        if ctx.map.down_stairs != Some(position) {
            return Err(Impossible::NoStairs.into());
        }

        Ok(vec![
            GameEvent::message("You descend the staircase.", MessageCategory::Descend),
            GameEvent::DescendedStairs {
                entity_id: self.actor,
                from_depth: ctx.map.depth,
            },
        ])
    }

    fn action_type(&self) -> &'static str {
        "descend_stairs"
    }
}

/// Spends pending experience on a stat increase. Takes no time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpAction {
    pub actor: EntityId,
    pub choice: LevelUpChoice,
}

impl Action for LevelUpAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let actor = actor_stats_mut(ctx.map, self.actor)?;
        if !actor.level.requires_level_up() {
            return Err(Impossible::NoLevelUpPending.into());
        }

        actor.apply_level_up(self.choice);
        let text = match self.choice {
            LevelUpChoice::Constitution => "Your health improves!",
            LevelUpChoice::Strength => "You feel stronger!",
            LevelUpChoice::Agility => "Your movements are getting swifter!",
        };

        Ok(vec![
            GameEvent::message(text, MessageCategory::LevelUp),
            GameEvent::LeveledUp {
                entity_id: self.actor,
                choice: self.choice,
                level: actor.level.current_level,
            },
        ])
    }

    fn consumes_turn(&self) -> bool {
        false
    }

    fn action_type(&self) -> &'static str {
        "level_up"
    }
}

/// Closed set of every action, for passing actions around by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteAction {
    Wait(WaitAction),
    Move(MoveAction),
    Bump(BumpAction),
    Melee(MeleeAction),
    PickUp(PickUpAction),
    Drop(DropAction),
    UseItem(UseItemAction),
    Equip(EquipAction),
    DescendStairs(DescendStairsAction),
    LevelUp(LevelUpAction),
}

impl ConcreteAction {
    fn inner(&self) -> &dyn Action {
        match self {
            ConcreteAction::Wait(action) => action,
            ConcreteAction::Move(action) => action,
            ConcreteAction::Bump(action) => action,
            ConcreteAction::Melee(action) => action,
            ConcreteAction::PickUp(action) => action,
            ConcreteAction::Drop(action) => action,
            ConcreteAction::UseItem(action) => action,
            ConcreteAction::Equip(action) => action,
            ConcreteAction::DescendStairs(action) => action,
            ConcreteAction::LevelUp(action) => action,
        }
    }
}

impl Action for ConcreteAction {
    fn actor(&self) -> EntityId {
        self.inner().actor()
    }

    fn perform(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let action = self.inner();
        debug!("{} performs {}", action.actor(), action.action_type());
        action.perform(ctx)
    }

    fn consumes_turn(&self) -> bool {
        self.inner().consumes_turn()
    }

    fn action_type(&self) -> &'static str {
        self.inner().action_type()
    }
}

/// Subtracts HP from an actor and resolves its death.
///
/// Awards experience to the player when the player made the kill.
fn apply_damage(
    ctx: &mut ActionContext<'_>,
    target: EntityId,
    amount: i32,
    source: Option<EntityId>,
) -> ActionResult {
    let fighter = &mut actor_stats_mut(ctx.map, target)?.fighter;
    let dealt = fighter.take_damage(amount);
    let died = fighter.is_dead();

    let mut events = vec![GameEvent::EntityDamaged {
        entity_id: target,
        damage: dealt,
        source,
    }];
    if died {
        events.extend(kill(ctx, target, source)?);
    }
    Ok(events)
}

fn kill(ctx: &mut ActionContext<'_>, victim: EntityId, killer: Option<EntityId>) -> ActionResult {
    let corpse = entity_mut(ctx.map, victim)?;
    let name = corpse.name.clone();
    let xp = corpse.die();

    let mut events = Vec::new();
    if victim == ctx.player {
        events.push(GameEvent::message("You died!", MessageCategory::PlayerDeath));
    } else {
        events.push(GameEvent::message(
            format!("{} is dead!", name),
            MessageCategory::EnemyDeath,
        ));
    }
    events.push(GameEvent::EntityDied {
        entity_id: victim,
        killer,
    });

    if killer == Some(ctx.player) && victim != ctx.player {
        let level = &mut actor_stats_mut(ctx.map, ctx.player)?.level;
        if level.add_xp(xp) {
            events.push(GameEvent::message(
                format!("You gain {} experience points.", xp),
                MessageCategory::Info,
            ));
            events.push(GameEvent::XpGained {
                entity_id: ctx.player,
                amount: xp,
            });
            if level.requires_level_up() {
                events.push(GameEvent::message(
                    format!("You advance to level {}!", level.current_level + 1),
                    MessageCategory::LevelUp,
                ));
                events.push(GameEvent::LevelUpAvailable {
                    entity_id: ctx.player,
                });
            }
        }
    }
    Ok(events)
}

fn dangling(id: EntityId) -> UndercroftError {
    UndercroftError::InvalidState(format!("Entity {} is not where it should be", id))
}

fn entity(map: &GameMap, id: EntityId) -> UndercroftResult<&Entity> {
    map.entity(id).ok_or_else(|| dangling(id))
}

fn entity_mut(map: &mut GameMap, id: EntityId) -> UndercroftResult<&mut Entity> {
    map.entity_mut(id).ok_or_else(|| dangling(id))
}

fn actor_stats(entity: &Entity) -> UndercroftResult<&crate::game::Actor> {
    entity.as_actor().ok_or_else(|| dangling(entity.id))
}

fn actor_stats_mut(map: &mut GameMap, id: EntityId) -> UndercroftResult<&mut crate::game::Actor> {
    entity_mut(map, id)?
        .as_actor_mut()
        .ok_or_else(|| dangling(id))
}
