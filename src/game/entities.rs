//! # Entity Module
//!
//! A single entity record covers everything that lives on a floor. What an
//! entity can do is decided by the capability components attached to its
//! [`EntityKind`]: actors carry a [`Fighter`], an [`Inventory`], an
//! [`Equipment`] set, a [`Level`] and optionally an [`Ai`]; items carry an
//! optional [`Consumable`] and an optional [`Equippable`].

use crate::config;
use crate::game::ai::Ai;
use crate::game::world::{Color, Graphic, GameMap};
use crate::game::{EntityId, Position};
use crate::generation::ItemKind;
use serde::{Deserialize, Serialize};

/// Draw layering. Has no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

/// Hit points and base combat stats.
///
/// Current HP is kept in `0..=max_hp` by every mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    hp: i32,
    pub base_attack: i32,
    pub base_defense: i32,
}

impl Fighter {
    /// Creates a fighter at full health.
    pub fn new(max_hp: i32, base_attack: i32, base_defense: i32) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            max_hp,
            hp: max_hp,
            base_attack,
            base_defense,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Sets current HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Restores up to `amount` HP and returns how much was recovered.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::Fighter;
    ///
    /// let mut fighter = Fighter::new(10, 1, 1);
    /// fighter.take_damage(3);
    /// assert_eq!(fighter.heal(5), 3);
    /// assert_eq!(fighter.heal(5), 0);
    /// ```
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp == self.max_hp || amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }

    /// Removes up to `amount` HP and returns how much was lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.hp;
        self.set_hp(self.hp - amount);
        before - self.hp
    }
}

/// A bounded bag of items owned by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    items: Vec<Entity>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Stores an item, handing it back when there is no room.
    pub fn insert(&mut self, item: Entity) -> Result<(), Entity> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

/// Slots an [`Equippable`] can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

/// Which carried items are currently worn or wielded.
///
/// Slots refer to items in the owner's [`Inventory`] by handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<EntityId>,
    pub armor: Option<EntityId>,
}

impl Equipment {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<EntityId> {
        match slot {
            EquipmentSlot::Weapon => self.weapon,
            EquipmentSlot::Armor => self.armor,
        }
    }

    /// Puts an item into a slot, returning whatever was there before.
    pub fn set_slot(&mut self, slot: EquipmentSlot, item: Option<EntityId>) -> Option<EntityId> {
        match slot {
            EquipmentSlot::Weapon => std::mem::replace(&mut self.weapon, item),
            EquipmentSlot::Armor => std::mem::replace(&mut self.armor, item),
        }
    }

    pub fn is_equipped(&self, id: EntityId) -> bool {
        self.weapon == Some(id) || self.armor == Some(id)
    }

    /// Clears whichever slot holds `id`. Returns the slot that was cleared.
    pub fn unequip(&mut self, id: EntityId) -> Option<EquipmentSlot> {
        if self.weapon == Some(id) {
            self.weapon = None;
            Some(EquipmentSlot::Weapon)
        } else if self.armor == Some(id) {
            self.armor = None;
            Some(EquipmentSlot::Armor)
        } else {
            None
        }
    }

    pub fn equipped_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.weapon.iter().chain(self.armor.iter()).copied()
    }
}

/// Persistent stat modifier granted while an item is equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equippable {
    pub slot: EquipmentSlot,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
}

/// Single-use item behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    /// Restores the user's HP
    Healing { amount: i32 },
    /// Strikes the nearest visible actor within range
    Lightning { damage: i32, max_range: i32 },
    /// Confuses a targeted visible actor
    Confusion { turns: u32 },
    /// Damages every actor around a targeted visible tile
    Fireball { damage: i32, radius: i32 },
}

impl Consumable {
    /// Whether using this consumable needs a target position.
    pub fn requires_target(&self) -> bool {
        matches!(self, Consumable::Confusion { .. } | Consumable::Fireball { .. })
    }
}

/// Experience and character level.
///
/// Actors that never level up (monsters) have a `level_up_base` of zero and
/// ignore experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    pub level_up_base: u32,
    pub level_up_factor: u32,
    /// Experience awarded to whoever kills this actor
    pub xp_given: u32,
}

impl Level {
    pub fn new(level_up_base: u32, level_up_factor: u32, xp_given: u32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor,
            xp_given,
        }
    }

    /// A level component that only awards experience.
    pub fn monster(xp_given: u32) -> Self {
        Self::new(0, 0, xp_given)
    }

    /// Experience needed to reach the next level.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::Level;
    ///
    /// let level = Level::new(200, 150, 0);
    /// assert_eq!(level.experience_to_next_level(), 350);
    /// ```
    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.level_up_base > 0 && self.current_xp > self.experience_to_next_level()
    }

    /// Adds experience. Returns false when the XP was ignored.
    pub fn add_xp(&mut self, xp: u32) -> bool {
        if xp == 0 || self.level_up_base == 0 {
            return false;
        }
        self.current_xp += xp;
        true
    }

    /// Spends the experience for one level and increments the level.
    pub fn increase_level(&mut self) {
        self.current_xp = self
            .current_xp
            .saturating_sub(self.experience_to_next_level());
        self.current_level += 1;
    }
}

/// Stat to improve when levelling up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelUpChoice {
    /// +20 max HP (and current HP)
    Constitution,
    /// +1 attack
    Strength,
    /// +1 defense
    Agility,
}

/// Components of an entity that can act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// None for the player and for corpses
    pub ai: Option<Ai>,
    pub fighter: Fighter,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub level: Level,
}

impl Actor {
    pub fn new(fighter: Fighter, ai: Option<Ai>, inventory: Inventory, level: Level) -> Self {
        Self {
            ai,
            fighter,
            inventory,
            equipment: Equipment::default(),
            level,
        }
    }

    fn equipped_items(&self) -> impl Iterator<Item = &Equippable> + '_ {
        self.equipment
            .equipped_ids()
            .filter_map(|id| self.inventory.get(id))
            .filter_map(|entity| entity.as_item())
            .filter_map(|item| item.equippable.as_ref())
    }

    /// Base attack plus the bonuses of everything equipped.
    pub fn effective_attack(&self) -> i32 {
        self.fighter.base_attack
            + self
                .equipped_items()
                .map(|equippable| equippable.attack_bonus)
                .sum::<i32>()
    }

    /// Base defense plus the bonuses of everything equipped.
    pub fn effective_defense(&self) -> i32 {
        self.fighter.base_defense
            + self
                .equipped_items()
                .map(|equippable| equippable.defense_bonus)
                .sum::<i32>()
    }

    /// Applies a level-up choice. The caller checks `requires_level_up`.
    pub fn apply_level_up(&mut self, choice: LevelUpChoice) {
        match choice {
            LevelUpChoice::Constitution => {
                self.fighter.max_hp += 20;
                let hp = self.fighter.hp() + 20;
                self.fighter.set_hp(hp);
            }
            LevelUpChoice::Strength => self.fighter.base_attack += 1,
            LevelUpChoice::Agility => self.fighter.base_defense += 1,
        }
        self.level.increase_level();
    }
}

/// Components of an entity that can be carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub consumable: Option<Consumable>,
    pub equippable: Option<Equippable>,
}

/// Capability set of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Actor(Box<Actor>),
    Item(Item),
}

/// Anything that occupies a tile: the player, monsters, corpses and items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: Position,
    pub graphic: Graphic,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    pub kind: EntityKind,
}

impl Entity {
    /// Creates a blocking actor.
    pub fn new_actor(
        id: EntityId,
        name: impl Into<String>,
        position: Position,
        graphic: Graphic,
        actor: Actor,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            graphic,
            blocks_movement: true,
            render_order: RenderOrder::Actor,
            kind: EntityKind::Actor(Box::new(actor)),
        }
    }

    /// Creates a non-blocking item.
    pub fn new_item(
        id: EntityId,
        name: impl Into<String>,
        position: Position,
        graphic: Graphic,
        item: Item,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            graphic,
            blocks_movement: false,
            render_order: RenderOrder::Item,
            kind: EntityKind::Item(item),
        }
    }

    pub fn as_actor(&self) -> Option<&Actor> {
        match &self.kind {
            EntityKind::Actor(actor) => Some(actor),
            EntityKind::Item(_) => None,
        }
    }

    pub fn as_actor_mut(&mut self) -> Option<&mut Actor> {
        match &mut self.kind {
            EntityKind::Actor(actor) => Some(actor),
            EntityKind::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            EntityKind::Actor(_) => None,
        }
    }

    pub fn is_actor(&self) -> bool {
        self.as_actor().is_some()
    }

    pub fn is_item(&self) -> bool {
        self.as_item().is_some()
    }

    /// Whether this is an actor with HP left.
    pub fn is_alive(&self) -> bool {
        self.as_actor()
            .map(|actor| !actor.fighter.is_dead())
            .unwrap_or(false)
    }

    /// Whether this is a living actor driven by AI.
    pub fn has_ai(&self) -> bool {
        self.is_alive()
            && self
                .as_actor()
                .map(|actor| actor.ai.is_some())
                .unwrap_or(false)
    }

    /// Turns a dead actor into inert remains and returns the XP it is worth.
    ///
    /// Clears the AI and the blocking flag, swaps the graphic for a corpse
    /// and renames the entity. Items are left untouched.
    pub fn die(&mut self) -> u32 {
        let xp = match &mut self.kind {
            EntityKind::Actor(actor) => {
                actor.ai = None;
                actor.level.xp_given
            }
            EntityKind::Item(_) => return 0,
        };

        self.graphic = Graphic::new('%', Color(191, 0, 0), self.graphic.background);
        self.blocks_movement = false;
        self.render_order = RenderOrder::Corpse;
        self.name = format!("remains of {}", self.name);
        xp
    }
}

/// Builds the player character with its starting kit.
///
/// The player starts wielding a dagger and wearing leather armor, both
/// carried in its inventory.
pub fn build_player(map: &mut GameMap, position: Position) -> Entity {
    let id = map.allocate_id();
    let mut actor = Actor::new(
        Fighter::new(30, 2, 1),
        None,
        Inventory::new(config::INVENTORY_CAPACITY),
        Level::new(200, 150, 0),
    );

    for kind in [ItemKind::Dagger, ItemKind::LeatherArmor] {
        let item = kind.build(map.allocate_id(), position);
        if let Some(equippable) = item.as_item().and_then(|i| i.equippable) {
            actor.equipment.set_slot(equippable.slot, Some(item.id));
        }
        // A fresh inventory always has room for the starting kit
        let _ = actor.inventory.insert(item);
    }

    Entity::new_actor(
        id,
        "Player",
        position,
        Graphic::new('@', Color::WHITE, Color::BLACK),
        actor,
    )
}
