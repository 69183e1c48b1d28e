//! # Item Generation
//!
//! Item templates for consumables and equipment, plus the floor tables
//! deciding which items lie around in a room.

use crate::game::world::{Color, Graphic};
use crate::game::{
    Consumable, Entity, EntityId, EquipmentSlot, Equippable, GameMap, Item, Position,
};
use crate::generation::population::{populate_room, FloorMaximum, WeightedTable};
use crate::generation::RectangularRoom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Every kind of item the dungeon can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    HealthPotion,
    LightningScroll,
    ConfusionScroll,
    FireballScroll,
    Dagger,
    Sword,
    LeatherArmor,
    ChainMail,
}

const SCROLL: char = '~';
const WEAPON: char = '/';
const ARMOR: char = '[';

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::LightningScroll => "Lightning Scroll",
            ItemKind::ConfusionScroll => "Confusion Scroll",
            ItemKind::FireballScroll => "Fireball Scroll",
            ItemKind::Dagger => "Dagger",
            ItemKind::Sword => "Sword",
            ItemKind::LeatherArmor => "Leather Armor",
            ItemKind::ChainMail => "Chain Mail",
        }
    }

    fn graphic(self) -> Graphic {
        let (symbol, foreground) = match self {
            ItemKind::HealthPotion => ('!', Color(127, 0, 255)),
            ItemKind::LightningScroll => (SCROLL, Color(255, 255, 0)),
            ItemKind::ConfusionScroll => (SCROLL, Color(207, 63, 255)),
            ItemKind::FireballScroll => (SCROLL, Color(255, 0, 0)),
            ItemKind::Dagger | ItemKind::Sword => (WEAPON, Color(0, 191, 255)),
            ItemKind::LeatherArmor | ItemKind::ChainMail => (ARMOR, Color(139, 69, 19)),
        };
        Graphic::new(symbol, foreground, Color::BLACK)
    }

    /// The components carried by this kind of item.
    pub fn components(self) -> Item {
        let consumable = match self {
            ItemKind::HealthPotion => Some(Consumable::Healing { amount: 4 }),
            ItemKind::LightningScroll => Some(Consumable::Lightning {
                damage: 20,
                max_range: 5,
            }),
            ItemKind::ConfusionScroll => Some(Consumable::Confusion { turns: 10 }),
            ItemKind::FireballScroll => Some(Consumable::Fireball {
                damage: 12,
                radius: 3,
            }),
            _ => None,
        };

        let equippable = match self {
            ItemKind::Dagger => Some(weapon(2)),
            ItemKind::Sword => Some(weapon(4)),
            ItemKind::LeatherArmor => Some(armor(1)),
            ItemKind::ChainMail => Some(armor(3)),
            _ => None,
        };

        Item {
            consumable,
            equippable,
        }
    }

    /// Builds a fresh item entity.
    pub fn build(self, id: EntityId, position: Position) -> Entity {
        Entity::new_item(id, self.name(), position, self.graphic(), self.components())
    }

    /// Builds an item and places it on the map.
    pub fn spawn(self, map: &mut GameMap, position: Position) -> EntityId {
        let id = map.allocate_id();
        map.add_entity(self.build(id, position))
    }
}

fn weapon(attack_bonus: i32) -> Equippable {
    Equippable {
        slot: EquipmentSlot::Weapon,
        attack_bonus,
        defense_bonus: 0,
    }
}

fn armor(defense_bonus: i32) -> Equippable {
    Equippable {
        slot: EquipmentSlot::Armor,
        attack_bonus: 0,
        defense_bonus,
    }
}

/// How many items a room may hold and which ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGenerator {
    pub max_per_room: FloorMaximum,
    pub table: WeightedTable<ItemKind>,
}

impl ItemGenerator {
    /// The standard item tables.
    pub fn new() -> Self {
        Self {
            max_per_room: FloorMaximum::new(&[(1, 1), (4, 2)]),
            table: WeightedTable::new(vec![
                (0, vec![(ItemKind::HealthPotion, 35)]),
                (2, vec![(ItemKind::ConfusionScroll, 10)]),
                (4, vec![(ItemKind::LightningScroll, 25), (ItemKind::Sword, 5)]),
                (6, vec![(ItemKind::FireballScroll, 25), (ItemKind::ChainMail, 15)]),
            ]),
        }
    }

    /// Seeds a room with items for the given depth.
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
            ItemKind::spawn,
        )
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RenderOrder;

    #[test]
    fn test_item_templates() {
        let potion = ItemKind::HealthPotion.build(EntityId::new(1, 0), Position::new(2, 2));
        assert_eq!(potion.name, "Health Potion");
        assert!(!potion.blocks_movement);
        assert_eq!(potion.render_order, RenderOrder::Item);
        assert_eq!(
            potion.as_item().unwrap().consumable,
            Some(Consumable::Healing { amount: 4 })
        );

        let sword = ItemKind::Sword.components();
        assert!(sword.consumable.is_none());
        assert_eq!(sword.equippable.unwrap().attack_bonus, 4);

        let mail = ItemKind::ChainMail.components();
        assert_eq!(mail.equippable.unwrap().slot, EquipmentSlot::Armor);
        assert_eq!(mail.equippable.unwrap().defense_bonus, 3);
    }

    #[test]
    fn test_scrolls_needing_a_target() {
        let needs_target = |kind: ItemKind| {
            kind.components()
                .consumable
                .map(|c| c.requires_target())
                .unwrap_or(false)
        };
        assert!(needs_target(ItemKind::ConfusionScroll));
        assert!(needs_target(ItemKind::FireballScroll));
        assert!(!needs_target(ItemKind::LightningScroll));
        assert!(!needs_target(ItemKind::HealthPotion));
    }

    #[test]
    fn test_item_table_by_depth() {
        let items = ItemGenerator::new();
        assert_eq!(items.max_per_room.value_for(1), 1);
        assert_eq!(items.max_per_room.value_for(4), 2);
        assert_eq!(items.table.weights_for(1), vec![(ItemKind::HealthPotion, 35)]);
        assert_eq!(items.table.weights_for(6).len(), 6);
        assert!(!items
            .table
            .weights_for(5)
            .iter()
            .any(|(kind, _)| *kind == ItemKind::FireballScroll));
    }
}
