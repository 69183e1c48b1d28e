//! # Input Module
//!
//! UI-agnostic player commands and their translation into actions.
//!
//! A front end turns whatever it reads (keys, clicks, scripted moves) into
//! [`PlayerInput`]s; [`InputHandler::input_to_action`] resolves them against
//! the current [`GameState`]. Inventory slots are addressed by letter, `a`
//! being the first item carried.

use crate::game::{
    BumpAction, ConcreteAction, DescendStairsAction, Direction, DropAction, EntityId, EquipAction,
    GameState, Impossible, LevelUpAction, LevelUpChoice, PickUpAction, Position, UseItemAction,
    WaitAction,
};
use crate::UndercroftResult;

/// Input handler for turning keys into player commands.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjklyubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.key_to_input('k'), Some(PlayerInput::Move(Direction::North)));
    /// assert_eq!(input_handler.key_to_input('g'), Some(PlayerInput::PickUp));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Maps a key to a command in the default key scheme.
    ///
    /// Item commands that need a slot (drop, use, equip) are not bound here;
    /// front ends build them after asking for an inventory letter.
    pub fn key_to_input(&self, key: char) -> Option<PlayerInput> {
        let movement = match key {
            'w' | '8' => Some(Direction::North),
            's' | '2' => Some(Direction::South),
            'a' | '4' => Some(Direction::West),
            'd' | '6' => Some(Direction::East),
            '7' => Some(Direction::Northwest),
            '9' => Some(Direction::Northeast),
            '1' => Some(Direction::Southwest),
            '3' => Some(Direction::Southeast),
            _ if self.vi_keys_enabled => match key {
                'k' => Some(Direction::North),
                'j' => Some(Direction::South),
                'h' => Some(Direction::West),
                'l' => Some(Direction::East),
                'y' => Some(Direction::Northwest),
                'u' => Some(Direction::Northeast),
                'b' => Some(Direction::Southwest),
                'n' => Some(Direction::Southeast),
                _ => None,
            },
            _ => None,
        };
        if let Some(direction) = movement {
            return Some(PlayerInput::Move(direction));
        }

        match key {
            '.' | '5' => Some(PlayerInput::Wait),
            'g' | ',' => Some(PlayerInput::PickUp),
            '>' => Some(PlayerInput::Descend),
            'i' => Some(PlayerInput::ShowInventory),
            '?' => Some(PlayerInput::Help),
            'q' => Some(PlayerInput::Quit),
            _ => None,
        }
    }

    /// Converts player input to a concrete game action.
    ///
    /// Inputs that only affect the interface resolve to `None`. Naming an
    /// empty inventory slot fails as [`Impossible::NotCarried`].
    pub fn input_to_action(
        &self,
        input: PlayerInput,
        game_state: &GameState,
    ) -> UndercroftResult<Option<ConcreteAction>> {
        let actor = game_state.player_id;

        let action = match input {
            PlayerInput::Move(direction) => ConcreteAction::Bump(BumpAction { actor, direction }),
            PlayerInput::Wait => ConcreteAction::Wait(WaitAction { actor }),
            PlayerInput::PickUp => ConcreteAction::PickUp(PickUpAction { actor }),
            PlayerInput::Descend => ConcreteAction::DescendStairs(DescendStairsAction { actor }),
            PlayerInput::LevelUp(choice) => ConcreteAction::LevelUp(LevelUpAction { actor, choice }),
            PlayerInput::Drop(slot) => ConcreteAction::Drop(DropAction {
                actor,
                item: inventory_item(game_state, slot)?,
            }),
            PlayerInput::Use { slot, target } => ConcreteAction::UseItem(UseItemAction {
                actor,
                item: inventory_item(game_state, slot)?,
                target,
            }),
            PlayerInput::Equip(slot) => ConcreteAction::Equip(EquipAction {
                actor,
                item: inventory_item(game_state, slot)?,
            }),
            PlayerInput::ShowInventory | PlayerInput::Help | PlayerInput::Quit => return Ok(None),
        };

        Ok(Some(action))
    }
}

/// Handle of the item in an inventory slot (`'a'` is the first).
fn inventory_item(game_state: &GameState, slot: char) -> UndercroftResult<EntityId> {
    let index = match slot {
        'a'..='z' => slot as usize - 'a' as usize,
        _ => return Err(Impossible::NotCarried.into()),
    };

    game_state
        .player_stats()?
        .inventory
        .items()
        .get(index)
        .map(|item| item.id)
        .ok_or_else(|| Impossible::NotCarried.into())
}

/// Player commands independent of any particular front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step (or attack) in a direction
    Move(Direction),
    /// Wait/rest for one turn
    Wait,
    /// Pick up the item at the current position
    PickUp,
    /// Drop the item in an inventory slot
    Drop(char),
    /// Use the item in an inventory slot, optionally at a target tile
    Use { slot: char, target: Option<Position> },
    /// Equip or unequip the item in an inventory slot
    Equip(char),
    /// Take the down stairs
    Descend,
    /// Spend a pending level up
    LevelUp(LevelUpChoice),
    /// Show inventory
    ShowInventory,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EquipmentSlot;
    use crate::generation::GenerationConfig;
    use crate::UndercroftError;

    fn state() -> GameState {
        GameState::with_config(GenerationConfig::for_testing(31)).unwrap()
    }

    #[test]
    fn test_key_mapping() {
        let handler = InputHandler::new();
        assert_eq!(handler.key_to_input('w'), Some(PlayerInput::Move(Direction::North)));
        assert_eq!(handler.key_to_input('n'), Some(PlayerInput::Move(Direction::Southeast)));
        assert_eq!(handler.key_to_input('>'), Some(PlayerInput::Descend));
        assert_eq!(handler.key_to_input('.'), Some(PlayerInput::Wait));
        assert_eq!(handler.key_to_input('Z'), None);

        let plain = InputHandler {
            vi_keys_enabled: false,
        };
        assert_eq!(plain.key_to_input('k'), None);
        assert_eq!(plain.key_to_input('9'), Some(PlayerInput::Move(Direction::Northeast)));
    }

    #[test]
    fn test_movement_becomes_bump() {
        let state = state();
        let action = InputHandler::new()
            .input_to_action(PlayerInput::Move(Direction::West), &state)
            .unwrap();
        assert_eq!(
            action,
            Some(ConcreteAction::Bump(BumpAction {
                actor: state.player_id,
                direction: Direction::West,
            }))
        );
    }

    #[test]
    fn test_inventory_slots() {
        let state = state();
        let handler = InputHandler::new();
        let weapon = state
            .player_stats()
            .unwrap()
            .equipment
            .slot(EquipmentSlot::Weapon)
            .unwrap();

        // The dagger is the first item in the starting kit
        let action = handler
            .input_to_action(PlayerInput::Equip('a'), &state)
            .unwrap();
        assert_eq!(
            action,
            Some(ConcreteAction::Equip(EquipAction {
                actor: state.player_id,
                item: weapon,
            }))
        );

        let missing = handler.input_to_action(PlayerInput::Drop('q'), &state);
        assert!(matches!(
            missing,
            Err(UndercroftError::Impossible(Impossible::NotCarried))
        ));
    }

    #[test]
    fn test_interface_inputs_are_not_actions() {
        let state = state();
        let handler = InputHandler::new();
        for input in [PlayerInput::Help, PlayerInput::ShowInventory, PlayerInput::Quit] {
            assert_eq!(handler.input_to_action(input, &state).unwrap(), None);
        }
    }
}
