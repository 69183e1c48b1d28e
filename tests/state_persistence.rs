//! Integration tests for saving, loading and floor transitions.

use std::fs;
use tempfile::TempDir;
use undercroft::{
    ConcreteAction, DescendStairsAction, GameCompletionState, GameState, GenerationConfig,
    UndercroftError, UndercroftResult, WaitAction,
};

fn play(state: &mut GameState, turns: usize) -> UndercroftResult<()> {
    state.toggle_autoexplore();
    for _ in 0..turns {
        let action = match state.autoexplore_action()? {
            Some(action) => action,
            None => break,
        };
        match state.process_player_action(&action) {
            Ok(_) => {}
            Err(UndercroftError::Impossible(_)) => state.autoexplore_state.reset(),
            Err(UndercroftError::PlayerDead) => break,
            Err(other) => return Err(other),
        }
        if state.is_game_over() {
            break;
        }
    }
    Ok(())
}

/// A saved game reloads with the same floor, entities and counters.
#[test]
fn test_save_and_load_file_round_trip() -> UndercroftResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("save.json");

    let mut state = GameState::with_config(GenerationConfig::for_testing(2024))?;
    play(&mut state, 25)?;
    state.save_to_file(&path)?;

    assert!(fs::metadata(&path)?.len() > 0);

    let loaded = GameState::load_from_file(&path)?;
    assert_eq!(loaded.map.width, state.map.width);
    assert_eq!(loaded.map.height, state.map.height);
    assert_eq!(loaded.depth(), state.depth());
    assert_eq!(loaded.map.tiles, state.map.tiles);
    assert_eq!(loaded.map.entity_ids(), state.map.entity_ids());
    for id in state.map.entity_ids() {
        assert_eq!(loaded.map.entity(id), state.map.entity(id));
    }
    assert_eq!(loaded.turn_number, state.turn_number);
    assert_eq!(loaded.statistics, state.statistics);
    assert_eq!(loaded.completion_state, state.completion_state);
    Ok(())
}

/// A loaded game keeps accepting actions.
#[test]
fn test_loaded_game_keeps_playing() -> UndercroftResult<()> {
    let state = GameState::with_config(GenerationConfig::for_testing(7))?;
    let json = state.save_to_json()?;

    let mut loaded = GameState::load_from_json(&json)?;
    let wait = ConcreteAction::Wait(WaitAction {
        actor: loaded.player_id,
    });
    loaded.process_player_action(&wait)?;
    assert_eq!(loaded.turn_number, 1);
    Ok(())
}

#[test]
fn test_load_rejects_garbage() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write");

    assert!(matches!(
        GameState::load_from_file(&path),
        Err(UndercroftError::Serde(_))
    ));
    assert!(matches!(
        GameState::load_from_file(dir.path().join("missing.json")),
        Err(UndercroftError::Io(_))
    ));
}

/// Taking the stairs builds a new floor and the player keeps its gear.
#[test]
fn test_stair_descent_carries_the_player() -> UndercroftResult<()> {
    let mut state = GameState::new(98765)?;
    let stairs = state.map.down_stairs.expect("first floor has stairs");
    let player = state.player_id;
    let inventory = state.player_stats()?.inventory.clone();
    let first_floor = state.map.tiles.clone();

    state
        .map
        .entity_mut(player)
        .expect("player on the map")
        .position = stairs;
    let descend = ConcreteAction::DescendStairs(DescendStairsAction { actor: player });
    state.process_player_action(&descend)?;

    assert_eq!(state.depth(), 2);
    assert_ne!(state.map.tiles, first_floor);
    assert_eq!(state.player_position()?, state.map.player_start);
    assert_eq!(state.player_stats()?.inventory, inventory);
    assert!(state.map.entities().all(|e| e.id == player || e.id.depth == 2));
    Ok(())
}

/// The autoexplore driver makes real progress through the dungeon.
#[test]
fn test_autoexplore_descends() -> UndercroftResult<()> {
    let mut state = GameState::with_config(GenerationConfig::for_testing(5))?;
    play(&mut state, 400)?;

    assert!(state.turn_number > 0);
    assert!(
        state.depth() > 1 || state.completion_state == GameCompletionState::PlayerDied,
        "autoexplore neither descended nor died"
    );
    Ok(())
}
