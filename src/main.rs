//! # Undercroft Main Entry Point
//!
//! Headless runner: builds (or loads) a game, lets the autoexplore driver
//! play it for a number of turns and prints what happened.

use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;
use undercroft::{GameState, GenerationConfig, UndercroftError, UndercroftResult};

/// Command line arguments for the Undercroft runner.
#[derive(Parser, Debug)]
#[command(name = "undercroft")]
#[command(about = "Plays a seeded dungeon headlessly with the autoexplore driver")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Maximum number of player actions to run
    #[arg(short, long, default_value_t = 1000)]
    turns: u64,

    /// Use small test-sized floors
    #[arg(long)]
    small: bool,

    /// Resume from a saved game instead of starting a new one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final state to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> UndercroftResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Undercroft v{}", undercroft::VERSION);

    let mut state = match &args.load {
        Some(path) => {
            info!("Loading game from {}", path.display());
            GameState::load_from_file(path)?
        }
        None => {
            let config = if args.small {
                GenerationConfig::for_testing(args.seed)
            } else {
                GenerationConfig::new(args.seed)
            };
            GameState::with_config(config)?
        }
    };

    run(&mut state, args.turns)?;
    print_summary(&state);

    if let Some(path) = &args.save {
        state.save_to_file(path)?;
        info!("Saved game to {}", path.display());
    }

    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

/// Lets autoexplore play until it gives up, the player dies or `turns` run out.
fn run(state: &mut GameState, turns: u64) -> UndercroftResult<()> {
    #[cfg(feature = "dev-tools")]
    let _span = tracing::info_span!("run", seed = state.rng_seed).entered();

    state.toggle_autoexplore();
    let mut stalled = 0;

    for _ in 0..turns {
        let action = match state.autoexplore_action()? {
            Some(action) => action,
            None => {
                info!("Autoexplore has nothing left to do");
                break;
            }
        };

        match state.process_player_action(&action) {
            Ok(events) => {
                stalled = 0;
                debug!("Turn {}: {} events", state.turn_number, events.len());
            }
            Err(UndercroftError::Impossible(reason)) => {
                warn!("Autoexplore action failed: {}", reason);
                state.autoexplore_state.reset();
                stalled += 1;
                if stalled > 10 {
                    warn!("Autoexplore is stuck, stopping");
                    break;
                }
            }
            Err(UndercroftError::PlayerDead) => break,
            Err(other) => return Err(other),
        }

        if state.is_game_over() {
            break;
        }
    }

    Ok(())
}

fn print_summary(state: &GameState) {
    for line in state.messages.iter().rev().take(10).rev() {
        println!("  {}", line);
    }

    let stats = &state.statistics;
    println!();
    println!("Outcome:          {:?}", state.completion_state);
    println!("Turns:            {}", state.turn_number);
    println!("Depth reached:    {}", stats.max_depth_reached);
    println!("Enemies defeated: {}", stats.enemies_defeated);
    println!("Items collected:  {}", stats.items_collected);
    println!("Damage dealt:     {}", stats.damage_dealt);
    println!("Damage taken:     {}", stats.damage_taken);
    if let Ok(player) = state.player_stats() {
        println!(
            "Player:           level {}, {}/{} HP",
            player.level.current_level,
            player.fighter.hp(),
            player.fighter.max_hp
        );
    }
}
