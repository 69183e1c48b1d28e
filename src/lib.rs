//! # Undercroft
//!
//! The simulation core of a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Undercroft builds a traversable level, resolves player and monster actions
//! against it, tracks per-entity combat and progression state, and decides what
//! the player can currently see. Rendering, key bindings, the message log and
//! save-file storage live outside this crate and consume its outputs.
//!
//! - **Game State**: turn scheduling, floor transitions and persistence
//! - **Entity Model**: one entity record with optional capability components
//! - **Action System**: command objects that are the only way state is mutated
//! - **Generation System**: rooms, corridors and floor-gated population tables
//! - **Visibility**: recursive shadowcasting over tile transparency
//! - **Pathfinding**: uniform-cost search used by hostile monsters
//!
//! Everything is single-threaded and deterministic for a fixed seed and input
//! sequence.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From actions
    Action,
    ActionContext,
    ActionResult,
    BumpAction,
    ConcreteAction,
    DescendStairsAction,
    DropAction,
    EquipAction,
    GameEvent,
    Impossible,
    LevelUpAction,
    MeleeAction,
    MessageCategory,
    MoveAction,
    PickUpAction,
    UseItemAction,
    WaitAction,
    // From ai
    Ai,
    HostileAi,
    // From autoexplore
    AutoexploreState,
    // From entities
    Actor,
    Consumable,
    Entity,
    EntityKind,
    EquipmentSlot,
    Equippable,
    Fighter,
    Inventory,
    Item,
    Level,
    LevelUpChoice,
    RenderOrder,
    // From state
    GameCompletionState,
    GameState,
    GameStatistics,
    // From world
    GameMap,
    Tile,
    TileType,
    // From mod
    Direction,
    EntityId,
    Position,
};

pub use generation::{
    generate_dungeon, GenerationConfig, Generator, RectangularRoom, RoomCorridorGenerator,
};

/// Core error type for the Undercroft engine.
#[derive(thiserror::Error, Debug)]
pub enum UndercroftError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid (dangling handle, missing player, ...)
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// An action's precondition failed; no state was changed
    #[error("{0}")]
    Impossible(#[from] Impossible),

    /// The player is dead and no further actions are accepted
    #[error("The player is dead")]
    PlayerDead,

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Undercroft codebase.
pub type UndercroftResult<T> = Result<T, UndercroftError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const MAP_WIDTH: u32 = 80;

    /// Default map height in tiles
    pub const MAP_HEIGHT: u32 = 43;

    /// Number of room placement attempts per floor
    pub const MAX_ROOMS: u32 = 10;

    /// Smallest room edge, walls included
    pub const MIN_ROOM_SIZE: u32 = 5;

    /// Largest room edge, walls included
    pub const MAX_ROOM_SIZE: u32 = 10;

    /// How far the player can see
    pub const FOV_RADIUS: i32 = 8;

    /// Number of items an actor can carry
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Depth of the first floor
    pub const FIRST_DEPTH: u32 = 1;
}
