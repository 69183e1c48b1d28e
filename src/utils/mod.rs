//! # Utilities Module
//!
//! Search helpers shared by the AI and the autoexplore driver.

pub mod pathfinding;

pub use pathfinding::*;
