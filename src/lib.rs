//! Dune Dash - a side-scrolling obstacle-dodge runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, session state)
//! - `highscores`: Best-score persistence behind a storage-agnostic trait
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input wiring and the player-count menu are external
//! collaborators: they drive a [`sim::Session`] through its methods and read
//! back a [`sim::Snapshot`] after each tick.

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{FileHighScores, HighScoreStore, MemoryHighScores};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Field dimensions (world units; one unit = one pixel at native scale)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Ground line; actors and obstacles rest their bottom edge here
    pub const GROUND_Y: f32 = FIELD_HEIGHT - 10.0;

    /// Actor defaults
    pub const ACTOR_WIDTH: f32 = 40.0;
    pub const ACTOR_HEIGHT: f32 = 40.0;
    /// Horizontal position of the first actor; fixed for the whole run
    pub const ACTOR_BASE_X: f32 = 100.0;
    /// Spacing between actors in multi-actor runs
    pub const ACTOR_STRIDE: f32 = 70.0;
    /// Jumps available between touches of the ground (2 = double jump)
    pub const MAX_JUMPS: u32 = 2;

    /// Physics (per tick)
    pub const GRAVITY: f32 = 1.0;
    /// Upward impulse; negative because y grows downward
    pub const JUMP_STRENGTH: f32 = -15.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_BASE_HEIGHT: f32 = 40.0;
    /// Upper bound (exclusive) of the randomized extra height
    pub const OBSTACLE_MAX_EXTRA_HEIGHT: f32 = 30.0;
    /// Ticks between spawns
    pub const SPAWN_INTERVAL_TICKS: u32 = 60;

    /// Difficulty ramp
    pub const BASE_OBSTACLE_SPEED: f32 = 5.0;
    pub const SPEED_INCREMENT: f32 = 0.5;
    /// Score step at which the speed increment is awarded
    pub const SPEED_SCORE_STEP: u32 = 10;
}
