//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick deltas only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, intersects};
pub use state::{
    Actor, ActorView, ColorTag, Obstacle, ObstacleField, ObstacleView, Session, SessionError,
    SessionPhase, Snapshot, Spawner,
};
pub use tick::tick;
