//! Data-driven game balance
//!
//! Every knob the simulation equations use lives here, so tests can shrink
//! intervals and hosts can ship balance patches as plain JSON without
//! touching code. Defaults come from [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Balance knobs for one session. Distances are world units, times are ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Field width; obstacles enter at this x
    pub field_width: f32,
    /// Ground line; bottom edges rest here
    pub ground_y: f32,

    pub actor_width: f32,
    pub actor_height: f32,
    /// Horizontal position of actor 0
    pub actor_base_x: f32,
    /// Spacing between actors in multi-actor runs
    pub actor_stride: f32,
    /// Jumps available between touches of the ground
    pub max_jumps: u32,

    /// Downward acceleration per tick
    pub gravity: f32,
    /// Velocity set by a jump; negative = upward
    pub jump_strength: f32,

    pub obstacle_width: f32,
    pub obstacle_base_height: f32,
    /// Upper bound (exclusive) of the randomized extra height
    pub obstacle_max_extra_height: f32,
    /// Ticks between spawns
    pub spawn_interval: u32,

    /// Scroll speed at the start of a run
    pub base_speed: f32,
    /// Speed gained per score threshold crossed
    pub speed_increment: f32,
    /// Score step that awards a speed increment
    pub speed_score_step: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: consts::FIELD_WIDTH,
            ground_y: consts::GROUND_Y,
            actor_width: consts::ACTOR_WIDTH,
            actor_height: consts::ACTOR_HEIGHT,
            actor_base_x: consts::ACTOR_BASE_X,
            actor_stride: consts::ACTOR_STRIDE,
            max_jumps: consts::MAX_JUMPS,
            gravity: consts::GRAVITY,
            jump_strength: consts::JUMP_STRENGTH,
            obstacle_width: consts::OBSTACLE_WIDTH,
            obstacle_base_height: consts::OBSTACLE_BASE_HEIGHT,
            obstacle_max_extra_height: consts::OBSTACLE_MAX_EXTRA_HEIGHT,
            spawn_interval: consts::SPAWN_INTERVAL_TICKS,
            base_speed: consts::BASE_OBSTACLE_SPEED,
            speed_increment: consts::SPEED_INCREMENT,
            speed_score_step: consts::SPEED_SCORE_STEP,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults when the file
    /// is missing or malformed. Never fails the caller.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("ignoring malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_playable() {
        let tuning = Tuning::default();
        assert!(tuning.gravity > 0.0);
        assert!(tuning.jump_strength < 0.0);
        assert!(tuning.base_speed > 0.0);
        assert!(tuning.spawn_interval > 0);
        assert!(tuning.speed_score_step > 0);
        // An actor must fit between the ground and the top of the field
        assert!(tuning.actor_height < tuning.ground_y);
    }

    #[test]
    fn test_partial_json_fills_from_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"gravity": 2.5, "max_jumps": 3}"#).unwrap();
        assert_eq!(tuning.gravity, 2.5);
        assert_eq!(tuning.max_jumps, 3);
        assert_eq!(tuning.base_speed, Tuning::default().base_speed);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Path::new("/nonexistent/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
