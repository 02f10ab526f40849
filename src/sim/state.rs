//! Session state and core simulation types
//!
//! Everything a run owns lives on [`Session`]: actors, the obstacle field,
//! the spawner, score and difficulty. There is no process-wide state, so any
//! number of sessions can coexist (useful for tests and replays).

use std::fmt;

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::highscores::HighScoreStore;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No run in progress; waiting for `start`
    Idle,
    /// Active gameplay
    Running,
    /// Run ended on a collision; `start` begins a fresh run
    GameOver,
}

/// Opaque render hint for telling actors apart. Never affects simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTag(pub u32);

/// Caller-visible rejection reasons. None of these end a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `request_jump` with an index outside `0..actor_count`
    InvalidActorIndex { index: usize, actor_count: usize },
    /// `start` with zero actors
    InvalidActorCount,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidActorIndex { index, actor_count } => {
                write!(f, "actor index {index} out of range (0..{actor_count})")
            }
            SessionError::InvalidActorCount => write!(f, "a run needs at least one actor"),
        }
    }
}

impl std::error::Error for SessionError {}

/// A controllable runner
///
/// Horizontal position is fixed at spawn; only the vertical axis is
/// simulated. After every tick `y + actor_height <= ground_y` holds: the
/// ground clamps, it never lets an actor sink through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Fixed horizontal position (top-left corner)
    pub x: f32,
    /// Top edge; mutable under gravity
    pub y: f32,
    /// Vertical velocity, positive = downward
    pub vel_y: f32,
    /// Jumps consumed since last touching the ground, `0..=max_jumps`
    pub jump_count: u32,
    pub color: ColorTag,
}

impl Actor {
    /// Spawn the `index`-th actor resting on the ground line.
    pub fn spawn(index: usize, tuning: &Tuning) -> Self {
        Self {
            x: tuning.actor_base_x + tuning.actor_stride * index as f32,
            y: tuning.ground_y - tuning.actor_height,
            vel_y: 0.0,
            jump_count: 0,
            color: ColorTag(index as u32),
        }
    }

    /// True when the actor sits on the ground line.
    pub fn grounded(&self, tuning: &Tuning) -> bool {
        self.y + tuning.actor_height >= tuning.ground_y
    }

    /// Consume one jump if any are left. Allowed while airborne (that is the
    /// double jump) including while still rising from the previous jump.
    pub fn request_jump(&mut self, tuning: &Tuning) -> bool {
        if self.jump_count >= tuning.max_jumps {
            return false;
        }
        self.vel_y = tuning.jump_strength;
        self.jump_count += 1;
        true
    }

    /// One tick of gravity integration with the landing clamp.
    ///
    /// The clamp resolves landing in the same tick the actor would cross the
    /// ground line, so jump requests arriving before the next tick already
    /// see a reset jump budget.
    pub fn integrate(&mut self, tuning: &Tuning) {
        self.vel_y += tuning.gravity;
        self.y += self.vel_y;
        if self.y + tuning.actor_height >= tuning.ground_y {
            self.y = tuning.ground_y - tuning.actor_height;
            self.vel_y = 0.0;
            self.jump_count = 0;
        }
    }

    pub fn bounds(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.x, self.y, tuning.actor_width, tuning.actor_height)
    }
}

/// A scrolling obstacle. Geometry is immutable after spawn; only `x` moves,
/// monotonically decreasing, until the field prunes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Timed obstacle generation
///
/// Ticks a timer and emits one obstacle each time it exceeds the spawn
/// interval. Height is randomized from the injected RNG; everything else is
/// fixed, so a fixed RNG makes spawning fully reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    pub timer: u32,
}

impl Spawner {
    /// Advance one tick; returns the newly spawned obstacle, if any.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning) -> Option<Obstacle> {
        self.timer += 1;
        if self.timer <= tuning.spawn_interval {
            return None;
        }
        self.timer = 0;

        let extra = if tuning.obstacle_max_extra_height > 0.0 {
            rng.random_range(0.0..tuning.obstacle_max_extra_height)
        } else {
            0.0
        };
        let height = tuning.obstacle_base_height + extra;
        Some(Obstacle {
            // Enters from off-screen right, base resting on the ground line
            x: tuning.field_width,
            y: tuning.ground_y - height,
            width: tuning.obstacle_width,
            height,
        })
    }
}

/// Live obstacles in spawn order
///
/// Append-only at the tail; pruning can remove any number of obstacles in a
/// single tick without disturbing the order of the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Scroll every obstacle left by `speed` and prune the ones whose right
    /// edge has crossed the left boundary. Returns how many were passed.
    pub fn advance(&mut self, speed: f32) -> u32 {
        let mut passed = 0;
        self.obstacles.retain_mut(|obstacle| {
            obstacle.x -= speed;
            if obstacle.x + obstacle.width < 0.0 {
                passed += 1;
                false
            } else {
                true
            }
        });
        passed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

/// One game run: actors, obstacles, score and the session state machine.
///
/// An external frame driver calls [`super::tick`] once per frame and reads a
/// [`Snapshot`] afterwards; input arrives through [`Session::request_jump`].
pub struct Session {
    pub(crate) tuning: Tuning,
    pub phase: SessionPhase,
    pub actors: Vec<Actor>,
    pub field: ObstacleField,
    pub spawner: Spawner,
    /// Obstacles passed this run; monotonically non-decreasing
    pub score: u32,
    /// Current scroll speed; rises with score, never falls within a run
    pub obstacle_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) high_score: u32,
    pub(crate) store: Box<dyn HighScoreStore>,
    pub(crate) rng: Box<dyn RngCore>,
}

impl Session {
    /// Create an idle session with a seeded RNG.
    ///
    /// The high score is read from the store once, here, and cached for the
    /// session's lifetime.
    pub fn new(tuning: Tuning, store: Box<dyn HighScoreStore>, seed: u64) -> Self {
        Self::with_rng(tuning, store, Box::new(Pcg32::seed_from_u64(seed)))
    }

    /// Create an idle session with an injected random source.
    pub fn with_rng(
        tuning: Tuning,
        store: Box<dyn HighScoreStore>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let obstacle_speed = tuning.base_speed;
        let high_score = store.read();
        Self {
            tuning,
            phase: SessionPhase::Idle,
            actors: Vec::new(),
            field: ObstacleField::default(),
            spawner: Spawner::default(),
            score: 0,
            obstacle_speed,
            time_ticks: 0,
            high_score,
            store,
            rng,
        }
    }

    /// Begin a fresh run with `actor_count` actors. Valid from any phase;
    /// restarting after game over is the same full reset.
    pub fn start(&mut self, actor_count: usize) -> Result<(), SessionError> {
        if actor_count == 0 {
            return Err(SessionError::InvalidActorCount);
        }
        self.score = 0;
        self.obstacle_speed = self.tuning.base_speed;
        self.spawner = Spawner::default();
        self.field.clear();
        self.actors = (0..actor_count)
            .map(|index| Actor::spawn(index, &self.tuning))
            .collect();
        self.time_ticks = 0;
        self.phase = SessionPhase::Running;
        log::info!("run started with {actor_count} actor(s)");
        Ok(())
    }

    /// Abandon any run in progress and return to idle. Safe from any phase.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.actors.clear();
        self.field.clear();
        self.spawner = Spawner::default();
        self.score = 0;
        self.obstacle_speed = self.tuning.base_speed;
        self.time_ticks = 0;
    }

    /// Jump request for one actor, applied immediately (before the next
    /// integration step).
    ///
    /// Outside `Running` this is a silent no-op (`Ok(false)`): key presses
    /// legitimately race the state machine around game over. A bad index
    /// during a run is a caller error and is rejected without touching state.
    pub fn request_jump(&mut self, index: usize) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::Running {
            return Ok(false);
        }
        let actor_count = self.actors.len();
        let actor = self
            .actors
            .get_mut(index)
            .ok_or(SessionError::InvalidActorIndex { index, actor_count })?;
        Ok(actor.request_jump(&self.tuning))
    }

    /// Balance knobs this session runs with.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Best score seen by this session (cached store read plus any run that
    /// beat it since).
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Read-only view of the current state for renderers and overlays.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            actors: self
                .actors
                .iter()
                .map(|actor| ActorView {
                    x: actor.x,
                    y: actor.y,
                    width: self.tuning.actor_width,
                    height: self.tuning.actor_height,
                    color: actor.color,
                })
                .collect(),
            obstacles: self
                .field
                .iter()
                .map(|obstacle| ObstacleView {
                    x: obstacle.x,
                    y: obstacle.y,
                    width: obstacle.width,
                    height: obstacle.height,
                })
                .collect(),
            score: self.score,
            high_score: self.high_score,
            phase: self.phase,
        }
    }
}

/// Per-tick render snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub actors: Vec<ActorView>,
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub high_score: u32,
    pub phase: SessionPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: ColorTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;
    use proptest::prelude::*;

    fn test_session() -> Session {
        Session::new(Tuning::default(), Box::new(MemoryHighScores::default()), 7)
    }

    #[test]
    fn test_actor_spawns_grounded() {
        let tuning = Tuning::default();
        let actor = Actor::spawn(0, &tuning);
        assert!(actor.grounded(&tuning));
        assert_eq!(actor.y, tuning.ground_y - tuning.actor_height);
        assert_eq!(actor.vel_y, 0.0);
        assert_eq!(actor.jump_count, 0);
        assert_eq!(actor.x, tuning.actor_base_x);

        let second = Actor::spawn(1, &tuning);
        assert_eq!(second.x, tuning.actor_base_x + tuning.actor_stride);
        assert_ne!(second.color, actor.color);
    }

    #[test]
    fn test_jump_budget() {
        let tuning = Tuning::default();
        let mut actor = Actor::spawn(0, &tuning);

        assert!(actor.request_jump(&tuning));
        assert_eq!(actor.jump_count, 1);
        assert_eq!(actor.vel_y, tuning.jump_strength);

        // Second jump is legal while still rising from the first
        actor.integrate(&tuning);
        assert!(actor.vel_y < 0.0);
        assert!(actor.request_jump(&tuning));
        assert_eq!(actor.jump_count, 2);

        // Third is denied and changes nothing
        let before = actor;
        assert!(!actor.request_jump(&tuning));
        assert_eq!(actor, before);
    }

    #[test]
    fn test_landing_clamps_exactly_and_resets_jumps() {
        let tuning = Tuning::default();
        let mut actor = Actor::spawn(0, &tuning);
        actor.request_jump(&tuning);
        actor.request_jump(&tuning);

        let mut landed = false;
        for _ in 0..200 {
            actor.integrate(&tuning);
            assert!(actor.y + tuning.actor_height <= tuning.ground_y);
            if actor.grounded(&tuning) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(actor.y, tuning.ground_y - tuning.actor_height);
        assert_eq!(actor.vel_y, 0.0);
        assert_eq!(actor.jump_count, 0);
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::default();
        let mut rng = Pcg32::seed_from_u64(1);

        for _ in 0..tuning.spawn_interval {
            assert!(spawner.advance(&mut rng, &tuning).is_none());
        }
        let obstacle = spawner
            .advance(&mut rng, &tuning)
            .expect("tick after the interval spawns");
        assert_eq!(spawner.timer, 0);

        assert_eq!(obstacle.x, tuning.field_width);
        assert_eq!(obstacle.width, tuning.obstacle_width);
        assert!(obstacle.height >= tuning.obstacle_base_height);
        assert!(obstacle.height < tuning.obstacle_base_height + tuning.obstacle_max_extra_height);
        // Base rests on the ground line
        assert!((obstacle.y + obstacle.height - tuning.ground_y).abs() < 1e-3);
    }

    #[test]
    fn test_field_advance_prunes_and_counts() {
        let mut field = ObstacleField::default();
        let obstacle = |x: f32| Obstacle {
            x,
            y: 0.0,
            width: 40.0,
            height: 40.0,
        };
        field.push(obstacle(-36.0)); // right edge at 4, gone after one step of 5
        field.push(obstacle(200.0));
        field.push(obstacle(-37.0)); // also gone

        let passed = field.advance(5.0);
        assert_eq!(passed, 2);
        assert_eq!(field.len(), 1);
        assert_eq!(field.iter().next().unwrap().x, 195.0);
    }

    #[test]
    fn test_field_preserves_spawn_order() {
        let mut field = ObstacleField::default();
        for i in 0..4 {
            field.push(Obstacle {
                x: 100.0 + i as f32,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            });
        }
        field.advance(1.0);
        let xs: Vec<f32> = field.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![99.0, 100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_start_rejects_zero_actors() {
        let mut session = test_session();
        assert_eq!(session.start(0), Err(SessionError::InvalidActorCount));
        assert_eq!(session.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut session = test_session();
        session.start(2).unwrap();
        let first = session.snapshot();

        // Dirty the state, then start again
        session.request_jump(0).unwrap();
        for _ in 0..100 {
            super::super::tick(&mut session);
        }
        session.start(2).unwrap();
        assert_eq!(session.snapshot(), first);
        assert_eq!(session.score, 0);
        assert_eq!(session.obstacle_speed, session.tuning().base_speed);
        assert!(session.field.is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = test_session();
        session.start(1).unwrap();
        super::super::tick(&mut session);
        session.reset();
        assert_eq!(session.phase, SessionPhase::Idle);
        assert!(session.actors.is_empty());
        assert!(session.field.is_empty());
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_request_jump_validates_index() {
        let mut session = test_session();

        // Not running: silent no-op even with a bad index
        assert_eq!(session.request_jump(5), Ok(false));

        session.start(1).unwrap();
        assert_eq!(
            session.request_jump(1),
            Err(SessionError::InvalidActorIndex {
                index: 1,
                actor_count: 1
            })
        );
        assert_eq!(session.request_jump(0), Ok(true));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = test_session();
        session.start(2).unwrap();
        session.field.push(Obstacle {
            x: 300.0,
            y: 350.0,
            width: 40.0,
            height: 40.0,
        });

        let snap = session.snapshot();
        assert_eq!(snap.actors.len(), 2);
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(snap.phase, SessionPhase::Running);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.actors[0].color, ColorTag(0));
        assert_eq!(snap.actors[1].color, ColorTag(1));

        // Snapshots serialize for out-of-process renderers
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"score\":0"));
    }

    proptest! {
        #[test]
        fn actor_never_sinks_and_always_lands_exactly(
            y0 in 0.0f32..300.0,
            v0 in -20.0f32..5.0,
        ) {
            let tuning = Tuning::default();
            let mut actor = Actor::spawn(0, &tuning);
            actor.y = y0.min(tuning.ground_y - tuning.actor_height);
            actor.vel_y = v0;

            for _ in 0..1000 {
                actor.integrate(&tuning);
                prop_assert!(actor.y + tuning.actor_height <= tuning.ground_y);
            }
            // Gravity is positive, so any airborne actor has landed by now
            prop_assert!(actor.grounded(&tuning));
            prop_assert_eq!(actor.y, tuning.ground_y - tuning.actor_height);
            prop_assert_eq!(actor.vel_y, 0.0);
        }

        #[test]
        fn jump_count_never_exceeds_max(requests in proptest::collection::vec(any::<bool>(), 0..300)) {
            let tuning = Tuning::default();
            let mut actor = Actor::spawn(0, &tuning);
            for jump in requests {
                if jump {
                    actor.request_jump(&tuning);
                }
                actor.integrate(&tuning);
                prop_assert!(actor.jump_count <= tuning.max_jumps);
            }
        }
    }
}
