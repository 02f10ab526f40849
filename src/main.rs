//! Dune Dash entry point
//!
//! Headless demo driver: builds a session against the on-disk high-score
//! store and lets a small autopilot play one run, logging the outcome.
//! Rendering front-ends drive the same `Session`/`tick`/`snapshot` surface;
//! nothing here is required by the simulation itself.

use std::time::{SystemTime, UNIX_EPOCH};

use dune_dash::sim::{Session, SessionPhase, tick};
use dune_dash::{FileHighScores, Tuning};

fn main() {
    env_logger::init();
    log::info!("Dune Dash (headless) starting...");

    let store = FileHighScores::open_default();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    log::info!("seed: {seed}");

    let mut session = Session::new(Tuning::default(), Box::new(store), seed);
    session.start(1).expect("demo runs a single actor");

    let mut ticks = 0u32;
    while session.phase == SessionPhase::Running && ticks < 100_000 {
        autopilot(&mut session);
        tick(&mut session);
        ticks += 1;
    }

    let snap = session.snapshot();
    log::info!(
        "run ended after {ticks} ticks: score {}, best {}",
        snap.score,
        snap.high_score
    );
}

/// Crude look-ahead pilot: jump as soon as an obstacle gets close. Good for
/// a few difficulty ramps before the scroll speed outruns its reaction window.
fn autopilot(session: &mut Session) {
    let actor = session.actors[0];
    let reach = session.obstacle_speed * 12.0;
    let actor_right = actor.x + session.tuning().actor_width;

    let threat_near = session
        .field
        .iter()
        .any(|obstacle| obstacle.x + obstacle.width > actor.x && obstacle.x < actor_right + reach);

    if threat_near && actor.jump_count == 0 {
        let _ = session.request_jump(0);
    }
}
