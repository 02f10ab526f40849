//! Per-frame advancement of a running session
//!
//! An external frame driver calls [`tick`] exactly once per frame. The
//! sub-steps always run in the same order: actor physics, spawning,
//! scrolling with score bookkeeping, then the collision scan. For a given
//! random source and input sequence the whole run is deterministic.

use super::collision::intersects;
use super::state::{Session, SessionPhase};

/// Advance the session by one tick. No-op unless the session is running.
pub fn tick(session: &mut Session) {
    if session.phase != SessionPhase::Running {
        return;
    }
    session.time_ticks += 1;

    // 1. Actor physics (includes the landing clamp, so jump budgets are
    //    already reset when the next frame's input arrives)
    for actor in &mut session.actors {
        actor.integrate(&session.tuning);
    }

    // 2. Spawn timer; a fresh obstacle still moves this same tick
    if let Some(obstacle) = session.spawner.advance(&mut *session.rng, &session.tuning) {
        session.field.push(obstacle);
    }

    // 3. Scroll, score the pruned passes, ramp difficulty. A big prune batch
    //    can cross several score thresholds at once; each one counts.
    let passed = session.field.advance(session.obstacle_speed);
    if passed > 0 {
        let step = session.tuning.speed_score_step.max(1);
        let crossings = (session.score + passed) / step - session.score / step;
        session.score += passed;
        if crossings > 0 {
            session.obstacle_speed += session.tuning.speed_increment * crossings as f32;
            log::debug!(
                "difficulty up: speed {:.1} at score {}",
                session.obstacle_speed,
                session.score
            );
        }
    }

    // 4. Collision scan. The first hit by ANY actor ends the whole run, so
    //    remaining pairs are skipped.
    let mut collided = false;
    'scan: for actor in &session.actors {
        let bounds = actor.bounds(&session.tuning);
        for obstacle in session.field.iter() {
            if intersects(&bounds, &obstacle.bounds()) {
                collided = true;
                break 'scan;
            }
        }
    }

    if collided {
        session.phase = SessionPhase::GameOver;
        session.store.write_if_greater(session.score);
        session.high_score = session.high_score.max(session.score);
        log::info!(
            "game over after {} ticks: score {}, best {}",
            session.time_ticks,
            session.score,
            session.high_score
        );
    }
}
