//! Per-frame integrator
//!
//! The wheel is advanced first and on its own; its current angular speed
//! then drives the ball's pseudo-forces. The ball is stepped in substeps no
//! longer than `max_substep_dt` so long frames cannot carry it through a wall.

use super::collision::{WallHit, contain_radially, resolve_surface_contact};
use super::state::{BallState, WheelState};
use crate::config::PhysicsConfig;
use crate::consts::{MAX_SUBSTEPS, REFERENCE_DT};

/// What happened during one integrator call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub substeps: u32,
    pub rim_hits: u32,
    pub cone_hits: u32,
}

/// Number of ball substeps for a frame of length `dt`
pub fn substeps_for(dt: f64, max_substep_dt: f64) -> u32 {
    let n = (dt / max_substep_dt).ceil();
    if n.is_nan() || n < 1.0 {
        1
    } else if n >= MAX_SUBSTEPS as f64 {
        MAX_SUBSTEPS
    } else {
        n as u32
    }
}

/// Advance the wheel by `dt` seconds
#[inline]
pub fn step_wheel(wheel: &mut WheelState, config: &PhysicsConfig, dt: f64) {
    wheel.advance(dt / REFERENCE_DT, config.decay_factor, config.wheel_snap_epsilon);
}

/// Advance the ball by one substep of `dt` seconds
pub fn step_ball(
    ball: &mut BallState,
    wheel_speed: f64,
    config: &PhysicsConfig,
    dt: f64,
) -> Option<WallHit> {
    let frames = dt / REFERENCE_DT;

    if ball.touches_surface(config.surface_height) {
        resolve_surface_contact(ball, wheel_speed, config, frames);
    } else {
        ball.velocity.y += config.gravity * dt;
    }

    ball.position += ball.velocity * frames;

    // Landing: the next substep sees the contact and decides bounce vs settle
    if ball.position.y < config.surface_height {
        ball.position.y = config.surface_height;
    }

    let hit = contain_radially(ball, config);
    ball.update_roll();
    hit
}

/// Advance wheel and ball by one frame of `dt` seconds
pub fn integrate(
    wheel: &mut WheelState,
    ball: &mut BallState,
    config: &PhysicsConfig,
    dt: f64,
) -> StepReport {
    step_wheel(wheel, config, dt);

    let substeps = substeps_for(dt, config.max_substep_dt);
    let sub_dt = dt / substeps as f64;
    let mut report = StepReport {
        substeps,
        ..Default::default()
    };

    for _ in 0..substeps {
        match step_ball(ball, wheel.angular_speed, config, sub_dt) {
            Some(WallHit::Rim) => report.rim_hits += 1,
            Some(WallHit::Cone) => report.cone_hits += 1,
            None => {}
        }
    }

    report
}
