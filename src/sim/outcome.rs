//! Winning pocket selection

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::slots::{SlotEntry, slot_at};
use super::state::{BallState, WheelState};
use crate::consts::{SLOT_COUNT, SLOT_WIDTH};
use crate::{normalize_angle, plane_to_polar};

/// How a settled spin is turned into a pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStrategy {
    /// Pocket under the resting ball, relative to the wheel
    #[default]
    BallPosition,
    /// Uniform draw, independent of where the ball stopped
    UniformRandom,
}

/// Index of the pocket under a ball at polar angle `ball_angle`
///
/// `floor(normalize(ball_angle - wheel_rotation) / slot_width) mod 37`
pub fn slot_index(ball_angle: f64, wheel_rotation: f64) -> usize {
    let relative = normalize_angle(ball_angle - wheel_rotation);
    ((relative / SLOT_WIDTH).floor() as usize) % SLOT_COUNT
}

/// Index of the pocket the ball is resting in
pub fn resting_slot_index(ball: &BallState, wheel: &WheelState) -> usize {
    let (_, theta) = plane_to_polar(ball.position.x, ball.position.z);
    slot_index(theta, wheel.rotation_angle)
}

/// Resolve the final pocket for a settled spin
pub fn resolve<R: Rng>(
    strategy: OutcomeStrategy,
    ball: &BallState,
    wheel: &WheelState,
    rng: &mut R,
) -> SlotEntry {
    match strategy {
        OutcomeStrategy::BallPosition => slot_at(resting_slot_index(ball, wheel)),
        OutcomeStrategy::UniformRandom => slot_at(rng.random_range(0..SLOT_COUNT)),
    }
}
