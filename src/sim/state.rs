//! Wheel, ball and spin phase records
//!
//! The session owns one of each; a new spin replaces the ball outright.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::PhysicsConfig;
use crate::{normalize_angle, polar_to_plane};

/// Current phase of a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    /// Waiting for a spin request
    Idle,
    /// Wheel and ball in motion
    Spinning,
    /// Settled, result available until acknowledged
    Resolved,
}

/// Wheel rotation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelState {
    /// Rotation angle in [0, 2π), same polar convention as ball positions
    pub rotation_angle: f64,
    /// Radians per reference frame, never negative
    pub angular_speed: f64,
}

impl WheelState {
    /// Advance by `frames` reference frames and decay the speed
    pub fn advance(&mut self, frames: f64, decay_factor: f64, snap_epsilon: f64) {
        if self.angular_speed == 0.0 {
            return;
        }
        self.rotation_angle = normalize_angle(self.rotation_angle + self.angular_speed * frames);
        self.angular_speed *= decay_factor.powf(frames);
        if self.angular_speed < snap_epsilon {
            self.angular_speed = 0.0;
        }
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.angular_speed == 0.0
    }
}

/// The ball
///
/// `y` is vertical; `x` and `z` span the wheel plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: DVec3,
    /// Displacement per reference frame
    pub velocity: DVec3,
    pub radius: f64,
    /// Axis-angle orientation change for the last frame (cosmetic)
    pub roll: DVec3,
}

impl BallState {
    /// Place a fresh ball for `launch`, moving against the wheel's direction
    pub fn launched(launch: &SpinLaunch, config: &PhysicsConfig) -> Self {
        let theta = launch.start_angle;
        let plane = polar_to_plane(launch.start_radius, theta);
        // Wheel turns toward increasing angle, tangent (-sin, cos); the ball goes the other way
        let velocity = DVec3::new(
            launch.tangential_speed * theta.sin(),
            -launch.drop_speed,
            -launch.tangential_speed * theta.cos(),
        );
        Self {
            position: DVec3::new(plane.x, config.surface_height + config.launch_height, plane.y),
            velocity,
            radius: config.ball_radius,
            roll: DVec3::ZERO,
        }
    }

    /// Radial distance from the wheel axis
    #[inline]
    pub fn radial_distance(&self) -> f64 {
        (self.position.x * self.position.x + self.position.z * self.position.z).sqrt()
    }

    #[inline]
    pub fn horizontal_speed(&self) -> f64 {
        (self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z).sqrt()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Whether the ball is resting on (or has sunk to) the track surface
    #[inline]
    pub fn touches_surface(&self, surface_height: f64) -> bool {
        self.position.y <= surface_height
    }

    /// Recompute the cosmetic roll from horizontal velocity
    pub fn update_roll(&mut self) {
        self.roll = DVec3::new(self.velocity.z, 0.0, -self.velocity.x) / self.radius;
    }
}

/// Start parameters for one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinLaunch {
    /// Polar angle of the ball at launch
    pub start_angle: f64,
    pub start_radius: f64,
    /// Speed along the track, against the wheel
    pub tangential_speed: f64,
    /// Downward launch speed
    pub drop_speed: f64,
    /// Initial wheel angular speed
    pub wheel_speed: f64,
}

impl SpinLaunch {
    /// Whether the launch can run to rest under `config`
    ///
    /// Every field finite, speeds non-negative, start radius on the track.
    pub fn is_valid(&self, config: &PhysicsConfig) -> bool {
        let finite = [
            self.start_angle,
            self.start_radius,
            self.tangential_speed,
            self.drop_speed,
            self.wheel_speed,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite
            && self.tangential_speed >= 0.0
            && self.drop_speed >= 0.0
            && self.wheel_speed >= 0.0
            && self.start_radius > config.inner_radius
            && self.start_radius <= config.max_radius
    }

    /// Draw a launch from the configured ranges
    pub fn random<R: Rng>(rng: &mut R, config: &PhysicsConfig) -> Self {
        Self {
            start_angle: rng.random_range(0.0..TAU),
            start_radius: config.launch_radius,
            tangential_speed: rng.random_range(config.launch_speed_min..=config.launch_speed_max),
            drop_speed: config.launch_drop_speed,
            wheel_speed: rng.random_range(config.wheel_speed_min..=config.wheel_speed_max),
        }
    }
}
