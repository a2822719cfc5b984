//! Physics configuration
//!
//! One immutable record per session. Hosts may override any subset of the
//! fields from JSON; unknown keys are rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::OutcomeStrategy;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Override document could not be parsed (includes unknown fields)
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field is outside its accepted range
    #[error("configuration field `{field}` = {value} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The launch radius must lie between the cone and the outer wall
    #[error("launch radius {launch} must lie in ({inner}, {max}]")]
    LaunchOutsideTrack { launch: f64, inner: f64, max: f64 },
}

/// Tunable physics constants
///
/// Linear velocities are displacements per reference frame (1/60 s), so
/// per-frame factors such as `surface_friction` and `decay_factor` apply
/// once per 60 Hz frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    // === Vertical ===
    /// Vertical acceleration (negative is down)
    pub gravity: f64,
    /// Height of the track the ball rolls on
    pub surface_height: f64,
    /// Launch height above the surface
    pub launch_height: f64,
    /// Bounce coefficient for surface contact
    pub vertical_restitution: f64,
    /// Incoming vertical speed at or below which the ball settles instead of bouncing
    pub settle_speed: f64,

    // === Geometry ===
    /// Largest radial distance of the ball centre (outer wall)
    pub max_radius: f64,
    /// Smallest radial distance of the ball centre (centre cone)
    pub inner_radius: f64,
    /// Ball radius (cosmetic roll only)
    pub ball_radius: f64,
    /// Bounce coefficient for the outer wall
    pub wall_restitution: f64,
    /// Bounce coefficient for the centre cone
    pub cone_restitution: f64,

    // === Track dynamics ===
    /// Per-frame horizontal velocity multiplier while in contact
    pub surface_friction: f64,
    /// Outward push per unit of wheel speed and radius
    pub centrifugal_scale: f64,
    /// Horizontal velocity coupling per unit of wheel speed
    pub coriolis_scale: f64,
    /// Horizontal speed below which the ball stops creeping
    pub creep_epsilon: f64,

    // === Wheel ===
    /// Per-frame angular speed multiplier
    pub decay_factor: f64,
    /// Angular speed below which the wheel snaps to rest
    pub wheel_snap_epsilon: f64,

    // === Launch ===
    /// Start radius of a randomized launch
    pub launch_radius: f64,
    /// Tangential launch speed range
    pub launch_speed_min: f64,
    pub launch_speed_max: f64,
    /// Downward component of the launch velocity
    pub launch_drop_speed: f64,
    /// Wheel angular speed range (radians per frame)
    pub wheel_speed_min: f64,
    pub wheel_speed_max: f64,

    // === Stop condition ===
    pub angular_stop_threshold: f64,
    pub linear_stop_threshold: f64,

    // === Stepping ===
    /// Longest substep before the integrator splits a tick
    pub max_substep_dt: f64,
    /// Frames longer than this are clamped (tab switches, debugger pauses)
    pub max_frame_dt: f64,

    /// How the winning pocket is chosen once the wheel settles
    pub outcome: OutcomeStrategy,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -0.06,
            surface_height: -0.135,
            launch_height: 0.05,
            vertical_restitution: 0.5,
            settle_speed: 0.003,

            max_radius: 0.228,
            inner_radius: 0.092,
            ball_radius: 0.012,
            wall_restitution: 0.7,
            cone_restitution: 0.6,

            surface_friction: 0.985,
            centrifugal_scale: 0.02,
            coriolis_scale: 0.1,
            creep_epsilon: 1e-4,

            decay_factor: 0.998,
            wheel_snap_epsilon: 0.001,

            launch_radius: 0.20,
            launch_speed_min: 0.02,
            launch_speed_max: 0.03,
            launch_drop_speed: 0.004,
            wheel_speed_min: 0.08,
            wheel_speed_max: 0.12,

            angular_stop_threshold: 0.005,
            linear_stop_threshold: 0.0008,

            max_substep_dt: 1.0 / 60.0,
            max_frame_dt: 0.1,

            outcome: OutcomeStrategy::BallPosition,
        }
    }
}

impl PhysicsConfig {
    /// Parse a (possibly partial) override document and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_radius", self.max_radius)?;
        positive("inner_radius", self.inner_radius)?;
        positive("ball_radius", self.ball_radius)?;
        positive("settle_speed", self.settle_speed)?;
        positive("creep_epsilon", self.creep_epsilon)?;
        positive("wheel_snap_epsilon", self.wheel_snap_epsilon)?;
        positive("angular_stop_threshold", self.angular_stop_threshold)?;
        positive("linear_stop_threshold", self.linear_stop_threshold)?;
        positive("max_substep_dt", self.max_substep_dt)?;
        positive("max_frame_dt", self.max_frame_dt)?;

        negative("gravity", self.gravity)?;
        finite("surface_height", self.surface_height)?;
        non_negative("launch_height", self.launch_height)?;
        non_negative("launch_drop_speed", self.launch_drop_speed)?;
        non_negative("centrifugal_scale", self.centrifugal_scale)?;
        non_negative("coriolis_scale", self.coriolis_scale)?;

        unit_factor("surface_friction", self.surface_friction)?;
        unit_factor("decay_factor", self.decay_factor)?;
        unit_interval("vertical_restitution", self.vertical_restitution)?;
        unit_interval("cone_restitution", self.cone_restitution)?;
        if !(self.wall_restitution > 0.5 && self.wall_restitution <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "wall_restitution",
                value: self.wall_restitution,
                reason: "must be in (0.5, 1] so the ball turns back from the wall",
            });
        }

        range("launch_speed", self.launch_speed_min, self.launch_speed_max)?;
        range("wheel_speed", self.wheel_speed_min, self.wheel_speed_max)?;

        if !(self.launch_radius > self.inner_radius && self.launch_radius <= self.max_radius) {
            return Err(ConfigError::LaunchOutsideTrack {
                launch: self.launch_radius,
                inner: self.inner_radius,
                max: self.max_radius,
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be finite" })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be positive" })
    }
}

fn negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value < 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be negative (downward)" })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be non-negative" })
    }
}

/// Strictly below one, otherwise the quantity never decays to rest
fn unit_factor(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be in (0, 1)" })
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, reason: "must be in [0, 1]" })
    }
}

fn range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite() && min >= 0.0) {
        return Err(ConfigError::OutOfRange { field, value: min, reason: "bounds must be finite and non-negative" });
    }
    if min > max {
        return Err(ConfigError::OutOfRange { field, value: min, reason: "minimum exceeds maximum" });
    }
    Ok(())
}
