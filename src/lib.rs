//! Roulette Wheel - spinning wheel and rolling ball simulation core
//!
//! Core modules:
//! - `sim`: Simulation (wheel decay, ball integration, collisions, outcome, spin session)
//! - `config`: Physics configuration record with validation
//! - `platform`: Glue for the browser rendering host
//!
//! Rendering, asset loading and input wiring belong to the host. The host
//! calls [`sim::SpinSession::tick`] once per display frame and reads back a
//! [`sim::FrameSnapshot`].

pub mod config;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, PhysicsConfig};

use glam::DVec2;

/// Simulation constants that are not tunable per session
pub mod consts {
    /// Reference frame duration. Velocities are displacements per reference frame.
    pub const REFERENCE_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per tick to bound work on long frames
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Number of pockets on a single-zero wheel
    pub const SLOT_COUNT: usize = 37;
    /// Angular width of one pocket
    pub const SLOT_WIDTH: f64 = std::f64::consts::TAU / SLOT_COUNT as f64;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) in the wheel plane to (x, z)
#[inline]
pub fn polar_to_plane(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a wheel-plane point (x, z) to polar (r, theta)
///
/// The angle at the exact centre is undefined; it is reported as 0.
#[inline]
pub fn plane_to_polar(x: f64, z: f64) -> (f64, f64) {
    let r = (x * x + z * z).sqrt();
    if r == 0.0 {
        (0.0, 0.0)
    } else {
        (r, z.atan2(x))
    }
}
