//! Contact and containment for the ball on the wheel
//!
//! Two kinds of contact:
//! - Surface (vertical): the track the ball rolls on, where the spinning
//!   wheel drags the ball around through pseudo-forces and friction
//! - Radial: the outer rim and the centre cone, both circles in the wheel plane

use glam::DVec2;

use super::state::BallState;
use crate::config::PhysicsConfig;
use crate::{plane_to_polar, polar_to_plane};

/// Result of a radial containment check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the ball crossed a wall
    pub hit: bool,
    /// Closest allowed point in the wheel plane
    pub point: DVec2,
    /// Unit normal pointing from the wall into the track
    pub normal: DVec2,
    /// How far past the wall the ball centre is
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: DVec2::ZERO,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Which wall a ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Rim,
    Cone,
}

/// Check the ball centre against the outer rim
pub fn ball_rim_collision(plane_pos: DVec2, max_radius: f64) -> CollisionResult {
    let (r, theta) = plane_to_polar(plane_pos.x, plane_pos.y);

    if r > max_radius {
        let outward = polar_to_plane(1.0, theta);
        return CollisionResult {
            hit: true,
            point: outward * max_radius,
            normal: -outward,
            penetration: r - max_radius,
        };
    }

    CollisionResult::miss()
}

/// Check the ball centre against the centre cone
pub fn ball_cone_collision(plane_pos: DVec2, inner_radius: f64) -> CollisionResult {
    let (r, theta) = plane_to_polar(plane_pos.x, plane_pos.y);

    if r < inner_radius {
        let outward = polar_to_plane(1.0, theta);
        return CollisionResult {
            hit: true,
            point: outward * inner_radius,
            normal: outward,
            penetration: inner_radius - r,
        };
    }

    CollisionResult::miss()
}

/// Reflect velocity off a surface, scaled by restitution
///
/// v' = v - 2(v·n)n·e
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2, restitution: f64) -> DVec2 {
    velocity - normal * (2.0 * velocity.dot(normal) * restitution)
}

/// Keep the ball between the cone and the rim
///
/// The ball is put back on the wall it crossed. Velocity is reflected only
/// when it still points through that wall.
pub fn contain_radially(ball: &mut BallState, config: &PhysicsConfig) -> Option<WallHit> {
    let plane = DVec2::new(ball.position.x, ball.position.z);

    let (result, restitution, wall) = {
        let rim = ball_rim_collision(plane, config.max_radius);
        if rim.hit {
            (rim, config.wall_restitution, WallHit::Rim)
        } else {
            let cone = ball_cone_collision(plane, config.inner_radius);
            if !cone.hit {
                return None;
            }
            (cone, config.cone_restitution, WallHit::Cone)
        }
    };

    let mut velocity = DVec2::new(ball.velocity.x, ball.velocity.z);
    if velocity.dot(result.normal) < 0.0 {
        velocity = reflect_velocity(velocity, result.normal, restitution);
    }
    ball.velocity.x = velocity.x;
    ball.velocity.z = velocity.y;
    ball.position.x = result.point.x;
    ball.position.z = result.point.y;

    Some(wall)
}

/// Pin the ball to the track and apply everything the spinning surface does to it
///
/// `frames` is the substep length in reference frames.
pub fn resolve_surface_contact(
    ball: &mut BallState,
    wheel_speed: f64,
    config: &PhysicsConfig,
    frames: f64,
) {
    ball.position.y = config.surface_height;

    // Bounce only on a real impact; small residual speeds settle
    if ball.velocity.y < -config.settle_speed {
        ball.velocity.y = -ball.velocity.y * config.vertical_restitution;
    } else {
        ball.velocity.y = 0.0;
    }

    let (r, theta) = plane_to_polar(ball.position.x, ball.position.z);
    let mut velocity = DVec2::new(ball.velocity.x, ball.velocity.z);

    velocity = apply_centrifugal(velocity, theta, r, wheel_speed, config.centrifugal_scale * frames);
    velocity = apply_coriolis(velocity, config.coriolis_scale * wheel_speed * frames);
    velocity = apply_friction(velocity, config.surface_friction.powf(frames), config.creep_epsilon);

    ball.velocity.x = velocity.x;
    ball.velocity.z = velocity.y;
}

/// Outward push proportional to wheel speed and radius
#[inline]
pub fn apply_centrifugal(velocity: DVec2, theta: f64, r: f64, wheel_speed: f64, scale: f64) -> DVec2 {
    velocity + polar_to_plane(wheel_speed * r * scale, theta)
}

/// Rotational coupling of the two horizontal components
///
/// Not an exact Coriolis term; `k` is the coupling per substep.
#[inline]
pub fn apply_coriolis(velocity: DVec2, k: f64) -> DVec2 {
    DVec2::new(velocity.x + k * velocity.y, velocity.y - k * velocity.x)
}

/// Rolling friction; speeds under `creep_epsilon` stop outright
#[inline]
pub fn apply_friction(velocity: DVec2, keep: f64, creep_epsilon: f64) -> DVec2 {
    let slowed = velocity * keep;
    if slowed.length() < creep_epsilon {
        DVec2::ZERO
    } else {
        slowed
    }
}
