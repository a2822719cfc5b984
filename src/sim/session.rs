//! Spin session
//!
//! Owns the wheel and ball for one spin at a time and gates when a spin may
//! start. The host drives it with [`SpinSession::tick`] once per display
//! frame and drains [`SpinEvent`]s for the UI.

use std::collections::VecDeque;

use glam::DVec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::outcome;
use super::slots::SlotEntry;
use super::state::{BallState, SpinLaunch, SpinPhase, WheelState};
use super::tick::integrate;
use crate::config::{ConfigError, PhysicsConfig};

/// Why a spin request was ignored
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinRejection {
    #[error("the wheel is already spinning")]
    AlreadySpinning,
    #[error("wheel or ball assets are not loaded yet")]
    NotReady,
    #[error("launch parameters are non-finite, negative or off the track")]
    InvalidLaunch,
}

impl SpinRejection {
    /// Stable identifier for hosts
    pub fn code(&self) -> &'static str {
        match self {
            SpinRejection::AlreadySpinning => "already_spinning",
            SpinRejection::NotReady => "not_ready",
            SpinRejection::InvalidLaunch => "invalid_launch",
        }
    }
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinEvent {
    /// A spin began; the spin control should be disabled and the old result hidden
    SpinStarted { start_angle: f64, wheel_speed: f64 },
    /// The wheel settled on `slot`
    ResultAvailable { slot: SlotEntry },
    /// A spin request was ignored
    SpinRejected { reason: SpinRejection },
    /// A tick found the session without a ball while spinning
    DegenerateState,
}

/// Everything the rendering host needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Wheel rotation (radians), same polar convention as the ball position
    pub wheel_rotation: f64,
    pub ball_position: DVec3,
    /// Axis-angle orientation change of the ball mesh for this frame
    pub ball_roll: DVec3,
    /// False until the first spin places the ball
    pub ball_visible: bool,
    pub phase: SpinPhase,
}

/// Pending events kept for a host that does not drain; older ones are dropped
pub const MAX_PENDING_EVENTS: usize = 64;

/// One wheel, one ball, one spin at a time
#[derive(Debug, Clone)]
pub struct SpinSession {
    config: PhysicsConfig,
    seed: u64,
    rng: Pcg32,
    phase: SpinPhase,
    wheel: WheelState,
    ball: Option<BallState>,
    result: Option<SlotEntry>,
    last_result: Option<SlotEntry>,
    wheel_ready: bool,
    ball_ready: bool,
    /// Ticks since the current spin started
    ticks: u64,
    events: VecDeque<SpinEvent>,
    degenerate_reported: bool,
}

impl SpinSession {
    /// Create a session with an unpredictable seed
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::random())
    }

    /// Create a reproducible session
    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SpinPhase::Idle,
            wheel: WheelState::default(),
            ball: None,
            result: None,
            last_result: None,
            wheel_ready: false,
            ball_ready: false,
            ticks: 0,
            events: VecDeque::with_capacity(8),
            degenerate_reported: false,
        })
    }

    // === Asset readiness ===

    pub fn set_wheel_ready(&mut self, ready: bool) {
        self.wheel_ready = ready;
    }

    pub fn set_ball_ready(&mut self, ready: bool) {
        self.ball_ready = ready;
    }

    /// Report both assets at once
    pub fn set_assets_ready(&mut self, ready: bool) {
        self.wheel_ready = ready;
        self.ball_ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.wheel_ready && self.ball_ready
    }

    // === Commands ===

    /// Start a spin with a randomized launch
    pub fn spin(&mut self) -> Result<(), SpinRejection> {
        self.admit_spin(None)?;
        let launch = SpinLaunch::random(&mut self.rng, &self.config);
        self.begin(launch);
        Ok(())
    }

    /// Start a spin with explicit launch parameters
    pub fn spin_with(&mut self, launch: SpinLaunch) -> Result<(), SpinRejection> {
        self.admit_spin(Some(&launch))?;
        self.begin(launch);
        Ok(())
    }

    /// Clear a displayed result and re-arm for the next spin
    pub fn acknowledge(&mut self) {
        if self.phase == SpinPhase::Resolved {
            self.phase = SpinPhase::Idle;
            self.result = None;
        }
    }

    /// Advance one display frame of `dt` seconds
    ///
    /// Returns the winning pocket on the tick the spin settles.
    pub fn tick(&mut self, dt: f64) -> Option<SlotEntry> {
        if self.phase != SpinPhase::Spinning {
            return None;
        }
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring frame with dt = {}", dt);
            return None;
        }
        let dt = dt.min(self.config.max_frame_dt);

        let Some(ball) = self.ball.as_mut() else {
            self.report_degenerate();
            return None;
        };

        integrate(&mut self.wheel, ball, &self.config, dt);
        self.ticks += 1;

        let settled = self.wheel.angular_speed < self.config.angular_stop_threshold
            && ball.speed() < self.config.linear_stop_threshold;
        if !settled {
            return None;
        }

        let slot = outcome::resolve(self.config.outcome, ball, &self.wheel, &mut self.rng);
        self.phase = SpinPhase::Resolved;
        self.result = Some(slot);
        self.last_result = Some(slot);
        self.push_event(SpinEvent::ResultAvailable { slot });
        log::info!("Result: {} (after {} ticks)", slot, self.ticks);
        Some(slot)
    }

    /// Tick at a fixed `dt` until the spin resolves or `max_ticks` pass
    pub fn run_until_settled(&mut self, dt: f64, max_ticks: u64) -> Option<SlotEntry> {
        for _ in 0..max_ticks {
            if self.phase != SpinPhase::Spinning {
                break;
            }
            if let Some(slot) = self.tick(dt) {
                return Some(slot);
            }
        }
        None
    }

    /// Take all pending notifications
    ///
    /// Hosts should drain once per frame. At most [`MAX_PENDING_EVENTS`]
    /// are kept; beyond that the oldest are discarded.
    pub fn drain_events(&mut self) -> std::collections::vec_deque::Drain<'_, SpinEvent> {
        self.events.drain(..)
    }

    // === Observers ===

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    /// Result of the current spin, until acknowledged
    pub fn result(&self) -> Option<SlotEntry> {
        self.result
    }

    /// Most recent result, kept across acknowledgement
    pub fn last_result(&self) -> Option<SlotEntry> {
        self.last_result
    }

    pub fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn ball(&self) -> Option<&BallState> {
        self.ball.as_ref()
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            wheel_rotation: self.wheel.rotation_angle,
            ball_position: self.ball.map(|b| b.position).unwrap_or(DVec3::ZERO),
            ball_roll: self.ball.map(|b| b.roll).unwrap_or(DVec3::ZERO),
            ball_visible: self.ball.is_some(),
            phase: self.phase,
        }
    }

    // === Internals ===

    fn admit_spin(&mut self, launch: Option<&SpinLaunch>) -> Result<(), SpinRejection> {
        let rejection = if self.phase == SpinPhase::Spinning {
            Some(SpinRejection::AlreadySpinning)
        } else if !self.is_ready() {
            Some(SpinRejection::NotReady)
        } else if launch.is_some_and(|l| !l.is_valid(&self.config)) {
            Some(SpinRejection::InvalidLaunch)
        } else {
            None
        };

        if let Some(reason) = rejection {
            log::warn!("Spin ignored: {}", reason);
            self.push_event(SpinEvent::SpinRejected { reason });
            return Err(reason);
        }

        // A new spin dismisses the previous result
        self.acknowledge();
        Ok(())
    }

    fn begin(&mut self, launch: SpinLaunch) {
        log::debug!("Launch parameters: {:?}", launch);
        self.ball = Some(BallState::launched(&launch, &self.config));
        self.wheel.angular_speed = launch.wheel_speed;
        self.result = None;
        self.ticks = 0;
        self.phase = SpinPhase::Spinning;
        self.push_event(SpinEvent::SpinStarted {
            start_angle: launch.start_angle,
            wheel_speed: launch.wheel_speed,
        });
        log::info!("Spin started (wheel speed {:.4} rad/frame)", launch.wheel_speed);
    }

    fn report_degenerate(&mut self) {
        if !self.degenerate_reported {
            self.degenerate_reported = true;
            log::error!("Spinning without a ball; ticks are ignored");
            self.push_event(SpinEvent::DegenerateState);
        }
    }

    fn push_event(&mut self, event: SpinEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            log::debug!("Event queue full, dropping {:?}", self.events.front());
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_DT;
    use crate::sim::outcome::{OutcomeStrategy, resting_slot_index};
    use crate::sim::slots::SLOT_TABLE;

    const MAX_TICKS: u64 = 20_000;

    fn ready_session(seed: u64) -> SpinSession {
        let mut session = SpinSession::with_seed(PhysicsConfig::default(), seed).unwrap();
        session.set_assets_ready(true);
        session
    }

    #[test]
    fn test_spin_before_assets_ready() {
        let mut session = SpinSession::with_seed(PhysicsConfig::default(), 1).unwrap();
        session.set_wheel_ready(true);

        assert_eq!(session.spin(), Err(SpinRejection::NotReady));
        assert_eq!(session.phase(), SpinPhase::Idle);
        assert!(!session.snapshot().ball_visible);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![SpinEvent::SpinRejected {
                reason: SpinRejection::NotReady
            }]
        );

        session.set_ball_ready(true);
        assert!(session.spin().is_ok());
        assert!(session.snapshot().ball_visible);
    }

    #[test]
    fn test_second_spin_is_rejected_without_side_effects() {
        let mut session = ready_session(99);
        session.spin().unwrap();
        session.drain_events().for_each(drop);
        let after_first = session.clone();

        assert_eq!(session.spin(), Err(SpinRejection::AlreadySpinning));

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![SpinEvent::SpinRejected {
                reason: SpinRejection::AlreadySpinning
            }]
        );
        assert_eq!(session.phase(), after_first.phase());
        assert_eq!(session.wheel(), after_first.wheel());
        assert_eq!(session.ball(), after_first.ball());

        // The RNG was not consumed either: both settle identically
        let mut reference = after_first;
        let a = session.run_until_settled(REFERENCE_DT, MAX_TICKS);
        let b = reference.run_until_settled(REFERENCE_DT, MAX_TICKS);
        assert_eq!(a, b);
        assert_eq!(session.ticks(), reference.ticks());
    }

    #[test]
    fn test_tick_is_noop_when_idle() {
        let mut session = ready_session(3);
        assert_eq!(session.tick(REFERENCE_DT), None);
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.wheel(), &WheelState::default());
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut session = ready_session(3);
        session.spin().unwrap();
        let before = *session.ball().unwrap();
        assert_eq!(session.tick(f64::NAN), None);
        assert_eq!(session.tick(-0.01), None);
        assert_eq!(session.tick(0.0), None);
        assert_eq!(session.ball(), Some(&before));
        assert_eq!(session.ticks(), 0);
    }

    #[test]
    fn test_random_spin_resolves_and_matches_resting_pocket() {
        let mut session = ready_session(2024);
        session.spin().unwrap();

        let slot = session
            .run_until_settled(REFERENCE_DT, MAX_TICKS)
            .expect("spin should settle");

        assert_eq!(session.phase(), SpinPhase::Resolved);
        assert_eq!(session.result(), Some(slot));
        let ball = session.ball().unwrap();
        assert_eq!(slot, SLOT_TABLE[resting_slot_index(ball, session.wheel())]);
        let events: Vec<_> = session.drain_events().collect();
        assert!(matches!(events[0], SpinEvent::SpinStarted { .. }));
        assert_eq!(events.last(), Some(&SpinEvent::ResultAvailable { slot }));
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = |seed| {
            let mut session = ready_session(seed);
            let mut results = Vec::new();
            for _ in 0..3 {
                session.spin().unwrap();
                results.push((session.run_until_settled(REFERENCE_DT, MAX_TICKS), session.ticks()));
            }
            results
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_variable_dt_sequence_is_reproducible() {
        let dts = [0.016, 0.017, 0.033, 0.008, 0.05];
        let run = || {
            let mut session = ready_session(5);
            session.spin().unwrap();
            for i in 0..MAX_TICKS as usize {
                if let Some(slot) = session.tick(dts[i % dts.len()]) {
                    return Some((slot, session.ticks()));
                }
            }
            None
        };
        let first = run();
        assert!(first.is_some());
        assert_eq!(first, run());
    }

    #[test]
    fn test_wheel_speed_non_increasing_and_ball_contained() {
        let mut session = ready_session(11);
        session.spin().unwrap();
        let max_radius = session.config().max_radius;
        let mut last_speed = session.wheel().angular_speed;
        while session.phase() == SpinPhase::Spinning {
            session.tick(REFERENCE_DT);
            let speed = session.wheel().angular_speed;
            assert!(speed <= last_speed);
            last_speed = speed;
            assert!(session.ball().unwrap().radial_distance() <= max_radius + 1e-12);
            assert!(session.ticks() < MAX_TICKS);
        }
    }

    #[test]
    fn test_acknowledge_and_rearm() {
        let mut session = ready_session(8);
        session.spin().unwrap();
        let slot = session.run_until_settled(REFERENCE_DT, MAX_TICKS).unwrap();

        // Results stay until the UI clears them
        assert_eq!(session.tick(REFERENCE_DT), None);
        assert_eq!(session.result(), Some(slot));

        session.acknowledge();
        assert_eq!(session.phase(), SpinPhase::Idle);
        assert_eq!(session.result(), None);
        assert_eq!(session.last_result(), Some(slot));
    }

    #[test]
    fn test_spin_from_resolved_starts_fresh_ball() {
        let mut session = ready_session(8);
        session.spin().unwrap();
        session.run_until_settled(REFERENCE_DT, MAX_TICKS).unwrap();
        let settled = *session.ball().unwrap();

        session.spin().unwrap();

        assert_eq!(session.phase(), SpinPhase::Spinning);
        assert_eq!(session.result(), None);
        let fresh = session.ball().unwrap();
        assert_ne!(fresh.position, settled.position);
        assert!((fresh.radial_distance() - session.config().launch_radius).abs() < 1e-12);
        assert_eq!(session.ticks(), 0);
    }

    #[test]
    fn test_degenerate_state_reported_once() {
        let mut session = ready_session(4);
        session.phase = SpinPhase::Spinning;

        assert_eq!(session.tick(REFERENCE_DT), None);
        assert_eq!(session.tick(REFERENCE_DT), None);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events, vec![SpinEvent::DegenerateState]);
        assert_eq!(session.phase(), SpinPhase::Spinning);
    }

    #[test]
    fn test_uniform_random_strategy_resolves() {
        let config = PhysicsConfig {
            outcome: OutcomeStrategy::UniformRandom,
            ..Default::default()
        };
        let mut session = SpinSession::with_seed(config, 12).unwrap();
        session.set_assets_ready(true);
        session.spin().unwrap();
        assert!(session.run_until_settled(REFERENCE_DT, MAX_TICKS).is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PhysicsConfig {
            max_radius: -1.0,
            ..Default::default()
        };
        assert!(SpinSession::with_seed(config, 0).is_err());
    }

    #[test]
    fn test_non_finite_or_negative_launch_rejected() {
        let mut session = ready_session(6);
        let good = SpinLaunch {
            start_angle: 0.0,
            start_radius: 0.18,
            tangential_speed: 0.01,
            drop_speed: 0.004,
            wheel_speed: 0.1,
        };
        let bad = [
            SpinLaunch { start_angle: f64::NAN, ..good },
            SpinLaunch { tangential_speed: f64::INFINITY, ..good },
            SpinLaunch { wheel_speed: -0.1, ..good },
            SpinLaunch { drop_speed: -0.004, ..good },
            SpinLaunch { start_radius: 0.5, ..good },
        ];
        for launch in bad {
            assert_eq!(session.spin_with(launch), Err(SpinRejection::InvalidLaunch));
            assert_eq!(session.phase(), SpinPhase::Idle);
            assert!(session.ball().is_none());
        }
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events.len(), bad.len());
        assert!(events.iter().all(|e| *e
            == SpinEvent::SpinRejected {
                reason: SpinRejection::InvalidLaunch
            }));

        assert!(session.spin_with(good).is_ok());
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let mut session = SpinSession::with_seed(PhysicsConfig::default(), 1).unwrap();
        for _ in 0..MAX_PENDING_EVENTS * 3 {
            let _ = session.spin();
        }
        session.set_assets_ready(true);
        session.spin().unwrap();

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        // Newest survives
        assert!(matches!(events.last(), Some(SpinEvent::SpinStarted { .. })));
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let event = SpinEvent::SpinRejected {
            reason: SpinRejection::NotReady,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"spin_rejected","reason":"not_ready"}"#);
    }

    /// Reference scenario: start angle 0, radius 0.18, tangential speed 0.01,
    /// wheel speed 0.25, decay 0.995 per frame, 60 Hz frames.
    #[test]
    fn test_reference_spin_pocket() {
        let config = PhysicsConfig {
            decay_factor: 0.995,
            ..Default::default()
        };
        let mut session = SpinSession::with_seed(config, 0).unwrap();
        session.set_assets_ready(true);
        session
            .spin_with(SpinLaunch {
                start_angle: 0.0,
                start_radius: 0.18,
                tangential_speed: 0.01,
                drop_speed: session.config().launch_drop_speed,
                wheel_speed: 0.25,
            })
            .unwrap();

        let slot = session
            .run_until_settled(1.0 / 60.0, MAX_TICKS)
            .expect("reference spin should settle");

        let index = resting_slot_index(session.ball().unwrap(), session.wheel());
        assert_eq!(slot, SLOT_TABLE[index]);
        assert_eq!(index, REFERENCE_POCKET_INDEX);
        assert_eq!(session.ticks(), REFERENCE_TICKS);
    }

    const REFERENCE_POCKET_INDEX: usize = 23;
    const REFERENCE_TICKS: u64 = 781;
}
