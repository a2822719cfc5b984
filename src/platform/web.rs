//! wasm-bindgen facade for a JavaScript rendering host
//!
//! The host calls `tick(dt)` from its own `requestAnimationFrame` loop, copies
//! the wheel angle and ball transform onto its meshes, and polls
//! `take_events()` to update the spin button and result banner.

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::config::PhysicsConfig;
use crate::sim::{SpinEvent, SpinPhase, SpinSession};

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

/// Roulette core handle exposed to JavaScript
#[wasm_bindgen]
pub struct WebRoulette {
    session: SpinSession,
}

#[wasm_bindgen]
impl WebRoulette {
    /// Create a core, optionally overriding physics constants with a JSON object
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebRoulette, JsError> {
        init_logging();
        let config = match config_json {
            Some(json) => PhysicsConfig::from_json(&json)?,
            None => PhysicsConfig::default(),
        };
        let seed = js_sys::Date::now() as u64;
        let session = SpinSession::with_seed(config, seed)?;
        log::info!("Roulette core ready (seed {})", seed);
        Ok(Self { session })
    }

    /// Wheel model finished loading
    pub fn set_wheel_ready(&mut self, ready: bool) {
        self.session.set_wheel_ready(ready);
    }

    /// Ball model finished loading
    pub fn set_ball_ready(&mut self, ready: bool) {
        self.session.set_ball_ready(ready);
    }

    /// Request a spin. Returns the rejection code, or nothing when the spin started.
    pub fn request_spin(&mut self) -> Option<String> {
        self.session
            .spin()
            .err()
            .map(|reason| reason.code().to_string())
    }

    /// Advance one frame. Returns the winning number on the frame the spin settles.
    pub fn tick(&mut self, dt: f64) -> Option<u8> {
        self.session.tick(dt).map(|slot| slot.number)
    }

    /// Dismiss the displayed result
    pub fn acknowledge(&mut self) {
        self.session.acknowledge();
    }

    pub fn wheel_rotation(&self) -> f64 {
        self.session.snapshot().wheel_rotation
    }

    /// Ball position as `[x, y, z]`
    pub fn ball_position(&self) -> Vec<f64> {
        self.session.snapshot().ball_position.to_array().to_vec()
    }

    /// Ball orientation change for this frame as an axis-angle vector `[x, y, z]`
    pub fn ball_roll(&self) -> Vec<f64> {
        self.session.snapshot().ball_roll.to_array().to_vec()
    }

    pub fn ball_visible(&self) -> bool {
        self.session.snapshot().ball_visible
    }

    pub fn phase(&self) -> String {
        match self.session.phase() {
            SpinPhase::Idle => "idle",
            SpinPhase::Spinning => "spinning",
            SpinPhase::Resolved => "resolved",
        }
        .to_string()
    }

    /// Pending notifications as a JSON array
    pub fn take_events(&mut self) -> Result<String, JsError> {
        let events: Vec<SpinEvent> = self.session.drain_events().collect();
        Ok(serde_json::to_string(&events)?)
    }
}
