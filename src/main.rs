//! Roulette Wheel entry point
//!
//! On the web the JavaScript host constructs `WebRoulette` and drives it. The
//! native binary runs a few seeded spins headless at 60 Hz and logs the results.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use roulette_wheel::PhysicsConfig;
    use roulette_wheel::consts::REFERENCE_DT;
    use roulette_wheel::sim::{SpinEvent, SpinSession};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Roulette Wheel (native) starting headless run");

    let mut session = match SpinSession::new(PhysicsConfig::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Seed: {}", session.seed());
    session.set_assets_ready(true);

    for round in 1..=3 {
        if let Err(reason) = session.spin() {
            log::warn!("Round {} not started: {}", round, reason);
            continue;
        }
        match session.run_until_settled(REFERENCE_DT, 60 * 120) {
            Some(slot) => println!(
                "Round {}: {} after {:.1}s",
                round,
                slot,
                session.ticks() as f64 * REFERENCE_DT
            ),
            None => log::warn!("Round {} did not settle", round),
        }
        for event in session.drain_events() {
            if let SpinEvent::SpinRejected { reason } = event {
                log::warn!("Rejected: {}", reason);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the WebRoulette constructor, this is just to satisfy the compiler
}
