//! Wheel and ball simulation
//!
//! All spin logic lives here. This module must stay host-agnostic:
//! - Time only arrives through `tick(dt)`
//! - Seeded RNG only
//! - No rendering, DOM or timer dependencies

pub mod collision;
pub mod outcome;
pub mod session;
pub mod slots;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, WallHit, contain_radially, reflect_velocity, resolve_surface_contact};
pub use outcome::{OutcomeStrategy, resting_slot_index, slot_index};
pub use session::{FrameSnapshot, SpinEvent, SpinRejection, SpinSession};
pub use slots::{SLOT_TABLE, SlotColor, SlotEntry, slot_at};
pub use state::{BallState, SpinLaunch, SpinPhase, WheelState};
pub use tick::{StepReport, integrate, step_ball, step_wheel, substeps_for};
