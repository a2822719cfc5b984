//! Platform glue
//!
//! The rendering host owns the frame loop, asset loading and the DOM. This
//! layer only adapts [`crate::sim::SpinSession`] to what a host can call.

#[cfg(target_arch = "wasm32")]
pub mod web;
