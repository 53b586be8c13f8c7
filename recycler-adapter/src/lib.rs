//! Adapter utilities for the `recycler` crate.
//!
//! The `recycler` crate is UI-agnostic and focuses on positioning and blank-area measurement.
//! This crate provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - Programmatic auto-scroll at fling speed, for benchmarks and scripted interactions
//! - A per-list controller wiring the coordinator, blank-area tracker, velocity estimator and
//!   render-time tracker behind a few event entry points
//!
//! Nothing here owns a clock or a frame loop: adapters pass `now_ms` in.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod auto_scroll;
mod controller;


pub use auto_scroll::{AutoScroll, AutoScrollStatus, Cancellable, PIXELS_PER_MS, auto_scroll};
pub use controller::Instrumentation;
