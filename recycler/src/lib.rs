//! A headless cell-recycling and blank-area instrumentation engine for long lists.
//!
//! For adapter-level utilities (programmatic auto-scroll, a per-list instrumentation
//! controller), see the `recycler-adapter` crate.
//!
//! Long lists render through a small pool of reusable cells. This crate focuses on the
//! substrate underneath such a pool: keeping the cells positioned inside their content window,
//! detecting when rendering lags behind the scroll position ("blank area"), aggregating that
//! into statistics, and estimating scroll velocity and render cost for predictive rendering.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - the active cells and their frames
//! - viewport geometry and scroll offsets
//! - measurements through a [`LayoutProbe`]
//! - a millisecond clock, passed as `now_ms` to anything time-based
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod average;
mod blank_area;
mod cell;
mod coordinator;
mod options;
mod probe;
mod render_time;
mod tracker;
mod types;
mod velocity;

#[cfg(test)]
mod tests;

pub use average::RunningAverage;
pub use blank_area::{
    BlankAreaBus, BlankAreaEvent, BlankAreaListener, Subscription, invoke_guarded,
};
pub use cell::{
    CellContainer, FOOTER_INDEX, RecyclableCell, RenderGate, RenderInputs, Revision,
    SlotIdentity, Staggered,
};
pub use coordinator::{LayoutCoordinator, LayoutPassOutcome};
pub use options::{ContentPadding, CoordinatorOptions, Insets};
pub use probe::{FnProbe, FrameTableProbe, LayoutProbe, PixelGrid};
pub use render_time::{RenderTimeConfig, RenderTimeTracker};
pub use tracker::{
    BlankAreaStats, BlankAreaTracker, BlankAreaTrackerConfig, DEFAULT_START_DELAY_MS,
    OnBlankAreaChange,
};
pub use types::{
    Axis, ItemLayout, LayoutProvider, Point, Rect, Size, SlotIndex, Velocity, ViewHandle,
};
pub use velocity::{MOMENTUM_END_DELAY_MS, VelocityEstimator};
