use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use recycler::Point;

/// Base auto-scroll speed: a very fast native fling moves content about 7 px per millisecond.
pub const PIXELS_PER_MS: f64 = 7.0;

/// A cancellation handle for an [`AutoScroll`].
///
/// Clones share the same flag, so the handle can be given to whoever needs to stop the scroll
/// (a test harness, another thread, a UI event) while the animator keeps its own copy.
#[derive(Clone, Debug, Default)]
pub struct Cancellable {
    cancelled: Arc<AtomicBool>,
}

impl Cancellable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Calling it again has no further effect.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            adebug!("AutoScroll: cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutoScrollStatus {
    Running,
    /// Both axes reached their targets.
    Finished,
    Cancelled,
}

impl AutoScrollStatus {
    pub fn is_done(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// The completion signal: `Some(true)` on arrival, `Some(false)` when cancelled.
    pub fn outcome(self) -> Option<bool> {
        match self {
            Self::Running => None,
            Self::Finished => Some(true),
            Self::Cancelled => Some(false),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct AxisMotion {
    to: f64,
    forward: bool,
}

impl AxisMotion {
    fn new(from: f64, to: f64) -> Self {
        Self {
            to,
            forward: to > from,
        }
    }

    fn direction(&self) -> f64 {
        if self.forward { 1.0 } else { -1.0 }
    }

    /// Clamps a position so it never passes the target.
    fn clamp(&self, position: f64) -> f64 {
        if self.forward {
            position.min(self.to)
        } else {
            position.max(self.to)
        }
    }
}

/// Programmatic scrolling at a constant, fling-like speed.
///
/// The host drives the animation by calling [`AutoScroll::frame`] once per display frame. Each
/// frame moves both axes by `rate * elapsed` towards their targets and forwards the clamped
/// position to the `scroll(x, y, animated)` callback. Cancellation is observed at the start of
/// the next frame.
///
/// Positions are never clamped to content bounds; that is up to the scroll target.
#[derive(Clone, Debug)]
pub struct AutoScroll {
    x: AxisMotion,
    y: AxisMotion,
    position: Point,
    pixels_per_ms: f64,
    last_frame_ms: u64,
    cancel: Cancellable,
    status: AutoScrollStatus,
}

impl AutoScroll {
    /// Starts a scroll from `from` to `to` and immediately jumps the target to `from`.
    ///
    /// A `speed_multiplier` that is not a positive number falls back to `1.0`.
    pub fn start(
        mut scroll: impl FnMut(f64, f64, bool),
        from: Point,
        to: Point,
        speed_multiplier: f64,
        cancel: Cancellable,
        now_ms: u64,
    ) -> Self {
        let speed_multiplier = if speed_multiplier > 0.0 && speed_multiplier.is_finite() {
            speed_multiplier
        } else {
            awarn!(speed_multiplier, "AutoScroll: invalid speed multiplier, using 1");
            1.0
        };
        adebug!(
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            speed_multiplier,
            "AutoScroll: start"
        );

        scroll(from.x, from.y, false);

        Self {
            x: AxisMotion::new(from.x, to.x),
            y: AxisMotion::new(from.y, to.y),
            position: from,
            pixels_per_ms: PIXELS_PER_MS * speed_multiplier,
            last_frame_ms: now_ms,
            cancel,
            status: AutoScrollStatus::Running,
        }
    }

    /// Returns a handle that cancels this scroll.
    pub fn cancellable(&self) -> Cancellable {
        self.cancel.clone()
    }

    pub fn status(&self) -> AutoScrollStatus {
        self.status
    }

    pub fn pixels_per_ms(&self) -> f64 {
        self.pixels_per_ms
    }

    /// The last position sent to the scroll callback.
    pub fn position(&self) -> Point {
        Point::new(self.x.clamp(self.position.x), self.y.clamp(self.position.y))
    }

    /// Advances one display frame.
    ///
    /// Once the scroll has finished or been cancelled this is a no-op and the callback is not
    /// invoked again.
    pub fn frame(
        &mut self,
        now_ms: u64,
        mut scroll: impl FnMut(f64, f64, bool),
    ) -> AutoScrollStatus {
        if self.status.is_done() {
            return self.status;
        }
        if self.cancel.is_cancelled() {
            adebug!(now_ms, "AutoScroll: cancelled");
            self.status = AutoScrollStatus::Cancelled;
            return self.status;
        }

        let elapsed = now_ms.saturating_sub(self.last_frame_ms);
        self.last_frame_ms = now_ms;
        let distance = self.pixels_per_ms * elapsed as f64;
        self.position.x += distance * self.x.direction();
        self.position.y += distance * self.y.direction();

        let Point { x, y } = self.position();
        scroll(x, y, false);
        atrace!(now_ms, x, y, "AutoScroll: frame");

        if x == self.x.to && y == self.y.to {
            adebug!(now_ms, "AutoScroll: finished");
            self.status = AutoScrollStatus::Finished;
        }
        self.status
    }
}

/// Starts an [`AutoScroll`] with its own cancellation handle.
///
/// Returns the animator together with the handle.
pub fn auto_scroll(
    scroll: impl FnMut(f64, f64, bool),
    from: Point,
    to: Point,
    speed_multiplier: f64,
    now_ms: u64,
) -> (AutoScroll, Cancellable) {
    let cancel = Cancellable::new();
    let animator = AutoScroll::start(scroll, from, to, speed_multiplier, cancel.clone(), now_ms);
    (animator, cancel)
}
