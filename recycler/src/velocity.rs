use crate::{Axis, Velocity};

/// Inactivity after which momentum is considered over.
pub const MOMENTUM_END_DELAY_MS: u64 = 100;

/// Estimates scroll velocity from consecutive offsets and detects the end of momentum.
///
/// The host drives time: `update` is called for every scroll offset change and `tick` on every
/// frame or timer callback. When no `update` arrives for [`MOMENTUM_END_DELAY_MS`], the next
/// `tick` reports a zero velocity with `is_momentum_end = true`, exactly once per scroll burst.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityEstimator {
    last_update_ms: u64,
    velocity: Velocity,
    momentum_end_at_ms: Option<u64>,
}

impl VelocityEstimator {
    /// `now_ms` is the reference point for the first sample.
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_update_ms: now_ms,
            velocity: Velocity::ZERO,
            momentum_end_at_ms: None,
        }
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// `true` while a momentum-end notification is pending.
    pub fn is_tracking(&self) -> bool {
        self.momentum_end_at_ms.is_some()
    }

    /// Records a new offset and reports the velocity since the previous update.
    ///
    /// The elapsed time is at least 1 ms, so bursts within the same millisecond never divide by
    /// zero. Re-arms the momentum-end deadline.
    pub fn update(
        &mut self,
        new_offset: f64,
        old_offset: f64,
        axis: Axis,
        now_ms: u64,
        mut on_update: impl FnMut(Velocity, bool),
    ) -> Velocity {
        self.cleanup();
        let elapsed = now_ms.saturating_sub(self.last_update_ms).max(1);
        self.last_update_ms = now_ms;
        self.velocity = Velocity::along(axis, (new_offset - old_offset) / elapsed as f64);
        on_update(self.velocity, false);
        self.momentum_end_at_ms = Some(now_ms.saturating_add(MOMENTUM_END_DELAY_MS));
        self.velocity
    }

    /// Fires the momentum-end notification if its deadline has passed.
    ///
    /// Returns `true` when the notification was delivered by this call.
    pub fn tick(&mut self, now_ms: u64, mut on_update: impl FnMut(Velocity, bool)) -> bool {
        let Some(deadline) = self.momentum_end_at_ms else {
            return false;
        };
        if now_ms < deadline {
            return false;
        }
        self.momentum_end_at_ms = None;
        self.last_update_ms = now_ms;
        self.velocity = Velocity::ZERO;
        rtrace!(now_ms, "VelocityEstimator: momentum end");
        on_update(self.velocity, true);
        true
    }

    /// Cancels a pending momentum-end notification without emitting it.
    pub fn cleanup(&mut self) {
        self.momentum_end_at_ms = None;
    }
}
