use alloc::boxed::Box;
use core::fmt;

use crate::BlankAreaEvent;

/// Default warm-up before blank-area events start counting.
pub const DEFAULT_START_DELAY_MS: u64 = 1000;

/// Running blank-area statistics for one list instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlankAreaStats {
    pub max_blank_area: f64,
    pub cumulative_blank_area: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlankAreaTrackerConfig {
    /// Events are ignored for this long after the first one arrives.
    pub start_delay_ms: u64,
    /// Add negative (over-rendered) blank area to the cumulative total instead of clamping it.
    pub sum_negative_values: bool,
}

impl Default for BlankAreaTrackerConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: DEFAULT_START_DELAY_MS,
            sum_negative_values: false,
        }
    }
}

impl BlankAreaTrackerConfig {
    pub fn with_start_delay_ms(mut self, start_delay_ms: u64) -> Self {
        self.start_delay_ms = start_delay_ms;
        self
    }

    pub fn with_sum_negative_values(mut self, sum_negative_values: bool) -> Self {
        self.sum_negative_values = sum_negative_values;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// No event seen yet.
    Idle,
    WarmingUp { active_at_ms: u64 },
    Active,
}

pub type OnBlankAreaChange = Box<dyn FnMut(&BlankAreaStats)>;

/// Aggregates raw blank-area events into max/cumulative statistics.
///
/// The first event starts a warm-up timer; until it elapses every event is dropped, so the
/// initial mount and measurement settling never count as blank. Events are also dropped while
/// the content is not larger than the list itself, since empty space at the edges is then
/// expected.
///
/// The change callback fires only when one of the statistics actually changed.
pub struct BlankAreaTracker {
    config: BlankAreaTrackerConfig,
    stats: BlankAreaStats,
    phase: Phase,
    on_change: Option<OnBlankAreaChange>,
}

impl fmt::Debug for BlankAreaTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlankAreaTracker")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Default for BlankAreaTracker {
    fn default() -> Self {
        Self::new(BlankAreaTrackerConfig::default())
    }
}

impl BlankAreaTracker {
    pub fn new(config: BlankAreaTrackerConfig) -> Self {
        Self {
            config,
            stats: BlankAreaStats::default(),
            phase: Phase::Idle,
            on_change: None,
        }
    }

    pub fn with_on_change(mut self, on_change: impl FnMut(&BlankAreaStats) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn set_on_change(&mut self, on_change: Option<impl FnMut(&BlankAreaStats) + 'static>) {
        self.on_change = on_change.map(|f| Box::new(f) as _);
    }

    pub fn config(&self) -> &BlankAreaTrackerConfig {
        &self.config
    }

    pub fn stats(&self) -> BlankAreaStats {
        self.stats
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active)
    }

    /// Advances the warm-up timer without an event.
    pub fn tick(&mut self, now_ms: u64) {
        if let Phase::WarmingUp { active_at_ms } = self.phase {
            if now_ms >= active_at_ms {
                rdebug!(now_ms, "BlankAreaTracker: warm-up complete");
                self.phase = Phase::Active;
            }
        }
    }

    /// Feeds one event.
    ///
    /// `list_size` is the visible size of the list and `content_size` the total content size,
    /// both along the scroll axis. Returns `true` if the statistics changed.
    pub fn on_event(
        &mut self,
        event: &BlankAreaEvent,
        list_size: f64,
        content_size: f64,
        now_ms: u64,
    ) -> bool {
        match self.phase {
            Phase::Idle => {
                let active_at_ms = now_ms.saturating_add(self.config.start_delay_ms);
                self.phase = Phase::WarmingUp { active_at_ms };
                rtrace!(active_at_ms, "BlankAreaTracker: warm-up started");
                return false;
            }
            Phase::WarmingUp { .. } => {
                self.tick(now_ms);
                if !self.is_active() {
                    return false;
                }
            }
            Phase::Active => {}
        }

        if content_size <= list_size {
            return false;
        }

        let prev = self.stats;
        let blank_area = if self.config.sum_negative_values {
            event.raw_blank_area()
        } else {
            event.blank_area
        };
        self.stats.max_blank_area = prev.max_blank_area.max(blank_area).max(0.0);
        self.stats.cumulative_blank_area += if self.config.sum_negative_values {
            blank_area
        } else {
            blank_area.max(0.0)
        };

        let changed = self.stats != prev;
        if changed {
            if let Some(cb) = self.on_change.as_mut() {
                cb(&self.stats);
            }
        }
        changed
    }
}
