use crate::RunningAverage;
use crate::probe::round_half_away;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderTimeConfig {
    /// When disabled, the tracker ignores timings and always reports `default_ms`.
    pub enabled: bool,
    pub window: usize,
    pub min_ms: u64,
    pub max_ms: u64,
    pub default_ms: u64,
}

impl Default for RenderTimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: 5,
            min_ms: 16,
            max_ms: 32,
            default_ms: 16,
        }
    }
}

/// Smooths how long a render pass takes, for projecting scroll offsets ahead of time.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTimeTracker {
    config: RenderTimeConfig,
    average: RunningAverage,
    started_at_ms: Option<u64>,
}

impl Default for RenderTimeTracker {
    fn default() -> Self {
        Self::new(RenderTimeConfig::default())
    }
}

impl RenderTimeTracker {
    pub fn new(config: RenderTimeConfig) -> Self {
        Self {
            average: RunningAverage::new(config.window),
            config,
            started_at_ms: None,
        }
    }

    /// Marks the start of a render. Nested starts keep the earliest timestamp.
    pub fn start_tracking(&mut self, now_ms: u64) {
        if !self.config.enabled {
            return;
        }
        self.started_at_ms.get_or_insert(now_ms);
    }

    pub fn mark_render_complete(&mut self, now_ms: u64) {
        if !self.config.enabled {
            return;
        }
        if let Some(start) = self.started_at_ms.take() {
            self.average.add_value(now_ms.saturating_sub(start) as f64);
        }
    }

    /// The unclamped running average.
    pub fn raw_value(&self) -> f64 {
        self.average.current_value()
    }

    /// Average render time, rounded and clamped to `[min_ms, max_ms]`.
    pub fn average_render_time(&self) -> u64 {
        if !self.config.enabled {
            return self.config.default_ms;
        }
        let rounded = round_half_away(self.average.current_value()).max(0.0) as u64;
        rounded.max(self.config.min_ms).min(self.config.max_ms)
    }
}
