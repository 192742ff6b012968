use std::collections::VecDeque;

use crate::config::settings::AdaptiveConfig;

/// Rolling average of the most recent frame times.
#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
    samples: VecDeque<f64>,
    sum: f64,
    window: usize,
}

impl FrameRateMonitor {
    /// Monitor averaging the last `window` frames (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            sum: 0.0,
            window,
        }
    }

    /// Record one frame duration in seconds. Non-positive or non-finite values are dropped.
    pub fn record(&mut self, dt_secs: f64) {
        if !(dt_secs.is_finite() && dt_secs > 0.0) {
            return;
        }
        if self.samples.len() == self.window
            && let Some(old) = self.samples.pop_front()
        {
            self.sum -= old;
        }
        self.samples.push_back(dt_secs);
        self.sum += dt_secs;
    }

    /// Whether a full window of samples has been recorded.
    pub fn is_warm(&self) -> bool {
        self.samples.len() == self.window
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no frames have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Average frames per second over the held samples.
    pub fn fps(&self) -> Option<f64> {
        if self.samples.is_empty() || self.sum <= 0.0 {
            return None;
        }
        Some(self.samples.len() as f64 / self.sum)
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}

/// Lowers the extraction detail level while the measured frame rate stays under target.
///
/// The controller only ever reduces detail; a slow window multiplies the level by
/// `reduction_factor` once per tick until `min_detail` is reached.
#[derive(Clone, Debug)]
pub struct AdaptiveDetail {
    config: AdaptiveConfig,
    monitor: FrameRateMonitor,
    level: f64,
}

impl AdaptiveDetail {
    /// Controller starting at `max_detail`.
    pub fn new(config: AdaptiveConfig) -> Self {
        let monitor = FrameRateMonitor::new(config.window);
        let level = config.max_detail;
        Self {
            config,
            monitor,
            level,
        }
    }

    /// Start from `level` instead of `max_detail`; the controller never raises detail.
    pub fn starting_at(mut self, level: f64) -> Self {
        if level.is_finite() {
            self.level = level.min(self.config.max_detail).max(0.0);
        }
        self
    }

    /// Current detail level.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Frame-rate monitor backing the controller.
    pub fn monitor(&self) -> &FrameRateMonitor {
        &self.monitor
    }

    /// Record a frame; returns the new level when it was reduced.
    pub fn observe(&mut self, dt_secs: f64) -> Option<f64> {
        if !self.config.enabled {
            return None;
        }
        self.monitor.record(dt_secs);
        if !self.monitor.is_warm() || self.level <= self.config.min_detail {
            return None;
        }
        let fps = self.monitor.fps()?;
        if fps >= self.config.target_fps {
            return None;
        }
        let next = (self.level * self.config.reduction_factor).max(self.config.min_detail);
        tracing::debug!(fps, from = self.level, to = next, "reducing mesh detail");
        self.level = next;
        Some(next)
    }

    /// Forget measurements and restore the starting level.
    pub fn reset(&mut self) {
        self.monitor.clear();
        self.level = self.config.max_detail;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/adaptive.rs"]
mod tests;
