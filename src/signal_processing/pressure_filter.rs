use serde::Serialize;

use super::LowPass;
use crate::config::FilterConfig;

/// Snapshot of the filter cascade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterState {
    pub low_pass_fast: f32,
    pub low_pass_slow: f32,
    pub tone_freq_lowpass: f32,
}

/// Pressure to tone-frequency filter cascade
///
/// Two exponential averages of the raw pressure run side by side: the fast
/// one follows recent pressure, the slow one a baseline. Pressure falls as
/// altitude rises, so `slow - fast` is positive while climbing. The scaled
/// difference is smoothed a third time and clamped to the audible range.
///
/// Both pressure averages are seeded with the first sample so the output
/// starts at zero instead of ramping in from an empty state.
pub struct PressureFilter {
    fast: LowPass,
    slow: LowPass,
    tone: LowPass,
    scale: f32,
    min_frequency: f32,
    max_frequency: f32,
    seeded: bool,
}

impl PressureFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            fast: LowPass::new(config.coef_fast),
            slow: LowPass::new(config.coef_slow),
            tone: LowPass::new(config.coef_lowpass),
            scale: config.scale,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            seeded: false,
        }
    }

    /// Process one pressure sample (Pa) and return the clamped tone frequency
    pub fn update(&mut self, pressure: f32) -> f32 {
        if !self.seeded {
            self.fast.reset(pressure);
            self.slow.reset(pressure);
            self.seeded = true;
        }

        // Both averages track the raw sample, never each other
        let fast = self.fast.update(pressure);
        let slow = self.slow.update(pressure);

        let raw_frequency = (slow - fast) * self.scale;
        let smoothed = self.tone.update(raw_frequency);

        smoothed.clamp(self.min_frequency, self.max_frequency)
    }

    /// Whether a sample has been seen yet
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn state(&self) -> FilterState {
        FilterState {
            low_pass_fast: self.fast.value(),
            low_pass_slow: self.slow.value(),
            tone_freq_lowpass: self.tone.value(),
        }
    }
}
