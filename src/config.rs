//! Configuration for the variometer core.
//!
//! Every section has working defaults, so a TOML file only needs to list the
//! values it changes:
//!
//! ```toml
//! [filter]
//! coef_slow = 0.04
//!
//! [menu]
//! release_timeout_ms = 5000
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, VarioError};

/// Complete variometer configuration
///
/// # Example
/// ```
/// use varioclub::config::VarioConfig;
///
/// let config = VarioConfig::from_toml_str("[control]\nperiod_ms = 25\n").unwrap();
/// assert_eq!(config.control.period_ms, 25);
/// assert_eq!(config.menu.sensitivity_step, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VarioConfig {
    /// Pressure filter cascade
    pub filter: FilterConfig,
    /// Frequency to tone mapping
    pub tone: ToneConfig,
    /// Confirmation and alert patterns
    pub feedback: FeedbackConfig,
    /// Button menu timing
    pub menu: MenuConfig,
    /// Control loop timing
    pub control: ControlConfig,
}

/// Pressure filter cascade configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Fast low-pass coefficient (tracks recent pressure)
    pub coef_fast: f32,
    /// Slow low-pass coefficient (tracks the baseline), must be below `coef_fast`
    pub coef_slow: f32,
    /// Third-stage smoothing of the frequency signal
    pub coef_lowpass: f32,
    /// Gain from pressure difference (Pa) to frequency units
    pub scale: f32,
    /// Lower clamp of the tone frequency
    pub min_frequency: f32,
    /// Upper clamp of the tone frequency
    pub max_frequency: f32,
}

/// Tone mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToneConfig {
    /// Climb tone offset in Hz
    pub sound_rise: i16,
    /// Sink tone offset in Hz
    pub sound_fall: i16,
    /// Sink threshold in frequency units
    pub min_fall: i16,
    /// Cadence accumulator gain
    pub dds_step_scale: f32,
    /// Cadence accumulator bias
    pub dds_step_offset: f32,
}

/// Feedback pattern configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedbackConfig {
    pub confirm_hz: u16,
    pub confirm_ms: u32,
    pub limit_hz: u16,
    pub limit_ms: u32,
    /// Tick played once per sensitivity step
    pub sensitivity_tick_hz: u16,
    pub sensitivity_tick_gap_ms: u32,
    /// Gap between the two confirmations played when falling mode is disabled
    pub double_confirm_gap_ms: u32,
    /// Descending sweep played when falling mode is enabled
    pub sweep_start_hz: u16,
    pub sweep_span_hz: u16,
    pub sweep_step_ms: u32,
    /// Pause between the power-on bip and the sensor check
    pub boot_gap_ms: u32,
    /// Pause between the two alerts of a sensor fault
    pub fault_gap_ms: u32,
}

/// Button menu configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Sensitivity change per gesture
    pub sensitivity_step: i8,
    /// Pause after a sensitivity gesture
    pub debounce_ms: u32,
    /// Button polling interval while waiting for Select to be released
    pub poll_interval_ms: u32,
    /// Give up waiting for the Select release after this long.
    /// `None` waits until the button is released.
    pub release_timeout_ms: Option<u32>,
}

/// Control loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    /// Delay between two cycles in milliseconds
    pub period_ms: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            coef_fast: COEF_FAST,
            coef_slow: COEF_SLOW,
            coef_lowpass: COEF_LOWPASS,
            scale: FREQUENCY_SCALE,
            min_frequency: MIN_TONE_FREQUENCY,
            max_frequency: MAX_TONE_FREQUENCY,
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sound_rise: SOUND_RISE,
            sound_fall: SOUND_FALL,
            min_fall: MIN_FALL,
            dds_step_scale: DDS_STEP_SCALE,
            dds_step_offset: DDS_STEP_OFFSET,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            confirm_hz: TONE_CONFIRM,
            confirm_ms: CONFIRM_MS,
            limit_hz: TONE_LIMIT,
            limit_ms: LIMIT_MS,
            sensitivity_tick_hz: TONE_CONFIRM + 200,
            sensitivity_tick_gap_ms: 50,
            double_confirm_gap_ms: 2,
            sweep_start_hz: SOUND_FALL as u16,
            sweep_span_hz: 200,
            sweep_step_ms: 1,
            boot_gap_ms: 50,
            fault_gap_ms: 100,
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            sensitivity_step: STEP_SENS,
            debounce_ms: DEBOUNCE_MS,
            poll_interval_ms: 1,
            release_timeout_ms: None,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_ms: LOOP_PERIOD_MS,
        }
    }
}

impl VarioConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| VarioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VarioError::Config(e.to_string()))
    }

    /// Check the cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let f = &self.filter;
        for (name, coef) in [
            ("coef_fast", f.coef_fast),
            ("coef_slow", f.coef_slow),
            ("coef_lowpass", f.coef_lowpass),
        ] {
            if !(coef > 0.0 && coef <= 1.0) {
                return Err(VarioError::Config(format!(
                    "filter.{} must be in (0, 1], got {}",
                    name, coef
                )));
            }
        }
        if f.coef_slow >= f.coef_fast {
            return Err(VarioError::Config(format!(
                "filter.coef_slow ({}) must be below filter.coef_fast ({})",
                f.coef_slow, f.coef_fast
            )));
        }
        for (name, value) in [
            ("filter.scale", f.scale),
            ("filter.min_frequency", f.min_frequency),
            ("filter.max_frequency", f.max_frequency),
            ("tone.dds_step_scale", self.tone.dds_step_scale),
            ("tone.dds_step_offset", self.tone.dds_step_offset),
        ] {
            if !value.is_finite() {
                return Err(VarioError::Config(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        if f.min_frequency >= f.max_frequency {
            return Err(VarioError::Config(format!(
                "filter.min_frequency ({}) must be below filter.max_frequency ({})",
                f.min_frequency, f.max_frequency
            )));
        }
        let t = &self.tone;
        for (name, pitch) in [
            (
                "filter.max_frequency + tone.sound_rise",
                f.max_frequency as i32 + t.sound_rise as i32,
            ),
            (
                "filter.min_frequency + tone.sound_fall",
                f.min_frequency as i32 + t.sound_fall as i32,
            ),
            (
                "tone.min_fall + tone.sound_fall",
                t.min_fall as i32 + t.sound_fall as i32,
            ),
        ] {
            if i16::try_from(pitch).is_err() {
                return Err(VarioError::Config(format!(
                    "{} ({}) does not fit a 16-bit pitch",
                    name, pitch
                )));
            }
        }
        if self.control.period_ms == 0 {
            return Err(VarioError::Config("control.period_ms must be positive".into()));
        }
        if self.menu.sensitivity_step <= 0 {
            return Err(VarioError::Config(
                "menu.sensitivity_step must be positive".into(),
            ));
        }
        if self.menu.poll_interval_ms == 0 {
            return Err(VarioError::Config(
                "menu.poll_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
