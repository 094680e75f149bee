//! Device constants
//!
//! Limits of the persisted settings and the nominal tuning of the filter
//! cascade, tone mapping and feedback patterns. The tuning values are the
//! defaults of [`crate::config::VarioConfig`]; the setting limits are fixed.

/// Lowest selectable volume.
pub const MIN_VOLUME: u8 = 0;
/// Highest selectable volume, also the amplitude used for feedback tones.
pub const MAX_VOLUME: u8 = 20;
/// Volume written when the stored settings are corrupted.
pub const DEFAULT_VOLUME: u8 = 5;

/// Lowest climb threshold, in filtered frequency units.
pub const MIN_SENS: i8 = 10;
/// Highest climb threshold, in filtered frequency units.
pub const MAX_SENS: i8 = 40;
/// Increment applied by one sensitivity gesture.
pub const STEP_SENS: i8 = 10;

/// Sink threshold below which the falling tone plays.
pub const MIN_FALL: i16 = -30;

/// Offset added to the tone frequency for the climb tone (Hz).
pub const SOUND_RISE: i16 = 600;
/// Offset added to the tone frequency for the sink tone (Hz).
pub const SOUND_FALL: i16 = 400;

/// Fast pressure low-pass coefficient.
pub const COEF_FAST: f32 = 0.1;
/// Slow (baseline) pressure low-pass coefficient.
pub const COEF_SLOW: f32 = 0.05;
/// Smoothing of the frequency signal before audio mapping.
pub const COEF_LOWPASS: f32 = 0.1;
/// Gain from filtered pressure difference to tone frequency.
pub const FREQUENCY_SCALE: f32 = 50.0;
/// Tone frequency clamp. Climb range is wider than sink range.
pub const MIN_TONE_FREQUENCY: f32 = -400.0;
pub const MAX_TONE_FREQUENCY: f32 = 500.0;

/// Bip cadence accumulator increment: `frequency * SCALE + OFFSET`.
pub const DDS_STEP_SCALE: f32 = 100.0;
pub const DDS_STEP_OFFSET: f32 = 2000.0;

/// Confirmation bip.
pub const TONE_CONFIRM: u16 = 1500;
pub const CONFIRM_MS: u32 = 200;
/// Limit alert.
pub const TONE_LIMIT: u16 = 800;
pub const LIMIT_MS: u32 = 500;

/// Control loop period.
pub const LOOP_PERIOD_MS: u32 = 20;
/// Pause after a sensitivity gesture before buttons are read again.
pub const DEBOUNCE_MS: u32 = 200;
