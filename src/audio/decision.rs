use serde::Serialize;

use super::BipCadence;
use crate::config::ToneConfig;
use crate::hal::{Indicators, ToneGenerator};
use crate::settings::Settings;

/// Which tone a cycle plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneKind {
    Rise,
    Sink,
    Silent,
}

/// Outcome of the climb/sink/silence policy for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToneDecision {
    pub kind: ToneKind,
    /// Tone pitch in Hz, 0 when silent
    pub frequency: u16,
    /// Tone amplitude on the volume scale, 0 when silent
    pub amplitude: u8,
    pub led_good: bool,
    pub led_error: bool,
}

impl ToneDecision {
    fn silent() -> Self {
        Self {
            kind: ToneKind::Silent,
            frequency: 0,
            amplitude: 0,
            led_good: false,
            led_error: false,
        }
    }

    pub fn play_tone(&self) -> bool {
        self.kind != ToneKind::Silent
    }

    /// Drive the buzzer and LEDs
    pub fn apply<B: ToneGenerator + Indicators + ?Sized>(&self, board: &mut B) {
        if self.play_tone() {
            board.play_tone(self.frequency, self.amplitude);
        } else {
            board.stop_tone();
        }
        board.set_good(self.led_good);
        board.set_error(self.led_error);
    }
}

/// Maps the filtered tone frequency to a tone and LED state
///
/// The decision works on the integer part of the frequency. Precedence:
///
/// 1. Below the climb threshold, or in a cadence gap:
///    * sink tone when falling mode is on and the frequency is under the sink
///      threshold,
///    * climb tone when falling mode is on and the frequency is over the
///      climb threshold (gap ticks still bip in falling mode),
///    * silence otherwise.
/// 2. Climbing on a bip tick: silence in falling mode, climb tone otherwise.
pub struct ToneMapper {
    sound_rise: i16,
    sound_fall: i16,
    min_fall: i16,
}

impl ToneMapper {
    pub fn new(config: &ToneConfig) -> Self {
        Self {
            sound_rise: config.sound_rise,
            sound_fall: config.sound_fall,
            min_fall: config.min_fall,
        }
    }

    /// Advance the cadence with `tone_frequency` and decide this cycle's output
    pub fn evaluate(
        &self,
        tone_frequency: f32,
        cadence: &mut BipCadence,
        settings: &Settings,
    ) -> ToneDecision {
        cadence.advance(tone_frequency);

        let frequency = tone_frequency as i16;
        let sensitivity = settings.sensitivity as i16;
        let falling = settings.falling_enabled;

        if frequency < sensitivity || cadence.in_gap() {
            if falling && frequency < self.min_fall {
                self.tone(
                    ToneKind::Sink,
                    frequency.saturating_add(self.sound_fall),
                    settings.volume,
                )
            } else if falling && frequency > sensitivity {
                self.tone(
                    ToneKind::Rise,
                    frequency.saturating_add(self.sound_rise),
                    settings.volume,
                )
            } else {
                ToneDecision::silent()
            }
        } else if falling {
            ToneDecision::silent()
        } else {
            self.tone(
                ToneKind::Rise,
                frequency.saturating_add(self.sound_rise),
                settings.volume,
            )
        }
    }

    fn tone(&self, kind: ToneKind, pitch: i16, volume: u8) -> ToneDecision {
        ToneDecision {
            kind,
            frequency: pitch.max(0) as u16,
            amplitude: volume,
            led_good: kind == ToneKind::Rise,
            led_error: kind == ToneKind::Sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToneConfig;

    fn mapper() -> ToneMapper {
        ToneMapper::new(&ToneConfig::default())
    }

    fn settings(falling_enabled: bool) -> Settings {
        Settings {
            volume: 7,
            sensitivity: 10,
            falling_enabled,
        }
    }

    /// Cadence whose next advance lands on a bip tick (accumulator <= 0)
    fn bip_tick() -> BipCadence {
        let mut dds = BipCadence::new(100.0, 2000.0);
        // 0 -> -30000 after one step at frequency -320
        dds.advance(-320.0);
        dds
    }

    /// Cadence whose next advance lands in a gap (accumulator > 0)
    fn gap_tick() -> BipCadence {
        BipCadence::new(100.0, 2000.0)
    }

    #[test]
    fn test_level_flight_is_silent() {
        let d = mapper().evaluate(0.0, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Silent);
        assert!(!d.play_tone());
        assert!(!d.led_good && !d.led_error);
    }

    #[test]
    fn test_sink_tone_in_falling_mode() {
        let d = mapper().evaluate(-80.5, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Sink);
        assert_eq!(d.frequency, 320);
        assert_eq!(d.amplitude, 7);
        assert!(d.led_error && !d.led_good);
    }

    #[test]
    fn test_sink_threshold_is_strict() {
        let d = mapper().evaluate(-30.0, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Silent);
        let d = mapper().evaluate(-31.0, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Sink);
    }

    #[test]
    fn test_no_sink_tone_without_falling_mode() {
        let d = mapper().evaluate(-200.0, &mut gap_tick(), &settings(false));
        assert_eq!(d.kind, ToneKind::Silent);
    }

    #[test]
    fn test_gap_tick_bips_in_falling_mode() {
        let mut dds = gap_tick();
        let d = mapper().evaluate(25.0, &mut dds, &settings(true));
        assert!(dds.in_gap());
        assert_eq!(d.kind, ToneKind::Rise);
        assert_eq!(d.frequency, 625);
        assert!(d.led_good && !d.led_error);
    }

    #[test]
    fn test_bip_tick_silent_in_falling_mode() {
        let mut dds = bip_tick();
        let d = mapper().evaluate(25.0, &mut dds, &settings(true));
        assert!(!dds.in_gap());
        assert_eq!(d.kind, ToneKind::Silent);
        assert!(!d.led_good);
    }

    #[test]
    fn test_bip_tick_rises_without_falling_mode() {
        let mut dds = bip_tick();
        let d = mapper().evaluate(25.0, &mut dds, &settings(false));
        assert_eq!(d.kind, ToneKind::Rise);
        assert_eq!(d.frequency, 625);
        assert!(d.led_good);
    }

    #[test]
    fn test_gap_tick_silent_without_falling_mode() {
        let d = mapper().evaluate(25.0, &mut gap_tick(), &settings(false));
        assert_eq!(d.kind, ToneKind::Silent);
    }

    #[test]
    fn test_threshold_uses_integer_frequency() {
        // 10.9 truncates to 10, which is not above a sensitivity of 10
        let d = mapper().evaluate(10.9, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Silent);
        let d = mapper().evaluate(11.2, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Rise);
        assert_eq!(d.frequency, 611);
    }

    #[test]
    fn test_pitch_saturates_instead_of_wrapping() {
        let m = ToneMapper {
            sound_rise: i16::MAX,
            sound_fall: i16::MIN,
            min_fall: -10,
        };
        let d = m.evaluate(25.0, &mut bip_tick(), &settings(false));
        assert_eq!(d.kind, ToneKind::Rise);
        assert_eq!(d.frequency, i16::MAX as u16);

        let d = m.evaluate(-400.0, &mut gap_tick(), &settings(true));
        assert_eq!(d.kind, ToneKind::Sink);
        assert_eq!(d.frequency, 0);
    }

    #[test]
    fn test_amplitude_follows_volume() {
        let s = Settings {
            volume: 0,
            ..settings(true)
        };
        let d = mapper().evaluate(-100.0, &mut gap_tick(), &s);
        assert_eq!(d.kind, ToneKind::Sink);
        assert_eq!(d.amplitude, 0);
    }
}
