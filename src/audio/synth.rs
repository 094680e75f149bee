use crate::constants::MAX_VOLUME;

/// Peak output level at maximum volume
pub const FULL_SCALE: f32 = 0.8;

/// Square wave oscillator, the waveform of a piezo driven push-pull
pub struct SquareWave {
    phase: f32,
    sample_rate: f32,
}

impl SquareWave {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            sample_rate: sample_rate as f32,
        }
    }

    /// Next output sample for the given tone, silence for `None` or 0 Hz
    pub fn next_sample(&mut self, tone: Option<(u16, u8)>) -> f32 {
        let Some((frequency_hz, amplitude)) = tone else {
            self.phase = 0.0;
            return 0.0;
        };
        if frequency_hz == 0 {
            return 0.0;
        }

        let level = FULL_SCALE * amplitude.min(MAX_VOLUME) as f32 / MAX_VOLUME as f32;
        let out = if self.phase < 0.5 { level } else { -level };

        self.phase += frequency_hz as f32 / self.sample_rate;
        self.phase -= self.phase.floor();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_period_and_level() {
        let mut osc = SquareWave::new(8000);
        let samples: Vec<f32> = (0..16).map(|_| osc.next_sample(Some((1000, 20)))).collect();

        // 1 kHz at 8 kHz: four high samples then four low ones
        assert_eq!(&samples[..4], &[FULL_SCALE; 4]);
        assert_eq!(&samples[4..8], &[-FULL_SCALE; 4]);
        assert_eq!(&samples[8..12], &[FULL_SCALE; 4]);
    }

    #[test]
    fn test_amplitude_scales_with_volume() {
        let mut osc = SquareWave::new(8000);
        let s = osc.next_sample(Some((1000, 5)));
        assert!((s - FULL_SCALE * 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_silence() {
        let mut osc = SquareWave::new(8000);
        assert_eq!(osc.next_sample(None), 0.0);
        assert_eq!(osc.next_sample(Some((0, 20))), 0.0);
        assert_eq!(osc.next_sample(Some((1000, 0))), 0.0);
    }
}
