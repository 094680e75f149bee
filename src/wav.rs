use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::audio::SquareWave;
use crate::simulation::Timeline;

/// Synthesise the buzzer output recorded in `timeline` up to `end_ms`
pub fn render_timeline(timeline: &Timeline, end_ms: u64, sample_rate: u32) -> Vec<f32> {
    let total = (end_ms * sample_rate as u64 / 1000) as usize;
    let mut osc = SquareWave::new(sample_rate);
    let mut samples = Vec::with_capacity(total);

    let events = timeline.tone_events();
    let mut next_event = 0;
    let mut tone = None;

    for n in 0..total {
        let at_ms = n as u64 * 1000 / sample_rate as u64;
        while next_event < events.len() && events[next_event].at_ms <= at_ms {
            tone = events[next_event].tone;
            next_event += 1;
        }
        samples.push(osc.next_sample(tone));
    }

    samples
}

/// Write mono 32-bit float samples
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{Delay, ToneGenerator};
    use crate::simulation::{SimBoard, Trace};

    #[test]
    fn test_render_follows_tone_changes() {
        let mut board = SimBoard::new(Trace::new(vec![1000.0]));
        board.delay_ms(10);
        board.play_tone(1000, 20);
        board.delay_ms(10);
        board.stop_tone();

        let samples = render_timeline(board.timeline(), 30, 8000);
        assert_eq!(samples.len(), 240);
        assert!(samples[..80].iter().all(|&s| s == 0.0));
        assert!(samples[80..160].iter().all(|&s| s != 0.0));
        assert!(samples[160..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = vec![0.0, 0.5, -0.5, 0.25];

        save_wav(&path, &samples, 8000).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 8000);
        let read: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }
}
