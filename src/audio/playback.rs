use audio_thread_priority::RtPriorityHandle;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use super::SquareWave;
use crate::error::{Result, VarioError};
use crate::hal::ToneGenerator;

/// Live tone output on the default sound device
///
/// The control loop sends tone changes over a channel; the device callback
/// picks up the latest one and synthesises the square wave.
pub struct TonePlayer {
    tx: Sender<Option<(u16, u8)>>,
    stream: cpal::Stream,
    _rt_handle: Option<RtPriorityHandle>,
}

impl TonePlayer {
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| VarioError::Audio("No output device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("Output device: {:?}", desc),
            Err(_) => log::info!("Output device: Unknown"),
        }

        let stream_config = cpal::StreamConfig {
            channels: 1,
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut osc = SquareWave::new(sample_rate);
        let mut tone = None;

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    tone = latest(&rx, tone);
                    for sample in data.iter_mut() {
                        *sample = osc.next_sample(tone);
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| VarioError::Audio(format!("{}", e)))?;

        let rt_handle = match audio_thread_priority::promote_current_thread_to_real_time(
            512,
            sample_rate,
        ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Could not set real-time priority: {}", e);
                None
            }
        };

        stream
            .play()
            .map_err(|e| VarioError::Audio(format!("{}", e)))?;

        Ok(Self {
            tx,
            stream,
            _rt_handle: rt_handle,
        })
    }

    fn send(&self, tone: Option<(u16, u8)>) {
        if self.tx.send(tone).is_err() {
            log::warn!("Audio callback dropped");
        }
    }
}

fn latest(rx: &Receiver<Option<(u16, u8)>>, current: Option<(u16, u8)>) -> Option<(u16, u8)> {
    rx.try_iter().last().unwrap_or(current)
}

impl ToneGenerator for TonePlayer {
    fn play_tone(&mut self, frequency_hz: u16, amplitude: u8) {
        self.send(Some((frequency_hz, amplitude)));
    }

    fn stop_tone(&mut self) {
        self.send(None);
    }
}

impl Drop for TonePlayer {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}
