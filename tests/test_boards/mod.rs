//! Shared board for integration tests: queued pressure samples and button
//! reads, with every output call recorded.

#![allow(dead_code)]

use std::collections::VecDeque;

use varioclub::hal::{ButtonInput, Clock, Delay, Indicators, PressureSensor, ToneGenerator};
use varioclub::menu::ButtonCode;
use varioclub::{Result, VarioError};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Tone(u16, u8),
    Stop,
    Good(bool),
    Error(bool),
    Wait(u32),
}

#[derive(Default)]
pub struct RecordingBoard {
    pressure: VecDeque<f32>,
    last_pressure: f32,
    buttons: VecDeque<ButtonCode>,
    pub sensor_fails: bool,
    pub events: Vec<Event>,
    pub clock_ms: u64,
}

impl RecordingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pressure(mut self, samples: impl IntoIterator<Item = f32>) -> Self {
        self.pressure.extend(samples);
        self
    }

    /// Button reads, one per call; `None` once the queue is empty
    pub fn with_buttons(mut self, codes: impl IntoIterator<Item = ButtonCode>) -> Self {
        self.buttons.extend(codes);
        self
    }

    pub fn push_buttons(&mut self, codes: impl IntoIterator<Item = ButtonCode>) {
        self.buttons.extend(codes);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn tones(&self) -> Vec<(u16, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Tone(f, a) => Some((*f, *a)),
                _ => None,
            })
            .collect()
    }

    pub fn tones_at(&self, frequency_hz: u16) -> usize {
        self.tones().iter().filter(|(f, _)| *f == frequency_hz).count()
    }

    pub fn error_led_lit(&self) -> bool {
        self.events.contains(&Event::Error(true))
    }

    pub fn last_error_led(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Error(on) => Some(*on),
            _ => None,
        })
    }
}

impl PressureSensor for RecordingBoard {
    fn init(&mut self) -> Result<()> {
        if self.sensor_fails {
            Err(VarioError::SensorInit("no ack".into()))
        } else {
            Ok(())
        }
    }

    fn read_pressure(&mut self) -> f32 {
        if let Some(p) = self.pressure.pop_front() {
            self.last_pressure = p;
        }
        self.last_pressure
    }
}

impl ToneGenerator for RecordingBoard {
    fn play_tone(&mut self, frequency_hz: u16, amplitude: u8) {
        self.events.push(Event::Tone(frequency_hz, amplitude));
    }

    fn stop_tone(&mut self) {
        self.events.push(Event::Stop);
    }
}

impl Indicators for RecordingBoard {
    fn set_good(&mut self, on: bool) {
        self.events.push(Event::Good(on));
    }

    fn set_error(&mut self, on: bool) {
        self.events.push(Event::Error(on));
    }
}

impl ButtonInput for RecordingBoard {
    fn read_buttons(&mut self) -> ButtonCode {
        self.buttons.pop_front().unwrap_or_default()
    }
}

impl Delay for RecordingBoard {
    fn delay_ms(&mut self, ms: u32) {
        self.clock_ms += ms as u64;
        self.events.push(Event::Wait(ms));
    }
}

impl Clock for RecordingBoard {
    fn now_ms(&self) -> u64 {
        self.clock_ms
    }
}
