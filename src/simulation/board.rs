use std::thread;
use std::time::Duration;

use serde::Serialize;

use super::{ButtonScript, Trace};
use crate::error::{Result, VarioError};
use crate::hal::{
    ButtonInput, Clock, Delay, Indicators, PressureSensor, SensorInfo, ToneGenerator,
};
use crate::menu::ButtonCode;

/// Tone state change; `tone` is `(frequency_hz, amplitude)` or `None` for silence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneEvent {
    pub at_ms: u64,
    pub tone: Option<(u16, u8)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Led {
    Good,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedEvent {
    pub at_ms: u64,
    pub led: Led,
    pub on: bool,
}

/// Output changes on the virtual clock, recorded only when a state changes
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    tones: Vec<ToneEvent>,
    leds: Vec<LedEvent>,
    #[serde(skip)]
    tone: Option<(u16, u8)>,
    #[serde(skip)]
    good: bool,
    #[serde(skip)]
    error: bool,
}

impl Timeline {
    fn set_tone(&mut self, at_ms: u64, tone: Option<(u16, u8)>) {
        if tone != self.tone {
            self.tone = tone;
            self.tones.push(ToneEvent { at_ms, tone });
        }
    }

    fn set_led(&mut self, at_ms: u64, led: Led, on: bool) {
        let state = match led {
            Led::Good => &mut self.good,
            Led::Error => &mut self.error,
        };
        if *state != on {
            *state = on;
            self.leds.push(LedEvent { at_ms, led, on });
        }
    }

    pub fn tone_events(&self) -> &[ToneEvent] {
        &self.tones
    }

    pub fn led_events(&self) -> &[LedEvent] {
        &self.leds
    }

    pub fn current_tone(&self) -> Option<(u16, u8)> {
        self.tone
    }

    pub fn good_led(&self) -> bool {
        self.good
    }

    pub fn error_led(&self) -> bool {
        self.error
    }

    /// Tone sounding at `at_ms`
    pub fn tone_at(&self, at_ms: u64) -> Option<(u16, u8)> {
        let index = self.tones.partition_point(|e| e.at_ms <= at_ms);
        if index == 0 {
            None
        } else {
            self.tones[index - 1].tone
        }
    }

    /// Total milliseconds with a tone sounding, up to `end_ms`
    pub fn audible_ms(&self, end_ms: u64) -> u64 {
        let mut total = 0;
        for (i, event) in self.tones.iter().enumerate() {
            if event.tone.is_none() || event.at_ms >= end_ms {
                continue;
            }
            let until = self
                .tones
                .get(i + 1)
                .map_or(end_ms, |next| next.at_ms.min(end_ms));
            total += until - event.at_ms;
        }
        total
    }
}

/// Simulated board driven by a pressure trace and a button script
///
/// Time is virtual: only [`Delay::delay_ms`] advances the clock, so a run is
/// deterministic and as fast as the host allows. In realtime mode each delay
/// also sleeps, and a tone sink can be attached to hear the output.
pub struct SimBoard {
    trace: Trace,
    next_sample: usize,
    script: ButtonScript,
    clock_ms: u64,
    realtime: bool,
    sensor_present: bool,
    timeline: Timeline,
    tone_sink: Option<Box<dyn ToneGenerator>>,
}

impl SimBoard {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            next_sample: 0,
            script: ButtonScript::default(),
            clock_ms: 0,
            realtime: false,
            sensor_present: true,
            timeline: Timeline::default(),
            tone_sink: None,
        }
    }

    pub fn with_script(mut self, script: ButtonScript) -> Self {
        self.script = script;
        self
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Simulate a missing or unresponsive sensor
    pub fn with_sensor_fault(mut self) -> Self {
        self.sensor_present = false;
        self
    }

    pub fn with_tone_sink(mut self, sink: Box<dyn ToneGenerator>) -> Self {
        self.tone_sink = Some(sink);
        self
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Samples consumed so far
    pub fn samples_read(&self) -> usize {
        self.next_sample
    }

    /// True once every trace sample has been read
    pub fn trace_exhausted(&self) -> bool {
        self.next_sample >= self.trace.len()
    }
}

impl PressureSensor for SimBoard {
    fn init(&mut self) -> Result<()> {
        if !self.sensor_present {
            return Err(VarioError::SensorInit("no response from pressure sensor".into()));
        }
        if self.trace.is_empty() {
            return Err(VarioError::SensorInit("pressure trace is empty".into()));
        }
        Ok(())
    }

    fn info(&self) -> Option<SensorInfo> {
        let samples = self.trace.samples();
        let min_pa = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max_pa = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (self.sensor_present && !samples.is_empty()).then(|| SensorInfo {
            name: format!("simulated trace, {} samples", samples.len()),
            min_pa,
            max_pa,
            resolution_pa: 0.0,
        })
    }

    /// Next trace sample; the last one is held once the trace runs out
    fn read_pressure(&mut self) -> f32 {
        match self.trace.samples().get(self.next_sample) {
            Some(&p) => {
                self.next_sample += 1;
                p
            }
            None => self.trace.samples().last().copied().unwrap_or_default(),
        }
    }
}

impl ToneGenerator for SimBoard {
    fn play_tone(&mut self, frequency_hz: u16, amplitude: u8) {
        self.timeline
            .set_tone(self.clock_ms, Some((frequency_hz, amplitude)));
        if let Some(sink) = self.tone_sink.as_mut() {
            sink.play_tone(frequency_hz, amplitude);
        }
    }

    fn stop_tone(&mut self) {
        self.timeline.set_tone(self.clock_ms, None);
        if let Some(sink) = self.tone_sink.as_mut() {
            sink.stop_tone();
        }
    }
}

impl Indicators for SimBoard {
    fn set_good(&mut self, on: bool) {
        self.timeline.set_led(self.clock_ms, Led::Good, on);
    }

    fn set_error(&mut self, on: bool) {
        self.timeline.set_led(self.clock_ms, Led::Error, on);
    }
}

impl ButtonInput for SimBoard {
    fn read_buttons(&mut self) -> ButtonCode {
        self.script.code_at(self.clock_ms)
    }
}

impl Delay for SimBoard {
    fn delay_ms(&mut self, ms: u32) {
        self.clock_ms += ms as u64;
        if self.realtime {
            thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}

impl Clock for SimBoard {
    fn now_ms(&self) -> u64 {
        self.clock_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> SimBoard {
        SimBoard::new(Trace::new(vec![1000.0, 999.0]))
    }

    #[test]
    fn test_trace_holds_last_sample() {
        let mut b = board();
        assert_eq!(b.read_pressure(), 1000.0);
        assert_eq!(b.read_pressure(), 999.0);
        assert!(b.trace_exhausted());
        assert_eq!(b.read_pressure(), 999.0);
        assert_eq!(b.samples_read(), 2);
    }

    #[test]
    fn test_init_failures() {
        assert!(board().init().is_ok());
        assert!(board().with_sensor_fault().init().is_err());
        assert!(SimBoard::new(Trace::default()).init().is_err());
    }

    #[test]
    fn test_buttons_follow_clock() {
        let script = ButtonScript::parse("40 up\n60 none\n").unwrap();
        let mut b = board().with_script(script);

        assert_eq!(b.read_buttons(), ButtonCode::None);
        b.delay_ms(40);
        assert_eq!(b.read_buttons(), ButtonCode::Up);
        b.delay_ms(20);
        assert_eq!(b.read_buttons(), ButtonCode::None);
        assert_eq!(b.now_ms(), 60);
    }

    #[test]
    fn test_sensor_info_covers_trace_range() {
        let info = board().info().unwrap();
        assert_eq!(info.min_pa, 999.0);
        assert_eq!(info.max_pa, 1000.0);
        assert!(info.to_string().starts_with("simulated trace, 2 samples"));
        assert!(board().with_sensor_fault().info().is_none());
    }

    #[test]
    fn test_timeline_records_changes_only() {
        let mut b = board();
        b.play_tone(700, 5);
        b.play_tone(700, 5);
        b.delay_ms(20);
        b.play_tone(720, 5);
        b.delay_ms(20);
        b.stop_tone();
        b.stop_tone();
        b.set_good(true);
        b.set_good(true);
        b.set_error(false);

        let events = b.timeline().tone_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], ToneEvent { at_ms: 20, tone: Some((720, 5)) });
        assert_eq!(b.timeline().led_events().len(), 1);
        assert!(b.timeline().good_led());
        assert!(!b.timeline().error_led());
    }

    #[test]
    fn test_tone_at_and_audible_time() {
        let mut b = board();
        b.delay_ms(10);
        b.play_tone(700, 5);
        b.delay_ms(30);
        b.stop_tone();
        b.delay_ms(10);
        b.play_tone(800, 5);

        let t = b.timeline();
        assert_eq!(t.tone_at(0), None);
        assert_eq!(t.tone_at(10), Some((700, 5)));
        assert_eq!(t.tone_at(39), Some((700, 5)));
        assert_eq!(t.tone_at(40), None);
        assert_eq!(t.tone_at(55), Some((800, 5)));
        assert_eq!(t.audible_ms(60), 30 + 10);
    }
}
