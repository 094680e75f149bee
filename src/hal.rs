//! Interfaces to the hardware around the control core.

use std::fmt;

use crate::error::Result;
use crate::menu::ButtonCode;

/// Identity and range a sensor reports about itself
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInfo {
    pub name: String,
    pub min_pa: f32,
    pub max_pa: f32,
    pub resolution_pa: f32,
}

impl fmt::Display for SensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}..{:.2} Pa, resolution {} Pa)",
            self.name, self.min_pa, self.max_pa, self.resolution_pa
        )
    }
}

/// Barometric pressure sensor
pub trait PressureSensor {
    /// Bring the sensor up. Failure here is fatal for the device.
    fn init(&mut self) -> Result<()>;

    /// Latest pressure sample, in Pa
    fn read_pressure(&mut self) -> f32;

    /// Sensor details, if the driver knows them
    fn info(&self) -> Option<SensorInfo> {
        None
    }
}

/// Tone generator driving the buzzer
pub trait ToneGenerator {
    /// Start (or retune) a continuous tone. `amplitude` uses the volume scale 0..=20.
    fn play_tone(&mut self, frequency_hz: u16, amplitude: u8);

    fn stop_tone(&mut self);
}

/// The two status LEDs
pub trait Indicators {
    fn set_good(&mut self, on: bool);
    fn set_error(&mut self, on: bool);
}

/// Button matrix
pub trait ButtonInput {
    /// Buttons pressed right now
    fn read_buttons(&mut self) -> ButtonCode;
}

/// Blocking delays
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Monotonic milliseconds since power-on
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Everything the control loop drives
pub trait Board:
    PressureSensor + ToneGenerator + Indicators + ButtonInput + Delay + Clock
{
}

impl<T> Board for T where
    T: PressureSensor + ToneGenerator + Indicators + ButtonInput + Delay + Clock
{
}

/// Outputs used by feedback patterns
pub trait Outputs: ToneGenerator + Indicators + Delay {}

impl<T> Outputs for T where T: ToneGenerator + Indicators + Delay {}
