//! Host-side stand-ins for the hardware: a board fed from recorded traces and
//! timed button scripts, plus (with the `simulation` feature) a synthetic
//! flight generator.

mod board;
#[cfg(feature = "simulation")]
pub mod flight;
mod script;
mod trace;

pub use board::{Led, LedEvent, SimBoard, Timeline, ToneEvent};
#[cfg(feature = "simulation")]
pub use flight::{FlightConfig, Segment, altitude_to_pressure, generate_flight};
pub use script::ButtonScript;
pub use trace::Trace;
