//! Audio variometer: turns barometric pressure into climb and sink tones.
//!
//! The control loop ([`Vario`]) runs against the hardware traits in [`hal`];
//! [`simulation::SimBoard`] provides them from recorded pressure traces and
//! button scripts.

pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod hal;
pub mod menu;
pub mod output;
pub mod settings;
pub mod signal_processing;
pub mod simulation;
pub mod vario;
pub mod wav;

pub use config::VarioConfig;
pub use error::{Result, VarioError};
pub use vario::{CycleReport, Vario};
pub use wav::{render_timeline, save_wav};
