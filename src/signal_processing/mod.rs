pub mod lowpass;
pub mod pressure_filter;

pub use lowpass::LowPass;
pub use pressure_filter::{FilterState, PressureFilter};
