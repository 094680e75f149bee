use super::{CycleOutput, Formatter};
use crate::menu::MenuOutcome;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &CycleOutput<'_>) -> String {
        let r = output.report;
        let d = &r.decision;
        format!(
            "{},{},{},{:.2},{:.3},{},{:?},{},{},{},{},{},{}",
            output.ts,
            r.time_ms,
            r.cycle,
            r.pressure,
            r.tone_frequency,
            r.dds_acc,
            d.kind,
            d.frequency,
            d.amplitude,
            d.led_good as u8,
            d.led_error as u8,
            r.buttons,
            menu_field(&r.menu)
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,time_ms,cycle,pressure_pa,tone_frequency,dds_acc,kind,frequency_hz,amplitude,led_good,led_error,buttons,menu",
        )
    }
}

fn menu_field(outcome: &MenuOutcome) -> String {
    match outcome {
        MenuOutcome::Nothing => String::new(),
        MenuOutcome::VolumeChanged { volume } => format!("volume={}", volume),
        MenuOutcome::VolumeLimit { volume } => format!("volume_limit={}", volume),
        MenuOutcome::SensitivityChanged { sensitivity } => format!("sensitivity={}", sensitivity),
        MenuOutcome::SensitivityLimit { sensitivity } => {
            format!("sensitivity_limit={}", sensitivity)
        }
        MenuOutcome::ToggleSuppressed => "toggle_suppressed".to_string(),
        MenuOutcome::FallingToggled { enabled } => format!("falling={}", enabled),
        MenuOutcome::ReleaseTimedOut => "release_timed_out".to_string(),
    }
}
