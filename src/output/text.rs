use super::{CycleOutput, Formatter};
use crate::audio::ToneKind;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &CycleOutput<'_>) -> String {
        let r = output.report;
        let d = &r.decision;
        let tone = match d.kind {
            ToneKind::Silent => "silent".to_string(),
            kind => format!("{:<4} {:>4} Hz vol {:>2}", kind_name(kind), d.frequency, d.amplitude),
        };

        let mut line = format!(
            "t={:>9.3}s p={:>9.2} Pa f={:>+7.1} Hz {}",
            r.time_ms as f64 / 1000.0,
            r.pressure,
            r.tone_frequency,
            tone
        );
        if self.verbose {
            line.push_str(&format!(
                " [dds: {:>6}, good: {}, error: {}, buttons: {}]",
                r.dds_acc, d.led_good, d.led_error, r.buttons
            ));
        }
        if !r.menu.is_nothing() {
            line.push_str(&format!(" menu: {:?}", r.menu));
        }
        line
    }
}

fn kind_name(kind: ToneKind) -> &'static str {
    match kind {
        ToneKind::Rise => "rise",
        ToneKind::Sink => "sink",
        ToneKind::Silent => "-",
    }
}
