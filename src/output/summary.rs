use rolling_stats::Stats;
use serde::Serialize;

use crate::audio::ToneKind;
use crate::settings::Settings;
use crate::vario::CycleReport;

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Whole-run statistics
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cycles: u64,
    pub duration_ms: u64,
    pub pressure: Option<StatsSummary>,
    pub tone_frequency: Option<StatsSummary>,
    pub rise_cycles: u64,
    pub sink_cycles: u64,
    pub silent_cycles: u64,
    pub menu_events: u64,
    pub settings: Settings,
}

impl RunSummary {
    pub fn print_text(&self) {
        println!("Cycles: {} ({:.1} s)", self.cycles, self.duration_ms as f64 / 1000.0);
        for (name, stats, unit) in [
            ("Pressure", &self.pressure, "Pa"),
            ("Tone frequency", &self.tone_frequency, "Hz"),
        ] {
            match stats {
                Some(s) => println!(
                    "{:<15} mean {:.2} {} std {:.2} min {:.2} max {:.2}",
                    name, s.mean, unit, s.std_dev, s.min, s.max
                ),
                None => println!("{:<15} -", name),
            }
        }
        println!(
            "Tone cycles: rise {} sink {} silent {}",
            self.rise_cycles, self.sink_cycles, self.silent_cycles
        );
        println!("Menu events: {}", self.menu_events);
        println!(
            "Settings: volume {} sensitivity {} falling {}",
            self.settings.volume,
            self.settings.sensitivity,
            if self.settings.falling_enabled { "on" } else { "off" }
        );
    }
}

pub struct SummaryBuilder {
    pressure: Stats<f32>,
    tone_frequency: Stats<f32>,
    cycles: u64,
    rise_cycles: u64,
    sink_cycles: u64,
    silent_cycles: u64,
    menu_events: u64,
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self {
            pressure: Stats::new(),
            tone_frequency: Stats::new(),
            cycles: 0,
            rise_cycles: 0,
            sink_cycles: 0,
            silent_cycles: 0,
            menu_events: 0,
        }
    }

    pub fn update(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.pressure.update(report.pressure);
        self.tone_frequency.update(report.tone_frequency);
        match report.decision.kind {
            ToneKind::Rise => self.rise_cycles += 1,
            ToneKind::Sink => self.sink_cycles += 1,
            ToneKind::Silent => self.silent_cycles += 1,
        }
        if !report.menu.is_nothing() {
            self.menu_events += 1;
        }
    }

    pub fn finish(&self, duration_ms: u64, settings: Settings) -> RunSummary {
        RunSummary {
            cycles: self.cycles,
            duration_ms,
            pressure: StatsSummary::from_stats(&self.pressure),
            tone_frequency: StatsSummary::from_stats(&self.tone_frequency),
            rise_cycles: self.rise_cycles,
            sink_cycles: self.sink_cycles,
            silent_cycles: self.silent_cycles,
            menu_events: self.menu_events,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuOutcome;
    use crate::output::tests::report;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_run() {
        let summary = SummaryBuilder::new().finish(0, Settings::default());
        assert_eq!(summary.cycles, 0);
        assert!(summary.pressure.is_none());
    }

    #[test]
    fn test_counts_and_stats() {
        let mut builder = SummaryBuilder::new();
        let mut a = report(MenuOutcome::Nothing);
        a.tone_frequency = 10.0;
        let mut b = report(MenuOutcome::VolumeChanged { volume: 6 });
        b.tone_frequency = 30.0;
        b.decision.kind = ToneKind::Silent;
        builder.update(&a);
        builder.update(&b);

        let summary = builder.finish(40, Settings::default());
        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.rise_cycles, 1);
        assert_eq!(summary.silent_cycles, 1);
        assert_eq!(summary.menu_events, 1);
        let f = summary.tone_frequency.unwrap();
        assert_relative_eq!(f.mean, 20.0);
        assert_relative_eq!(f.min, 10.0);
        assert_relative_eq!(f.max, 30.0);
    }
}
