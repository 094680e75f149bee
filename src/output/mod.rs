mod csv;
mod json;
mod summary;
mod text;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::vario::CycleReport;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::summary::{RunSummary, StatsSummary, SummaryBuilder};
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One cycle report placed on the wall clock
#[derive(Debug, Serialize)]
pub struct CycleOutput<'a> {
    pub ts: String,
    #[serde(flatten)]
    pub report: &'a CycleReport,
}

pub trait Formatter: Send {
    fn format(&self, output: &CycleOutput<'_>) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Maps virtual run time onto timestamps anchored at the start of the run
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    start: DateTime<Utc>,
}

impl RunClock {
    pub fn start_now() -> Self {
        Self { start: Utc::now() }
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start }
    }

    pub fn timestamp(&self, offset_ms: u64) -> String {
        iso8601(self.start + Duration::milliseconds(offset_ms as i64))
    }

    /// Stamp `report` with the wall time of its cycle start
    pub fn output<'a>(&self, report: &'a CycleReport) -> CycleOutput<'a> {
        CycleOutput {
            ts: self.timestamp(report.time_ms),
            report,
        }
    }
}

pub fn iso8601(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
