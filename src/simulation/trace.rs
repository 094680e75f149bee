use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Result, VarioError};

/// Recorded or synthetic pressure samples, one per control cycle
///
/// # Format
/// One sample per line; the pressure in Pa is the last comma or whitespace
/// separated field, so both `1013.25` and `120,1013.25` work. Blank lines and
/// `#` comments are skipped, as is a header line before the first sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    samples: Vec<f32>,
}

impl Trace {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut samples = Vec::new();
        let mut header_seen = false;

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let field = line
                .rsplit(|c: char| c == ',' || c.is_whitespace())
                .find(|f| !f.is_empty())
                .unwrap_or(line);

            match field.parse::<f32>() {
                Ok(p) if p.is_finite() => samples.push(p),
                Ok(p) => {
                    return Err(VarioError::Trace {
                        line: index + 1,
                        message: format!("pressure must be finite, got {}", p),
                    });
                }
                Err(_)
                    if samples.is_empty()
                        && !header_seen
                        && line.chars().any(|c| c.is_ascii_alphabetic()) =>
                {
                    header_seen = true;
                }
                Err(_) => {
                    return Err(VarioError::Trace {
                        line: index + 1,
                        message: format!("invalid pressure: {}", field),
                    });
                }
            }
        }

        Ok(Self { samples })
    }

    /// Render as CSV with a time column for the given cycle period
    pub fn to_csv(&self, period_ms: u32) -> String {
        let mut out = String::from("time_ms,pressure_pa\n");
        for (i, p) in self.samples.iter().enumerate() {
            let _ = writeln!(out, "{},{}", i as u64 * period_ms as u64, p);
        }
        out
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, period_ms: u32) -> Result<()> {
        fs::write(path.as_ref(), self.to_csv(period_ms))?;
        Ok(())
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
