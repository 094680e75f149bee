use std::fs;
use std::path::Path;

use crate::error::{Result, VarioError};
use crate::menu::ButtonCode;

/// Timed button presses
///
/// # Format
/// `<time_ms> <buttons>` per line, times non-decreasing. The buttons hold
/// from that time until the next line. Before the first line nothing is
/// pressed.
///
/// ```text
/// # raise the volume, then bump the sensitivity
/// 1000 up
/// 1100 none
/// 3000 select
/// 3200 select+up
/// 3400 none
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonScript {
    steps: Vec<(u64, ButtonCode)>,
}

impl ButtonScript {
    pub fn new(mut steps: Vec<(u64, ButtonCode)>) -> Self {
        steps.sort_by_key(|(at_ms, _)| *at_ms);
        Self { steps }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut steps: Vec<(u64, ButtonCode)> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let error = |message: String| VarioError::Script {
                line: index + 1,
                message,
            };

            let (time, code) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| error(format!("expected '<time_ms> <buttons>', got '{}'", line)))?;
            let at_ms: u64 = time
                .parse()
                .map_err(|_| error(format!("invalid time: {}", time)))?;
            let code: ButtonCode = code.parse().map_err(error)?;

            if let Some((last, _)) = steps.last() {
                if at_ms < *last {
                    return Err(error(format!("time {} goes back before {}", at_ms, last)));
                }
            }
            steps.push((at_ms, code));
        }

        Ok(Self { steps })
    }

    /// Buttons held at `at_ms`
    pub fn code_at(&self, at_ms: u64) -> ButtonCode {
        let index = self.steps.partition_point(|(t, _)| *t <= at_ms);
        if index == 0 {
            ButtonCode::None
        } else {
            self.steps[index - 1].1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
