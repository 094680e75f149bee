use super::{CycleOutput, Formatter};

/// One JSON object per line
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, output: &CycleOutput<'_>) -> String {
        match serde_json::to_string(output) {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to serialize cycle {}: {}", output.report.cycle, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuOutcome;
    use crate::output::tests::{clock, report};

    #[test]
    fn test_fields() {
        let mut r = report(MenuOutcome::SensitivityChanged { sensitivity: 20 });
        r.time_ms = 1000;
        let line = JsonFormatter.format(&clock().output(&r));
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(v["ts"], "2024-05-01T12:00:01.000Z");
        assert_eq!(v["time_ms"], 1000);
        assert_eq!(v["cycle"], 12);
        assert_eq!(v["dds_acc"], -1170);
        assert_eq!(v["decision"]["kind"], "rise");
        assert_eq!(v["decision"]["frequency"], 642);
        assert_eq!(v["buttons"], "none");
        assert_eq!(v["menu"]["event"], "sensitivity_changed");
        assert_eq!(v["menu"]["sensitivity"], 20);
    }
}
