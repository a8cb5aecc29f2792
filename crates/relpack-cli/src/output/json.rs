//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use relpack_core::PackReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackOutput {
    output_path: String,
    entries: usize,
    files_staged: usize,
    files_archived: usize,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    duration_ms: u128,
}

impl From<&PackReport> for PackOutput {
    fn from(report: &PackReport) -> Self {
        Self {
            output_path: report.output_path.display().to_string(),
            entries: report.entries,
            files_staged: report.files_staged,
            files_archived: report.files_archived,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        let output = JsonOutput::success("package", PackOutput::from(report));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("package", error.to_string());
        if Self::output(&output).is_err() {
            let _ = writeln!(io::stderr(), "{error}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pack_output_serialization() {
        let report = PackReport {
            output_path: PathBuf::from("/repo/dist/demo.zip"),
            entries: 2,
            files_staged: 5,
            files_archived: 5,
            bytes_written: 100,
            bytes_compressed: 50,
            ..PackReport::default()
        };

        let value = serde_json::to_value(JsonOutput::success("package", PackOutput::from(&report)))
            .unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["operation"], "package");
        assert_eq!(value["data"]["files_archived"], 5);
        assert_eq!(value["data"]["output_path"], "/repo/dist/demo.zip");
        assert_eq!(value["data"]["compression_ratio"], 2.0);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_output_serialization() {
        let value = serde_json::to_value(JsonOutput::error("package", "boom")).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
        assert!(value.get("data").is_none());
    }
}
