//! Human-readable output formatter.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use relpack_core::PackReport;

/// Prefix shared by every line the CLI prints.
const PREFIX: &str = "[release]";

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    out: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled_stderr(),
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn summary_line(report: &PackReport) -> String {
        format!(
            "{PREFIX} zip built: {} (files: {})",
            report.output_path.display(),
            report.files_archived
        )
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.out.write_line(&Self::summary_line(report))?;

        if self.verbose {
            self.out
                .write_line(&format!("  Whitelist entries: {}", report.entries))?;
            self.out
                .write_line(&format!("  Files staged:      {}", report.files_staged))?;
            self.out.write_line(&format!(
                "  Total size:        {}",
                humanize_bytes(report.bytes_written)
            ))?;
            self.out.write_line(&format!(
                "  Archive size:      {}",
                humanize_bytes(report.bytes_compressed)
            ))?;
            self.out
                .write_line(&format!("  Duration:          {:?}", report.duration))?;
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let prefix = if self.use_colors {
            style(PREFIX).red().bold().to_string()
        } else {
            PREFIX.to_string()
        };
        let _ = self.err.write_line(&format!("{prefix} {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_summary_line() {
        let report = PackReport {
            output_path: PathBuf::from("/repo/dist/demo.zip"),
            files_archived: 7,
            ..PackReport::default()
        };
        assert_eq!(
            HumanFormatter::summary_line(&report),
            "[release] zip built: /repo/dist/demo.zip (files: 7)"
        );
    }
}
