//! Batch-run reporting for the demo pipeline.

use std::process;
use tracing::{error, info};

/// The pipeline stage a demo file failed in. Reading and parsing the
/// source is one stage; component resolution is the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    Parse,
    Resolve,
}

impl FailurePhase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Resolve => "resolve",
        }
    }
}

/// Collects per-file outcomes over a batch run and prints a summary,
/// exiting non-zero when any file failed.
pub struct AllResultsFormatter {
    tool_name: String,
    total_files: usize,
    successful: usize,
    parse_failures: usize,
    resolve_failures: usize,
}

impl AllResultsFormatter {
    pub fn new(tool_name: &str, total_files: usize) -> Self {
        info!("Running {} on {} demo files...", tool_name, total_files);
        info!("{}", "=".repeat(80));

        Self {
            tool_name: tool_name.to_string(),
            total_files,
            successful: 0,
            parse_failures: 0,
            resolve_failures: 0,
        }
    }

    pub fn report_success(&mut self, file_name: &str, stats: Option<&str>) {
        self.successful += 1;
        if let Some(stats) = stats {
            info!("SUCCESS: {} ({})", file_name, stats);
        } else {
            info!("SUCCESS: {}", file_name);
        }
    }

    pub fn report_failure(&mut self, file_name: &str, phase: FailurePhase, err: &str) {
        match phase {
            FailurePhase::Parse => self.parse_failures += 1,
            FailurePhase::Resolve => self.resolve_failures += 1,
        }
        error!("FAILED ({}): {} - {}", phase.label(), file_name, err);
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.parse_failures + self.resolve_failures
    }

    pub fn finish(self) {
        let failed = self.failed();
        info!("");
        info!("{}", "=".repeat(80));
        info!("SUMMARY:");
        info!("  Total files: {}", self.total_files);
        info!("  Successful: {}", self.successful);
        info!(
            "  Failed: {} ({} parse, {} resolve)",
            failed, self.parse_failures, self.resolve_failures
        );

        if failed > 0 {
            error!(
                "Some files failed to process with {}. Check the errors above for details.",
                self.tool_name
            );
            process::exit(1);
        } else {
            info!(
                "All demo files processed successfully with {}!",
                self.tool_name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_phases_are_counted_separately() {
        let mut formatter = AllResultsFormatter::new("parser", 3);
        formatter.report_success("a.dl", None);
        formatter.report_failure("b.dl", FailurePhase::Parse, "syntax error");
        formatter.report_failure("c.dl", FailurePhase::Resolve, "unknown component");
        assert_eq!(formatter.failed(), 2);
        assert_eq!(FailurePhase::Parse.label(), "parse");
        assert_eq!(FailurePhase::Resolve.label(), "resolve");
    }
}
