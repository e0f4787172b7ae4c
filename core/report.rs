use crate::emit::RunSummary;
use byte_unit::{Byte, UnitType};
use colored::Colorize;

/// Operator-facing side channel. Writes to stderr only and must never
/// influence the bytes of the run artifact.
pub trait ProgressReporter {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn summary(&self, summary: &RunSummary);
}

/// Human-readable colored status lines on stderr.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow().bold(), message);
    }

    fn summary(&self, summary: &RunSummary) {
        let size = Byte::from_u64(summary.artifact_bytes).get_appropriate_unit(UnitType::Binary);
        eprintln!();
        eprintln!(
            "{} Artifact written to: {}",
            "✅".green(),
            summary.artifact_path.display().to_string().blue()
        );
        for (name, count) in &summary.categories {
            eprintln!("   {:<20} {} file(s)", name, count);
        }
        eprintln!(
            "   {} file(s) collected, {} candidate(s) skipped",
            summary.files_emitted.to_string().cyan(),
            summary.skipped
        );
        eprintln!(
            "   {:.2}, {} lines",
            size,
            summary.artifact_lines.to_string().cyan()
        );
    }
}

/// Silent reporter for `--quiet` runs and tests.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn summary(&self, _summary: &RunSummary) {}
}
