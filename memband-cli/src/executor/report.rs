//! Report Building
//!
//! Converts a [`RunOutcome`] into the serializable [`Report`] used by the
//! JSON and CSV renderers.

use super::execution::RunOutcome;
use super::metadata::build_report_meta;
use memband_core::RunConfig;
use memband_report::{KernelReport, Report, ReportSummary};

/// Build a complete Report from a run outcome
pub fn build_report(outcome: &RunOutcome, config: &RunConfig, total_duration_ms: f64) -> Report {
    let results: Vec<KernelReport> = outcome.results.iter().map(KernelReport::from).collect();

    let summary = ReportSummary {
        kernels_run: results.len(),
        total_iterations: results.iter().map(|r| r.iterations).sum(),
        interrupted: outcome.interrupted,
        total_duration_ms,
    };

    Report {
        meta: build_report_meta(config),
        results,
        summary,
    }
}
