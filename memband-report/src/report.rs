//! Report Data Structures

use chrono::{DateTime, Utc};
use memband_core::{Measurement, RunConfig, Selection, Strategy};
use serde::{Deserialize, Serialize};

/// Running total for one kernel across its repeated runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Registry index
    pub index: usize,
    pub description: String,
    pub strategy: Strategy,
    /// Sum of every run's elapsed seconds
    pub total_seconds: f64,
    pub iterations: u64,
    pub total_cycles: u64,
    /// Data moved per run, in MiB
    pub data_mib: f64,
}

impl AggregateResult {
    pub fn new(index: usize, description: &str, strategy: Strategy, data_mib: f64) -> Self {
        Self {
            index,
            description: description.to_string(),
            strategy,
            total_seconds: 0.0,
            iterations: 0,
            total_cycles: 0,
            data_mib,
        }
    }

    /// Fold one run into the totals
    pub fn record(&mut self, m: &Measurement) {
        self.total_seconds += m.seconds;
        self.total_cycles += m.cycles;
        self.iterations += 1;
    }

    /// Mean elapsed seconds over completed runs, `None` before the first run
    pub fn average_seconds(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.total_seconds / self.iterations as f64)
    }

    /// Mean MiB/s, `None` when there is no run or the mean elapsed time is zero
    pub fn throughput_mib_s(&self) -> Option<f64> {
        self.average_seconds()
            .and_then(|secs| crate::line::throughput_mib_s(self.data_mib, secs))
    }

    pub fn mean_cycles(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.total_cycles as f64 / self.iterations as f64
        }
    }
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<KernelReport>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Run configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub array_mib: u64,
    pub block_bytes: u64,
    pub repeat: u64,
    pub cached: bool,
    pub selection: Selection,
}

impl From<&RunConfig> for ReportConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            array_mib: config.array_mib,
            block_bytes: config.block_bytes,
            repeat: config.repeat,
            cached: config.cached,
            selection: config.selection,
        }
    }
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
    pub memory_gb: f64,
}

/// One kernel's averaged figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelReport {
    pub index: usize,
    pub description: String,
    pub strategy: Strategy,
    pub iterations: u64,
    pub average_seconds: Option<f64>,
    pub data_mib: f64,
    /// `None` when the average elapsed time was zero
    pub throughput_mib_s: Option<f64>,
    pub mean_cycles: f64,
}

impl From<&AggregateResult> for KernelReport {
    fn from(agg: &AggregateResult) -> Self {
        Self {
            index: agg.index,
            description: agg.description.clone(),
            strategy: agg.strategy,
            iterations: agg.iterations,
            average_seconds: agg.average_seconds(),
            data_mib: agg.data_mib,
            throughput_mib_s: agg.throughput_mib_s(),
            mean_cycles: agg.mean_cycles(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub kernels_run: usize,
    pub total_iterations: u64,
    /// The run was cancelled before every selected kernel finished
    pub interrupted: bool,
    pub total_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seconds: f64) -> Measurement {
        Measurement { seconds, cycles: 0 }
    }

    #[test]
    fn test_average_collapses_to_constant() {
        let mut agg = AggregateResult::new(3, "copy", Strategy::Direct, 1.0);
        for _ in 0..5 {
            agg.record(&sample(0.125));
        }
        assert_eq!(agg.iterations, 5);
        assert_eq!(agg.average_seconds(), Some(0.125));
        assert_eq!(agg.throughput_mib_s(), Some(8.0));
    }

    #[test]
    fn test_empty_aggregate() {
        let agg = AggregateResult::new(0, "copy backwards", Strategy::Direct, 1.0);
        assert_eq!(agg.average_seconds(), None);
        assert_eq!(agg.throughput_mib_s(), None);
        assert_eq!(agg.mean_cycles(), 0.0);
    }

    #[test]
    fn test_zero_elapsed_has_no_throughput() {
        let mut agg = AggregateResult::new(9, "fill", Strategy::Direct, 1.0);
        agg.record(&sample(0.0));
        assert_eq!(agg.average_seconds(), Some(0.0));
        assert_eq!(agg.throughput_mib_s(), None);

        let report = KernelReport::from(&agg);
        assert_eq!(report.throughput_mib_s, None);
    }

    #[test]
    fn test_mean_cycles() {
        let mut agg = AggregateResult::new(0, "copy", Strategy::Staged, 1.0);
        agg.record(&Measurement {
            seconds: 0.5,
            cycles: 100,
        });
        agg.record(&Measurement {
            seconds: 0.5,
            cycles: 300,
        });
        assert_eq!(agg.mean_cycles(), 200.0);
    }
}
