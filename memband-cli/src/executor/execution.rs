//! Run Controller
//!
//! Repeats the timed worker for every selected kernel, folds the samples
//! into an [`AggregateResult`] and streams result lines as it goes.
//!
//! ## Data Flow
//!
//! ```text
//!   RunConfig + CancelToken
//!          │
//!          ▼
//!   ┌──────────────┐  for each selected kernel
//!   │   Executor   │  repeat × Measure::measure ──▶ AggregateResult
//!   └──────┬───────┘
//!          │ per-run / AVG lines (optional)
//!          ▼
//!      RunOutcome
//! ```
//!
//! Cancellation is only observed between timed runs. The kernel that was
//! running keeps the runs it completed; later kernels are skipped.

use memband_core::{CancelToken, Measure, RunConfig, Strategy};
use memband_report::{AggregateResult, format_average_line, format_run_line};
use std::io::{self, Write};

/// Everything a finished (or interrupted) run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// One aggregate per kernel that completed at least one run, in registry order
    pub results: Vec<AggregateResult>,
    /// Cancellation cut the run short
    pub interrupted: bool,
}

/// Drives a [`Measure`] implementation through the configured kernels
pub struct Executor {
    config: RunConfig,
    cancel: CancelToken,
}

impl Executor {
    /// Create an executor for `config` that stops when `cancel` fires
    pub fn new(config: RunConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// Run every selected kernel `repeat` times (or until cancelled when
    /// `repeat` is 0), writing result lines to `out`.
    pub fn execute<M, W>(&self, worker: &mut M, out: &mut W) -> io::Result<RunOutcome>
    where
        M: Measure,
        W: Write,
    {
        let config = &self.config;
        let data_mib = config.data_mib();
        let mut results = Vec::new();

        for (index, def) in config.selected_kernels() {
            if self.cancel.is_cancelled() {
                break;
            }

            let strategy = Strategy::select(config.cached, def.needs_staging);
            tracing::info!(index, kernel = def.name, ?strategy, "running kernel");

            let mut agg = AggregateResult::new(index, def.name, strategy, data_mib);
            let mut iteration = 0u64;
            while config.repeat == 0 || iteration < config.repeat {
                if self.cancel.is_cancelled() {
                    break;
                }
                let m = worker.measure(def);
                tracing::debug!(
                    kernel = def.name,
                    iteration,
                    seconds = m.seconds,
                    cycles = m.cycles,
                    "timed run"
                );
                if m.seconds == 0.0 {
                    tracing::warn!(
                        kernel = def.name,
                        iteration,
                        "run finished below timer resolution"
                    );
                }
                agg.record(&m);
                if config.show_runs {
                    writeln!(out, "{}", format_run_line(iteration, def.name, &m, data_mib))?;
                }
                iteration += 1;
            }

            if agg.iterations == 0 {
                break;
            }
            if config.show_average {
                if let Some(line) = format_average_line(&agg) {
                    writeln!(out, "{}", line)?;
                }
            }
            out.flush()?;
            results.push(agg);
        }

        let interrupted = self.cancel.is_cancelled();
        if interrupted {
            tracing::warn!(completed = results.len(), "run interrupted");
        }
        Ok(RunOutcome {
            results,
            interrupted,
        })
    }
}
