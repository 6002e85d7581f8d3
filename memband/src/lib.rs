//! # memband
//!
//! Sustained memory copy and fill bandwidth benchmark.
//!
//! memband moves a large buffer through a fixed registry of access-pattern
//! kernels, times each full transfer, and reports the average bandwidth:
//! - **Copy kernels**: forward, backward, 32/64-byte blocked, prefetching
//! - **Fill kernels**: sequential and shuffled within 16/32/64-byte blocks
//! - **Three transfer strategies**: direct, 2-pass through a staging buffer,
//!   and batched library copies
//! - **Fail-fast configuration**: every precondition is checked before a
//!   single byte is committed
//!
//! ## Quick Start
//!
//! ```no_run
//! use memband::{BenchContext, CancelToken, Executor, RunConfig};
//!
//! let mut config = RunConfig::new(64);
//! config.repeat = 3;
//!
//! let mut context = BenchContext::prepare(config.clone())?;
//! let outcome = Executor::new(config, CancelToken::new())
//!     .execute(&mut context, &mut std::io::stdout())?;
//! assert!(!outcome.results.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core types
pub use memband_core::{
    BenchContext, Buffer, BufferError, BufferSet, CancelToken, ConfigError, DEFAULT_BLOCK_BYTES,
    DEFAULT_REPEAT, ELEMENT_BYTES, FILL_PATTERN, Family, Kernel, KernelDef, Measure, Measurement,
    PrepareError, RunConfig, SENTINEL, Selection, Strategy, registry, run_timed, transfer,
};

// Re-export reporting
pub use memband_report::{
    AggregateResult, OutputFormat, Report, format_average_line, format_result_line,
    generate_csv_report, generate_json_report,
};

// Re-export the run controller
pub use memband_cli::{Executor, RunOutcome, build_report};

/// Run the memband CLI harness.
///
/// ```ignore
/// fn main() {
///     memband::run().unwrap();
/// }
/// ```
pub use memband_cli::run;
