//! Benchmark Executor
//!
//! ## Pipeline Overview
//!
//! ```text
//!  RunConfig (validated) + BenchContext
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Repeat the timed worker per kernel, stream result lines
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report (metadata + per-kernel averages)
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - The run controller
//! - [`report`] - Report building for JSON/CSV output
//! - [`metadata`] - System metadata collection

mod execution;
mod metadata;
mod report;

pub use execution::{Executor, RunOutcome};
pub use metadata::build_report_meta;
pub use report::build_report;
