//! memband Core - Benchmark Engine
//!
//! This crate provides everything that touches memory during a run:
//! - Sentinel-filled buffers committed up front ([`Buffer`], [`BufferSet`])
//! - The kernel registry and the copy/fill kernels ([`registry`], [`Kernel`])
//! - The timed worker and its three transfer strategies ([`run_timed`], [`Strategy`])
//! - Run configuration, validation and cancellation

mod buffer;
mod cancel;
mod config;
mod context;
mod kernel;
mod measure;
mod worker;

pub use buffer::{Buffer, BufferError, BufferSet, SENTINEL};
pub use cancel::CancelToken;
pub use config::{ConfigError, DEFAULT_BLOCK_BYTES, DEFAULT_REPEAT, RunConfig, Selection};
pub use context::{BenchContext, PrepareError};
pub use kernel::{FILL_PATTERN, Family, Kernel, KernelDef, registry};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, measurements carry 0 cycles.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{Measurement, Timer};
pub use worker::{Measure, Strategy, run_timed, transfer};

/// Width of one buffer element in bytes
pub const ELEMENT_BYTES: usize = std::mem::size_of::<u64>();
