//! Bench Context
//!
//! Owns the validated configuration and the three buffers for the life of
//! the process. Validation always happens before the first byte is
//! committed.

use crate::buffer::{Buffer, BufferError, BufferSet};
use crate::config::{ConfigError, RunConfig};
use crate::kernel::KernelDef;
use crate::measure::Measurement;
use crate::worker::{Measure, Strategy, run_timed};
use thiserror::Error;

/// Failure to set up a run
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Validated configuration plus the buffers every kernel runs against
#[derive(Debug)]
pub struct BenchContext {
    config: RunConfig,
    buffers: BufferSet,
}

impl BenchContext {
    /// Validate `config`, then allocate source, destination and staging on the heap.
    pub fn prepare(config: RunConfig) -> Result<Self, PrepareError> {
        Self::prepare_with(config, Buffer::allocate)
    }

    /// Like [`BenchContext::prepare`] with a caller-supplied allocator.
    /// `alloc` is never called for a configuration that fails validation.
    pub fn prepare_with<F>(config: RunConfig, alloc: F) -> Result<Self, PrepareError>
    where
        F: FnMut(usize) -> Result<Buffer, BufferError>,
    {
        config.validate()?;
        let buffers =
            BufferSet::allocate_with(config.array_elements(), config.block_elements(), alloc)?;
        tracing::debug!(
            committed_bytes = buffers.committed_bytes(),
            "benchmark buffers committed"
        );
        Ok(Self { config, buffers })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn buffers(&self) -> &BufferSet {
        &self.buffers
    }

    /// Strategy this context applies to `def`
    pub fn strategy_for(&self, def: &KernelDef) -> Strategy {
        Strategy::select(self.config.cached, def.needs_staging)
    }
}

impl Measure for BenchContext {
    fn measure(&mut self, def: &KernelDef) -> Measurement {
        let strategy = self.strategy_for(def);
        run_timed(
            &mut self.buffers,
            self.config.block_elements(),
            strategy,
            def.kernel,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SENTINEL;
    use crate::kernel::registry;

    #[test]
    fn test_invalid_config_allocates_nothing() {
        let mut config = RunConfig::new(1);
        config.block_bytes = 4 * 1024 * 1024;

        let mut calls = 0;
        let result = BenchContext::prepare_with(config, |count| {
            calls += 1;
            Buffer::allocate(count)
        });

        assert!(matches!(
            result,
            Err(PrepareError::Config(ConfigError::BlockLargerThanArray { .. }))
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_prepare_allocates_three_buffers() {
        let mut calls = Vec::new();
        let ctx = BenchContext::prepare_with(RunConfig::new(1), |count| {
            calls.push(count);
            Buffer::allocate(count)
        })
        .unwrap();

        assert_eq!(calls, vec![131_072, 131_072, 32_768]);
        assert!(ctx.buffers().source.as_slice().iter().all(|&v| v == SENTINEL));
    }

    #[test]
    fn test_measure_uses_cached_strategy() {
        let mut config = RunConfig::new(1);
        config.cached = true;
        let mut ctx = BenchContext::prepare(config).unwrap();

        let fill = &registry()[9];
        assert_eq!(ctx.strategy_for(fill), Strategy::Batched);
        let m = ctx.measure(fill);
        assert!(m.seconds >= 0.0);
        // Batched mode copies regardless of the selected kernel
        assert!(ctx.buffers().destination.as_slice().iter().all(|&v| v == SENTINEL));
    }
}
