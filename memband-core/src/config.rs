//! Run Configuration
//!
//! Immutable once validated. Sizes are tracked in bytes; conversion to
//! elements always divides by [`ELEMENT_BYTES`].

use crate::ELEMENT_BYTES;
use crate::kernel::{KernelDef, registry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of timed runs per kernel
pub const DEFAULT_REPEAT: u64 = 10;

/// Default block size for the batched and staged modes, in bytes
pub const DEFAULT_BLOCK_BYTES: u64 = 262_144;

const MIB: u64 = 1024 * 1024;

/// Rejected configurations. All are detected before any memory is committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("array size wrong: must be a positive number of MiB")]
    ZeroArraySize,

    #[error("array size of {mib} MiB does not fit in memory addressing")]
    ArrayTooLarge { mib: u64 },

    #[error("what block size do you mean? block size must be positive")]
    ZeroBlockSize,

    #[error("block size of {block_bytes} bytes is not a multiple of the {element} byte element width")]
    UnalignedBlockSize { block_bytes: u64, element: usize },

    #[error("block size ({block_bytes} bytes) larger than array size ({array_bytes} bytes)")]
    BlockLargerThanArray { block_bytes: u64, array_bytes: u64 },

    #[error("test number must be between 0 and {max} (got {index})")]
    SelectionOutOfRange { index: usize, max: usize },
}

/// Which registry entries to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    All,
    Only(usize),
}

impl Selection {
    /// Absent or negative indices select every kernel.
    pub fn from_index(index: Option<i64>) -> Self {
        match index {
            Some(i) if i >= 0 => Selection::Only(i as usize),
            _ => Selection::All,
        }
    }

    pub fn includes(self, index: usize) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(i) => i == index,
        }
    }
}

/// Everything the run controller needs to know about one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Source/destination size in MiB
    pub array_mib: u64,
    /// Stride for batched and staged transfers, in bytes
    pub block_bytes: u64,
    /// Timed runs per kernel (0 = until cancelled)
    pub repeat: u64,
    /// Use the batched library-copy mode for every kernel
    pub cached: bool,
    pub selection: Selection,
    /// Emit the averaged line per kernel
    pub show_average: bool,
    /// Emit one line per timed run
    pub show_runs: bool,
}

impl RunConfig {
    /// Configuration with default repeat, block size and display policy.
    pub fn new(array_mib: u64) -> Self {
        Self {
            array_mib,
            block_bytes: DEFAULT_BLOCK_BYTES,
            repeat: DEFAULT_REPEAT,
            cached: false,
            selection: Selection::All,
            show_average: true,
            show_runs: false,
        }
    }

    /// Check every precondition the worker relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.array_mib == 0 {
            return Err(ConfigError::ZeroArraySize);
        }
        let array_bytes = self.checked_array_bytes()?;
        if self.block_bytes == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.block_bytes % ELEMENT_BYTES as u64 != 0 {
            return Err(ConfigError::UnalignedBlockSize {
                block_bytes: self.block_bytes,
                element: ELEMENT_BYTES,
            });
        }
        if self.block_bytes > array_bytes {
            return Err(ConfigError::BlockLargerThanArray {
                block_bytes: self.block_bytes,
                array_bytes,
            });
        }
        if let Selection::Only(index) = self.selection {
            let count = registry().len();
            if index >= count {
                return Err(ConfigError::SelectionOutOfRange {
                    index,
                    max: count - 1,
                });
            }
        }
        Ok(())
    }

    fn checked_array_bytes(&self) -> Result<u64, ConfigError> {
        self.array_mib
            .checked_mul(MIB)
            .filter(|&bytes| usize::try_from(bytes).is_ok_and(|b| b <= isize::MAX as usize))
            .ok_or(ConfigError::ArrayTooLarge {
                mib: self.array_mib,
            })
    }

    pub fn array_bytes(&self) -> usize {
        (self.array_mib * MIB) as usize
    }

    pub fn array_elements(&self) -> usize {
        self.array_bytes() / ELEMENT_BYTES
    }

    pub fn block_elements(&self) -> usize {
        self.block_bytes as usize / ELEMENT_BYTES
    }

    /// Data volume of one transfer in MiB
    pub fn data_mib(&self) -> f64 {
        self.array_mib as f64
    }

    /// Registry entries this configuration runs, with their indices
    pub fn selected_kernels(&self) -> impl Iterator<Item = (usize, &'static KernelDef)> + '_ {
        registry()
            .iter()
            .enumerate()
            .filter(|(i, _)| self.selection.includes(*i))
    }
}
