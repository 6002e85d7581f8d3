//! Kernel Registry
//!
//! A kernel is one named memory access strategy. Every kernel honors the
//! same contract: `execute(dst, src, nbytes)` touches the first `nbytes`
//! bytes of `dst` (and, for copies, of `src`) and nothing else.
//!
//! ```text
//!  index  kernel                                  family  staging
//!  -----  --------------------------------------  ------  -------
//!    0    copy backwards                          copy
//!    1    copy backwards (32 byte blocks)         copy
//!    2    copy backwards (64 byte blocks)         copy
//!    3    copy                                    copy
//!    4    copy prefetched (32 bytes step)         copy
//!    5    copy prefetched (64 bytes step)         copy
//!    6    2-pass copy                             copy      yes
//!    7    2-pass copy prefetched (32 bytes step)  copy      yes
//!    8    2-pass copy prefetched (64 bytes step)  copy      yes
//!    9    fill                                    fill
//!   10    fill (shuffle within 16 byte blocks)    fill
//!   11    fill (shuffle within 32 byte blocks)    fill
//!   12    fill (shuffle within 64 byte blocks)    fill
//!   13    standard memcpy                         copy
//!   14    fill write                              fill
//! ```

mod copy;
mod fill;

use crate::ELEMENT_BYTES;
use serde::{Deserialize, Serialize};

pub use fill::FILL_PATTERN;

/// Behavioral family of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Reads every byte of `src` and writes it to `dst`
    Copy,
    /// Writes [`FILL_PATTERN`] into `dst` without reading `src`
    Fill,
}

/// The closed set of kernel implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    CopyBackwards,
    CopyBackwardsBlock32,
    CopyBackwardsBlock64,
    Copy,
    CopyPrefetch32,
    CopyPrefetch64,
    Fill,
    FillShuffle16,
    FillShuffle32,
    FillShuffle64,
    LibraryCopy,
    LibraryFill,
}

impl Kernel {
    pub fn family(self) -> Family {
        match self {
            Kernel::Fill
            | Kernel::FillShuffle16
            | Kernel::FillShuffle32
            | Kernel::FillShuffle64
            | Kernel::LibraryFill => Family::Fill,
            _ => Family::Copy,
        }
    }

    /// Move or fill `nbytes` bytes from the start of `src` into the start of `dst`.
    ///
    /// `nbytes` must be a multiple of [`ELEMENT_BYTES`] and must not exceed
    /// either slice.
    #[inline]
    pub fn execute(self, dst: &mut [u64], src: &[u64], nbytes: usize) {
        debug_assert_eq!(nbytes % ELEMENT_BYTES, 0);
        let n = nbytes / ELEMENT_BYTES;
        let dst = &mut dst[..n];

        match self {
            Kernel::CopyBackwards => copy::backwards(dst, &src[..n]),
            Kernel::CopyBackwardsBlock32 => copy::backwards_blocks::<4>(dst, &src[..n]),
            Kernel::CopyBackwardsBlock64 => copy::backwards_blocks::<8>(dst, &src[..n]),
            Kernel::Copy => copy::forward(dst, &src[..n]),
            Kernel::CopyPrefetch32 => copy::prefetched::<4>(dst, &src[..n]),
            Kernel::CopyPrefetch64 => copy::prefetched::<8>(dst, &src[..n]),
            Kernel::LibraryCopy => dst.copy_from_slice(&src[..n]),
            Kernel::Fill => fill::sequential(dst),
            Kernel::FillShuffle16 => fill::shuffled(dst, &fill::SHUFFLE_16),
            Kernel::FillShuffle32 => fill::shuffled(dst, &fill::SHUFFLE_32),
            Kernel::FillShuffle64 => fill::shuffled(dst, &fill::SHUFFLE_64),
            Kernel::LibraryFill => dst.fill(FILL_PATTERN),
        }
    }
}

/// Immutable registry entry
#[derive(Debug, Clone, Copy)]
pub struct KernelDef {
    /// Human-readable description printed on every result line
    pub name: &'static str,
    /// Run as two passes per block through the staging buffer
    pub needs_staging: bool,
    pub kernel: Kernel,
}

impl KernelDef {
    const fn new(name: &'static str, needs_staging: bool, kernel: Kernel) -> Self {
        Self {
            name,
            needs_staging,
            kernel,
        }
    }
}

static REGISTRY: [KernelDef; 15] = [
    KernelDef::new("copy backwards", false, Kernel::CopyBackwards),
    KernelDef::new("copy backwards (32 byte blocks)", false, Kernel::CopyBackwardsBlock32),
    KernelDef::new("copy backwards (64 byte blocks)", false, Kernel::CopyBackwardsBlock64),
    KernelDef::new("copy", false, Kernel::Copy),
    KernelDef::new("copy prefetched (32 bytes step)", false, Kernel::CopyPrefetch32),
    KernelDef::new("copy prefetched (64 bytes step)", false, Kernel::CopyPrefetch64),
    KernelDef::new("2-pass copy", true, Kernel::Copy),
    KernelDef::new("2-pass copy prefetched (32 bytes step)", true, Kernel::CopyPrefetch32),
    KernelDef::new("2-pass copy prefetched (64 bytes step)", true, Kernel::CopyPrefetch64),
    KernelDef::new("fill", false, Kernel::Fill),
    KernelDef::new("fill (shuffle within 16 byte blocks)", false, Kernel::FillShuffle16),
    KernelDef::new("fill (shuffle within 32 byte blocks)", false, Kernel::FillShuffle32),
    KernelDef::new("fill (shuffle within 64 byte blocks)", false, Kernel::FillShuffle64),
    KernelDef::new("standard memcpy", false, Kernel::LibraryCopy),
    KernelDef::new("fill write", false, Kernel::LibraryFill),
];

/// All kernels in selection order
pub fn registry() -> &'static [KernelDef] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 1000;

    fn pattern_source(len: usize) -> Vec<u64> {
        (0..len as u64)
            .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15))
            .collect()
    }

    #[test]
    fn test_registry_order_and_flags() {
        let reg = registry();
        assert_eq!(reg.len(), 15);
        assert_eq!(reg[0].name, "copy backwards");
        assert_eq!(reg[14].name, "fill write");

        let staged: Vec<usize> = reg
            .iter()
            .enumerate()
            .filter(|(_, d)| d.needs_staging)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(staged, vec![6, 7, 8]);

        for def in reg.iter().filter(|d| d.needs_staging) {
            assert_eq!(def.kernel.family(), Family::Copy);
        }
    }

    #[test]
    fn test_copy_kernels_match_forward_copy() {
        let src = pattern_source(N);
        for def in registry()
            .iter()
            .filter(|d| d.kernel.family() == Family::Copy)
        {
            let mut dst = vec![0u64; N];
            def.kernel.execute(&mut dst, &src, N * ELEMENT_BYTES);
            assert_eq!(dst, src, "{} diverged from a forward copy", def.name);
        }
    }

    #[test]
    fn test_copy_kernels_partial_length() {
        // 37 elements: not a multiple of any block granularity
        let src = pattern_source(64);
        for def in registry()
            .iter()
            .filter(|d| d.kernel.family() == Family::Copy)
        {
            let mut dst = vec![0u64; 64];
            def.kernel.execute(&mut dst, &src, 37 * ELEMENT_BYTES);
            assert_eq!(&dst[..37], &src[..37], "{}", def.name);
            assert!(dst[37..].iter().all(|&v| v == 0), "{} wrote past nbytes", def.name);
        }
    }

    #[test]
    fn test_fill_kernels_write_pattern_bytes() {
        let src = pattern_source(N);
        for def in registry()
            .iter()
            .filter(|d| d.kernel.family() == Family::Fill)
        {
            let mut dst = vec![0u64; N];
            def.kernel.execute(&mut dst, &src, N * ELEMENT_BYTES);
            for v in &dst {
                assert!(
                    v.to_ne_bytes().iter().all(|&b| b == 0x55),
                    "{} left a non-pattern byte",
                    def.name
                );
            }
        }
    }

    #[test]
    fn test_fill_kernels_ignore_source() {
        let mut dst_a = vec![0u64; 77];
        let mut dst_b = vec![0u64; 77];
        for kernel in [Kernel::Fill, Kernel::FillShuffle64, Kernel::LibraryFill] {
            kernel.execute(&mut dst_a, &pattern_source(77), 77 * ELEMENT_BYTES);
            kernel.execute(&mut dst_b, &[0u64; 77], 77 * ELEMENT_BYTES);
            assert_eq!(dst_a, dst_b);
        }
    }

    #[test]
    fn test_zero_bytes_is_noop() {
        let src = pattern_source(16);
        for def in registry() {
            let mut dst = vec![7u64; 16];
            def.kernel.execute(&mut dst, &src, 0);
            assert!(dst.iter().all(|&v| v == 7), "{}", def.name);
        }
    }
}
