//! Timed Worker
//!
//! Drives one kernel across the whole buffer exactly once and returns the
//! elapsed time. Three mutually exclusive strategies:
//!
//! ```text
//!  Batched  src ──block──▶ dst   library copy per block, remainder last;
//!                                the kernel is not consulted
//!  Staged   src ──block──▶ staging ──block──▶ dst
//!                                kernel runs twice per block; the last
//!                                block is clamped to what is left
//!  Direct   src ─────────────────▶ dst   one kernel call over the span
//! ```

use crate::buffer::BufferSet;
use crate::kernel::{Kernel, KernelDef};
use crate::measure::{Measurement, Timer};
use crate::ELEMENT_BYTES;
use serde::{Deserialize, Serialize};

/// How a transfer is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Batched,
    Staged,
    Direct,
}

impl Strategy {
    /// Batched mode wins over everything; otherwise the kernel's staging flag decides.
    pub fn select(cached: bool, needs_staging: bool) -> Self {
        if cached {
            Strategy::Batched
        } else if needs_staging {
            Strategy::Staged
        } else {
            Strategy::Direct
        }
    }
}

/// Anything that can produce one timing sample for a kernel.
///
/// The run controller only sees this trait, so averaging can be exercised
/// with a deterministic source.
pub trait Measure {
    fn measure(&mut self, def: &KernelDef) -> Measurement;
}

/// Perform one full transfer without timing it.
///
/// `block_elements` must be non-zero and no larger than the source buffer.
pub fn transfer(buffers: &mut BufferSet, block_elements: usize, strategy: Strategy, kernel: Kernel) {
    let BufferSet {
        source,
        destination,
        staging,
    } = buffers;
    let src = source.as_slice();
    let dst = destination.as_mut_slice();

    match strategy {
        Strategy::Batched => {
            let mut dst_blocks = dst.chunks_exact_mut(block_elements);
            let mut src_blocks = src.chunks_exact(block_elements);
            for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
                d.copy_from_slice(s);
            }
            dst_blocks
                .into_remainder()
                .copy_from_slice(src_blocks.remainder());
        }
        Strategy::Staged => {
            let staging = staging.as_mut_slice();
            let mut offset = 0;
            while offset < src.len() {
                let len = block_elements.min(src.len() - offset);
                let nbytes = len * ELEMENT_BYTES;
                kernel.execute(staging, &src[offset..], nbytes);
                kernel.execute(&mut dst[offset..], staging, nbytes);
                offset += len;
            }
        }
        Strategy::Direct => {
            kernel.execute(dst, src, src.len() * ELEMENT_BYTES);
        }
    }
}

/// Time one full transfer. The timer brackets only the transfer itself.
pub fn run_timed(
    buffers: &mut BufferSet,
    block_elements: usize,
    strategy: Strategy,
    kernel: Kernel,
) -> Measurement {
    let timer = Timer::start();
    transfer(buffers, block_elements, strategy, kernel);
    let measurement = timer.stop();
    let _ = std::hint::black_box(buffers.destination.as_slice());
    measurement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::kernel::{FILL_PATTERN, Family, registry};

    fn buffers(array: usize, block: usize) -> BufferSet {
        let mut set = BufferSet::allocate(array, block).unwrap();
        for (i, v) in set.source.as_mut_slice().iter_mut().enumerate() {
            *v = ((i as u64) << 3) | 1;
        }
        set
    }

    fn reset_destination(set: &mut BufferSet) {
        set.destination.as_mut_slice().fill(0);
    }

    #[test]
    fn test_strategy_select() {
        assert_eq!(Strategy::select(true, true), Strategy::Batched);
        assert_eq!(Strategy::select(true, false), Strategy::Batched);
        assert_eq!(Strategy::select(false, true), Strategy::Staged);
        assert_eq!(Strategy::select(false, false), Strategy::Direct);
    }

    #[test]
    fn test_batched_matches_direct_for_copies() {
        let mut set = buffers(1000, 64);
        for def in registry()
            .iter()
            .filter(|d| d.kernel.family() == Family::Copy)
        {
            reset_destination(&mut set);
            transfer(&mut set, 64, Strategy::Direct, def.kernel);
            let direct = set.destination.as_slice().to_vec();

            reset_destination(&mut set);
            transfer(&mut set, 64, Strategy::Batched, def.kernel);
            assert_eq!(set.destination.as_slice(), &direct[..], "{}", def.name);
        }
    }

    #[test]
    fn test_batched_ignores_kernel() {
        let mut set = buffers(100, 30);
        transfer(&mut set, 30, Strategy::Batched, Kernel::Fill);
        assert_eq!(set.destination.as_slice(), set.source.as_slice());
    }

    #[test]
    fn test_staged_matches_direct_dividing_block() {
        let mut set = buffers(1024, 128);
        for def in registry() {
            reset_destination(&mut set);
            transfer(&mut set, 128, Strategy::Direct, def.kernel);
            let direct = set.destination.as_slice().to_vec();

            reset_destination(&mut set);
            transfer(&mut set, 128, Strategy::Staged, def.kernel);
            assert_eq!(set.destination.as_slice(), &direct[..], "{}", def.name);
        }
    }

    #[test]
    fn test_staged_clamps_final_block() {
        // 1000 = 7 * 136 + 48: the last stride carries 48 elements
        let mut set = buffers(1000, 136);
        for def in registry().iter().filter(|d| d.needs_staging) {
            reset_destination(&mut set);
            transfer(&mut set, 136, Strategy::Staged, def.kernel);
            assert_eq!(set.destination.as_slice(), set.source.as_slice(), "{}", def.name);
        }

        reset_destination(&mut set);
        transfer(&mut set, 136, Strategy::Staged, Kernel::FillShuffle32);
        assert!(set.destination.as_slice().iter().all(|&v| v == FILL_PATTERN));
    }

    #[test]
    fn test_staged_leaves_last_block_in_staging() {
        let mut set = buffers(100, 40);
        transfer(&mut set, 40, Strategy::Staged, Kernel::Copy);
        // Final stride was 20 elements starting at offset 80
        assert_eq!(&set.staging.as_slice()[..20], &set.source.as_slice()[80..]);
    }

    #[test]
    fn test_run_timed_reports_nonnegative() {
        let mut set = BufferSet {
            source: Buffer::allocate(4096).unwrap(),
            destination: Buffer::allocate(4096).unwrap(),
            staging: Buffer::allocate(512).unwrap(),
        };
        let m = run_timed(&mut set, 512, Strategy::Direct, Kernel::LibraryCopy);
        assert!(m.seconds >= 0.0);
        assert_eq!(set.destination.as_slice(), set.source.as_slice());
    }
}
