//! Copy kernels. Every variant leaves `dst` equal to `src`; only the
//! traversal order and step width differ.

/// How far ahead of the read cursor the prefetching kernels reach, in elements (256 bytes).
const PREFETCH_DISTANCE: usize = 32;

pub(super) fn forward(dst: &mut [u64], src: &[u64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = *s;
    }
}

pub(super) fn backwards(dst: &mut [u64], src: &[u64]) {
    for (d, s) in dst.iter_mut().zip(src).rev() {
        *d = *s;
    }
}

/// Walk from the end in blocks of `N` elements; the leading partial block goes last.
pub(super) fn backwards_blocks<const N: usize>(dst: &mut [u64], src: &[u64]) {
    let mut dst_blocks = dst.rchunks_exact_mut(N);
    let mut src_blocks = src.rchunks_exact(N);
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        for k in (0..N).rev() {
            d[k] = s[k];
        }
    }
    backwards(dst_blocks.into_remainder(), src_blocks.remainder());
}

/// Forward copy in blocks of `N` elements, hinting the line
/// [`PREFETCH_DISTANCE`] elements ahead before each block.
pub(super) fn prefetched<const N: usize>(dst: &mut [u64], src: &[u64]) {
    let mut dst_blocks = dst.chunks_exact_mut(N);
    let mut src_blocks = src.chunks_exact(N);
    let mut offset = 0;
    for (d, s) in (&mut dst_blocks).zip(&mut src_blocks) {
        if let Some(ahead) = src.get(offset + PREFETCH_DISTANCE) {
            prefetch(ahead);
        }
        d.copy_from_slice(s);
        offset += N;
    }
    forward(dst_blocks.into_remainder(), src_blocks.remainder());
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn prefetch(line: &u64) {
    use std::arch::x86_64::{_MM_HINT_NTA, _mm_prefetch};
    // SAFETY: PREFETCHNTA is a hint on a valid reference and never faults.
    unsafe { _mm_prefetch::<_MM_HINT_NTA>(line as *const u64 as *const i8) }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn prefetch(line: &u64) {
    let _ = std::hint::black_box(line);
}
