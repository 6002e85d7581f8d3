//! Fill kernels. `dst` ends up holding [`FILL_PATTERN`] in every element
//! regardless of the order the stores are issued in.

/// Value written by every fill kernel: each byte is `0x55`.
pub const FILL_PATTERN: u64 = 0x5555_5555_5555_5555;

/// Store order within a 16-byte sub-block
pub(super) const SHUFFLE_16: [usize; 2] = [1, 0];
/// Store order within a 32-byte sub-block
pub(super) const SHUFFLE_32: [usize; 4] = [1, 3, 0, 2];
/// Store order within a 64-byte sub-block
pub(super) const SHUFFLE_64: [usize; 8] = [3, 6, 1, 4, 7, 2, 5, 0];

pub(super) fn sequential(dst: &mut [u64]) {
    for d in dst.iter_mut() {
        *d = FILL_PATTERN;
    }
}

/// Fill each `N`-element sub-block in the permuted `order`; a trailing
/// partial sub-block is written sequentially.
pub(super) fn shuffled<const N: usize>(dst: &mut [u64], order: &[usize; N]) {
    let mut blocks = dst.chunks_exact_mut(N);
    for block in &mut blocks {
        for &k in order {
            block[k] = FILL_PATTERN;
        }
    }
    sequential(blocks.into_remainder());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(order: &[usize]) -> bool {
        let mut seen = vec![false; order.len()];
        for &k in order {
            if k >= order.len() || seen[k] {
                return false;
            }
            seen[k] = true;
        }
        true
    }

    #[test]
    fn test_shuffle_orders_are_permutations() {
        assert!(is_permutation(&SHUFFLE_16));
        assert!(is_permutation(&SHUFFLE_32));
        assert!(is_permutation(&SHUFFLE_64));
    }

    #[test]
    fn test_shuffled_covers_remainder() {
        let mut dst = vec![0u64; 11];
        shuffled(&mut dst, &SHUFFLE_64);
        assert!(dst.iter().all(|&v| v == FILL_PATTERN));
    }
}
