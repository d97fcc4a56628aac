//! Integer square root.

/// Largest `r` such that `r * r <= n`.
///
/// Digit-by-digit calculation in base 2: one result bit per iteration, at most
/// 64 iterations for any `u128`. No intermediate value exceeds `n` or `2^127`,
/// so nothing can wrap. `isqrt(0) == 0`.
pub fn isqrt(n: u128) -> u128 {
    let mut rem = n;
    let mut root = 0_u128;
    let mut bit = 1_u128 << 126;
    while bit > rem {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Vote weight for a cumulative stake.
#[inline]
pub fn vote_weight(stake: u128) -> u128 {
    isqrt(stake)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        let expected = [0, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 4];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(isqrt(n as u128), *want, "isqrt({})", n);
        }
    }

    #[test]
    fn perfect_squares_and_neighbours() {
        for r in [2u128, 3, 10, 1_000, 65_535, 1 << 32, (1 << 63) + 12345] {
            let sq = r * r;
            assert_eq!(isqrt(sq), r);
            assert_eq!(isqrt(sq - 1), r - 1);
            assert_eq!(isqrt(sq + 1), r);
        }
    }

    #[test]
    fn extremes() {
        assert_eq!(isqrt(u128::MAX), u64::MAX as u128);
        let top = (u64::MAX as u128) * (u64::MAX as u128);
        assert_eq!(isqrt(top), u64::MAX as u128);
        assert_eq!(isqrt(top - 1), u64::MAX as u128 - 1);
    }

    #[test]
    fn weight_of_stake() {
        assert_eq!(vote_weight(9), 3);
        assert_eq!(vote_weight(4 + 5), 3);
        assert_eq!(vote_weight(4) + vote_weight(5), 4);
        assert_eq!(vote_weight(100), 10);
    }
}
