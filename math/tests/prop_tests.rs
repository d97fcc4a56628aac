use proptest::prelude::*;

use qv_math::isqrt;

/// Babylonian iteration, used only as an independent oracle.
fn newton_sqrt(n: u128) -> u128 {
    if n <= 1 {
        return n;
    }
    let mut x0 = n / 2;
    let mut x1 = (x0 + n / x0) / 2;
    while x1 < x0 {
        x0 = x1;
        x1 = (x0 + n / x0) / 2;
    }
    x0
}

fn brackets(n: u128, r: u128) -> bool {
    let lower_ok = r.checked_mul(r).is_some_and(|sq| sq <= n);
    let upper_ok = match (r + 1).checked_mul(r + 1) {
        Some(sq) => n < sq,
        None => true,
    };
    lower_ok && upper_ok
}

proptest! {
    /// isqrt(n)^2 <= n < (isqrt(n)+1)^2 over the full u128 range.
    #[test]
    fn isqrt_brackets_full_range(n in any::<u128>()) {
        prop_assert!(brackets(n, isqrt(n)), "n={}", n);
    }

    /// Same property concentrated on small inputs.
    #[test]
    fn isqrt_brackets_small(n in 0u128..1_000_000) {
        prop_assert!(brackets(n, isqrt(n)), "n={}", n);
    }

    /// Large perfect squares and their neighbours, where f64 would go wrong.
    #[test]
    fn isqrt_exact_near_large_squares(r in (1u128 << 53)..(u64::MAX as u128)) {
        let sq = r * r;
        prop_assert_eq!(isqrt(sq), r);
        prop_assert_eq!(isqrt(sq - 1), r - 1);
    }

    /// Agrees with Newton's method.
    #[test]
    fn isqrt_matches_newton(n in any::<u128>()) {
        prop_assert_eq!(isqrt(n), newton_sqrt(n));
    }

    /// Monotonic: more stake never yields less weight.
    #[test]
    fn isqrt_monotonic(a in any::<u128>(), b in any::<u128>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(isqrt(lo) <= isqrt(hi));
    }

    /// Weight of a cumulative stake never exceeds the sum of the parts' weights.
    #[test]
    fn cumulative_weight_is_subadditive(s1 in 1u128..u64::MAX as u128, s2 in 1u128..u64::MAX as u128) {
        prop_assert!(isqrt(s1 + s2) <= isqrt(s1) + isqrt(s2));
    }
}
