#![no_main]

use libfuzzer_sys::fuzz_target;

use qv_math::isqrt;

// r = isqrt(n) must satisfy r^2 <= n < (r+1)^2 for every u128.
fuzz_target!(|n: u128| {
    let r = isqrt(n);
    assert!(r.checked_mul(r).is_some_and(|sq| sq <= n));
    if let Some(sq) = (r + 1).checked_mul(r + 1) {
        assert!(n < sq);
    }
});
