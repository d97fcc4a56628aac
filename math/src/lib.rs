//! Integer-only arithmetic for quadratic voting.
//!
//! A voter's influence is `⌊√stake⌋`. Everything here is pure integer
//! arithmetic over `u128`: floating point loses precision near large perfect
//! squares and the host environment may not provide it at all.

pub mod sqrt;

pub use sqrt::{isqrt, vote_weight};
