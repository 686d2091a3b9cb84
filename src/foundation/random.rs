//! Draw helpers over an explicitly threaded random source.
//!
//! Every stochastic stage takes `&mut R where R: Rng + ?Sized`; nothing in the crate
//! reaches for a global or thread-local generator. The helpers fix how each kind of draw
//! consumes the stream, which is what makes a seed reproduce a run.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generator type used for whole runs and per-sample streams.
pub type SynthRng = StdRng;

/// Seeded generator.
pub fn seeded(seed: u64) -> SynthRng {
    StdRng::seed_from_u64(seed)
}

/// Continuous draw from `[lo, hi]`; a collapsed or inverted range returns `lo` after
/// still consuming one value.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    let u: f64 = rng.random();
    if hi <= lo {
        return lo;
    }
    lo + (hi - lo) * u
}

/// Integer draw from the inclusive range `[lo, hi]`.
pub(crate) fn int_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        let _: u64 = rng.random();
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Bernoulli draw that is true with probability `p`.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Uniform index into a non-empty collection of `len` items.
pub(crate) fn index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    rng.random_range(0..len)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
