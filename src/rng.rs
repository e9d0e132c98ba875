//! Reproducible uniform fill for benchmark operands.

use num::{Float, NumCast};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{validation_error, Result};

/// Lower bound used when no explicit range is wanted.
pub const DEFAULT_LOWER: f64 = -20.0;
/// Upper bound used when no explicit range is wanted.
pub const DEFAULT_UPPER: f64 = 20.0;
/// Seed shared by every buffer the benchmark fills.
pub const DEFAULT_SEED: u64 = 100;

/// Overwrites `out` with values drawn uniformly from `[lower, upper]`.
///
/// A fresh generator is seeded with `seed` on every call, so two buffers
/// filled with the same seed start with the same sequence. Each value is
/// `u * (upper - lower) + lower` with `u` a double in `[0, 1)`, rounded to `T`
/// afterwards, which can land exactly on `upper`.
pub fn fill_uniform<T: Float>(out: &mut [T], lower: T, upper: T, seed: u64) -> Result<()> {
    let (lo, hi) = (to_f64(lower)?, to_f64(upper)?);
    let span = hi - lo;
    let mut rng = StdRng::seed_from_u64(seed);

    for x in out.iter_mut() {
        let u: f64 = rng.random();
        *x = <T as NumCast>::from(u * span + lo)
            .ok_or_else(|| validation_error("sample does not fit the element type"))?;
    }
    Ok(())
}

/// Returns `n` values drawn uniformly from `[lower, upper]` with `seed`.
///
/// ```rust
/// use sgemm_layout_bench::rng::random_vec;
///
/// let a = random_vec::<f32>(8, -2.0, 2.0, 100).unwrap();
/// let b = random_vec::<f32>(8, -2.0, 2.0, 100).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|x| (-2.0..=2.0).contains(x)));
/// ```
pub fn random_vec<T: Float>(n: usize, lower: T, upper: T, seed: u64) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); n];
    fill_uniform(&mut out, lower, upper, seed)?;
    Ok(out)
}

/// [`random_vec`] over `[DEFAULT_LOWER, DEFAULT_UPPER]` with `DEFAULT_SEED`.
pub fn random_vec_default<T: Float>(n: usize) -> Result<Vec<T>> {
    let lower = <T as NumCast>::from(DEFAULT_LOWER)
        .ok_or_else(|| validation_error("default lower bound does not fit the element type"))?;
    let upper = <T as NumCast>::from(DEFAULT_UPPER)
        .ok_or_else(|| validation_error("default upper bound does not fit the element type"))?;
    random_vec(n, lower, upper, DEFAULT_SEED)
}

fn to_f64<T: Float>(value: T) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| validation_error("bound is not representable as f64"))
}
