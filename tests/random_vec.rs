//! Statistical and reproducibility checks for the operand generator.

use sgemm_layout_bench::rng::{fill_uniform, random_vec, DEFAULT_SEED};
use statrs::statistics::Statistics;

#[test]
fn test_bit_identical_across_calls() {
    for n in [1, 17, 1221, 1221 * 4] {
        let first = random_vec::<f32>(n, -2.0, 2.0, DEFAULT_SEED).unwrap();
        let second = random_vec::<f32>(n, -2.0, 2.0, DEFAULT_SEED).unwrap();
        assert!(
            first.iter().zip(&second).all(|(x, y)| x.to_bits() == y.to_bits()),
            "sequence of length {n} is not reproducible"
        );
    }
}

#[test]
fn test_fill_matches_random_vec() {
    let expected = random_vec::<f64>(256, -5.0, 3.0, 42).unwrap();
    let mut buf = vec![0.0f64; 256];
    fill_uniform(&mut buf, -5.0, 3.0, 42).unwrap();
    assert_eq!(buf, expected);
}

#[test]
fn test_values_within_bounds() {
    let ranges = [(-2.0f32, 2.0f32), (-20.0, 20.0), (0.0, 1.0), (-1e-3, 1e-3), (3.0, 7.5)];
    for (lower, upper) in ranges {
        let values = random_vec::<f32>(10_000, lower, upper, DEFAULT_SEED).unwrap();
        for &x in &values {
            assert!(x >= lower && x <= upper, "{x} outside [{lower}, {upper}]");
        }
    }
}

#[test]
fn test_uniform_moments() {
    let values: Vec<f64> = random_vec::<f32>(100_000, -2.0, 2.0, DEFAULT_SEED)
        .unwrap()
        .into_iter()
        .map(f64::from)
        .collect();

    // U(-2, 2): mean 0, variance (b - a)^2 / 12 = 4/3
    let mean = values.iter().mean();
    let variance = values.iter().variance();
    assert!(mean.abs() < 0.02, "mean {mean}");
    assert!((variance - 4.0 / 3.0).abs() < 0.02, "variance {variance}");

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(min < -1.99 && max > 1.99, "range [{min}, {max}] not covered");
}
