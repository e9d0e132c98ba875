//! Elementwise comparison of the two layouts' outputs.

use std::fmt;

use crate::error::{validation_error, Result};

/// Absolute tolerance between the row-major and column-major results.
pub const TOLERANCE: f64 = 1e-5;

/// An output entry whose layouts disagree by more than the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    /// Flat index into the row-major `m x n` output.
    pub index: usize,
    /// `c_row[index] - c_col[index]`.
    pub diff: f32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id {} has diff: {:.6}", self.index, self.diff)
    }
}

/// Scans every entry and returns those with `|c_row[i] - c_col[i]| > tolerance`,
/// in index order.
///
/// A NaN difference compares false against the tolerance and is not reported.
pub fn compare(c_row: &[f32], c_col: &[f32], tolerance: f64) -> Result<Vec<Mismatch>> {
    if c_row.len() != c_col.len() {
        return Err(validation_error(format!(
            "outputs differ in length: {} vs {}",
            c_row.len(),
            c_col.len()
        )));
    }

    Ok(c_row
        .iter()
        .zip(c_col)
        .enumerate()
        .filter_map(|(index, (&r, &c))| {
            let diff = r - c;
            (f64::from(diff.abs()) > tolerance).then_some(Mismatch { index, diff })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_outputs() {
        let c = [1.0f32, -2.5, 3.25];
        assert!(compare(&c, &c, TOLERANCE).unwrap().is_empty());
    }

    #[test]
    fn test_reports_every_mismatch_with_sign() {
        let c_row = [1.0f32, 2.0, 3.0, 4.0];
        let c_col = [1.0f32, 2.5, 3.0, 3.0];
        let mismatches = compare(&c_row, &c_col, TOLERANCE).unwrap();
        assert_eq!(
            mismatches,
            vec![
                Mismatch { index: 1, diff: -0.5 },
                Mismatch { index: 3, diff: 1.0 },
            ]
        );
    }

    #[test]
    fn test_within_tolerance_is_silent() {
        let c_row = [100.0f32];
        let c_col = [100.0f32 + 4e-6];
        assert!(compare(&c_row, &c_col, 1e-3).unwrap().is_empty());
        let c_col = [1.0f32 + 2e-6];
        assert!(compare(&[1.0], &c_col, TOLERANCE).unwrap().is_empty());
    }

    #[test]
    fn test_nan_is_not_reported() {
        assert!(compare(&[f32::NAN], &[0.0], TOLERANCE).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(compare(&[1.0, 2.0], &[1.0], TOLERANCE).is_err());
    }

    #[test]
    fn test_display_format() {
        let m = Mismatch { index: 7, diff: -1.25 };
        assert_eq!(m.to_string(), "id 7 has diff: -1.250000");
    }
}
