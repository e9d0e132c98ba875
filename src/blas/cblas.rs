use std::os::raw::c_int;

use cblas_sys::{cblas_sgemm, CBLAS_ORDER, CBLAS_TRANSPOSE};

use super::{GemmCall, Layout, Sgemm, Transpose};
use crate::error::{validation_error, Result};

/// Forwards calls to the CBLAS linked by `build.rs` (OpenBLAS by default,
/// Accelerate on macOS, or `$SGEMM_BENCH_BLAS_LIB`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CblasKernel;

impl CblasKernel {
    pub fn new() -> Self {
        Self
    }
}

impl Sgemm for CblasKernel {
    fn name(&self) -> &'static str {
        "cblas"
    }

    fn sgemm(&self, call: &GemmCall, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
        call.validate(a.len(), b.len(), c.len())?;

        let layout = match call.layout {
            Layout::RowMajor => CBLAS_ORDER::CblasRowMajor,
            Layout::ColMajor => CBLAS_ORDER::CblasColMajor,
        };

        // SAFETY: validate() bounds every access by the slice lengths and the
        // dimensions were checked to fit a C int.
        unsafe {
            cblas_sgemm(
                layout,
                transpose(call.trans_a),
                transpose(call.trans_b),
                to_c_int("m", call.m)?,
                to_c_int("n", call.n)?,
                to_c_int("k", call.k)?,
                call.alpha,
                a.as_ptr(),
                to_c_int("lda", call.lda)?,
                b.as_ptr(),
                to_c_int("ldb", call.ldb)?,
                call.beta,
                c.as_mut_ptr(),
                to_c_int("ldc", call.ldc)?,
            );
        }
        Ok(())
    }
}

fn transpose(trans: Transpose) -> CBLAS_TRANSPOSE {
    match trans {
        Transpose::NoTrans => CBLAS_TRANSPOSE::CblasNoTrans,
        Transpose::Trans => CBLAS_TRANSPOSE::CblasTrans,
    }
}

fn to_c_int(name: &str, value: usize) -> Result<c_int> {
    c_int::try_from(value)
        .map_err(|_| validation_error(format!("{name}={value} does not fit a C int")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_overflow_is_rejected() {
        assert!(to_c_int("m", usize::MAX).is_err());
        assert_eq!(to_c_int("m", 1221).unwrap(), 1221);
    }

    #[test]
    fn test_row_and_col_agree() {
        let a = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [7.0f32, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut c_row = [0.0f32; 4];
        let mut c_col = [0.0f32; 4];

        let row = GemmCall::row_major(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans);
        let col = GemmCall::col_major_swapped(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans);
        CblasKernel.sgemm(&row, &a, &b, &mut c_row).unwrap();
        CblasKernel.sgemm(&col, &b, &a, &mut c_col).unwrap();

        assert_eq!(c_row, [58.0, 64.0, 139.0, 154.0]);
        assert_eq!(c_row, c_col);
    }
}
