use log::trace;

use super::{strides, GemmCall, Sgemm, Transpose};
use crate::error::{validation_error, Result};

/// Runs calls on `matrixmultiply::sgemm`, which takes arbitrary row and
/// column strides instead of a layout flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatrixMultiplyKernel;

impl MatrixMultiplyKernel {
    pub fn new() -> Self {
        Self
    }
}

impl Sgemm for MatrixMultiplyKernel {
    fn name(&self) -> &'static str {
        "matrixmultiply"
    }

    fn sgemm(&self, call: &GemmCall, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
        call.validate(a.len(), b.len(), c.len())?;

        let (rsa, csa) = op_strides(call, call.lda, call.trans_a)?;
        let (rsb, csb) = op_strides(call, call.ldb, call.trans_b)?;
        let (rsc, csc) = op_strides(call, call.ldc, Transpose::NoTrans)?;
        trace!(
            "sgemm {:?} m={} n={} k={} strides a=({rsa},{csa}) b=({rsb},{csb}) c=({rsc},{csc})",
            call.layout,
            call.m,
            call.n,
            call.k
        );

        // SAFETY: validate() proved every index reachable through these
        // strides lies inside the corresponding slice, and `c` is borrowed
        // mutably so it cannot alias `a` or `b`.
        unsafe {
            ::matrixmultiply::sgemm(
                call.m,
                call.k,
                call.n,
                call.alpha,
                a.as_ptr(),
                rsa,
                csa,
                b.as_ptr(),
                rsb,
                csb,
                call.beta,
                c.as_mut_ptr(),
                rsc,
                csc,
            );
        }
        Ok(())
    }
}

/// Strides of `op(X)`: a transpose swaps the row and column strides of the
/// stored matrix.
fn op_strides(call: &GemmCall, ld: usize, trans: Transpose) -> Result<(isize, isize)> {
    let (rs, cs) = strides(call.layout, ld);
    let (rs, cs) = match trans {
        Transpose::NoTrans => (rs, cs),
        Transpose::Trans => (cs, rs),
    };
    let to_isize = |s: usize| {
        isize::try_from(s).map_err(|_| validation_error(format!("stride {s} overflows isize")))
    };
    Ok((to_isize(rs)?, to_isize(cs)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // A = [[1, 2, 3],
    //      [4, 5, 6]]
    // B = [[7, 8],
    //      [9, 10],
    //      [11, 12]]
    // A * B = [[58, 64],
    //          [139, 154]]
    const A: [f32; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const B: [f32; 6] = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
    const AB: [f32; 4] = [58.0, 64.0, 139.0, 154.0];

    #[test]
    fn test_row_major_known_product() {
        let call = GemmCall::row_major(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans);
        let mut c = [0.0f32; 4];
        MatrixMultiplyKernel.sgemm(&call, &A, &B, &mut c).unwrap();
        assert_eq!(c, AB);
    }

    #[test]
    fn test_col_major_swapped_known_product() {
        let call = GemmCall::col_major_swapped(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans);
        let mut c = [0.0f32; 4];
        MatrixMultiplyKernel.sgemm(&call, &B, &A, &mut c).unwrap();
        assert_eq!(c, AB);
    }

    #[test]
    fn test_transposed_operands() {
        // A^T stored row-major (3 x 2), B^T stored row-major (2 x 3)
        let a_t = [1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0];
        let b_t = [7.0f32, 9.0, 11.0, 8.0, 10.0, 12.0];
        let call = GemmCall::row_major(2, 2, 3, Transpose::Trans, Transpose::Trans);
        let mut c = [0.0f32; 4];
        MatrixMultiplyKernel.sgemm(&call, &a_t, &b_t, &mut c).unwrap();
        assert_eq!(c, AB);
    }

    #[test]
    fn test_alpha_beta_accumulate() {
        let call = GemmCall::row_major(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans)
            .with_scalars(2.0, 1.0);
        let mut c = [1.0f32; 4];
        MatrixMultiplyKernel.sgemm(&call, &A, &B, &mut c).unwrap();
        assert_eq!(c, [117.0, 129.0, 279.0, 309.0]);
    }

    #[test]
    fn test_rejects_short_output() {
        let call = GemmCall::row_major(2, 2, 3, Transpose::NoTrans, Transpose::NoTrans);
        let mut c = [0.0f32; 3];
        assert!(MatrixMultiplyKernel.sgemm(&call, &A, &B, &mut c).is_err());
    }
}
