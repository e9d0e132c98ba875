//! CBLAS-shaped description of an `sgemm` call and the kernels that run it.
//!
//! The benchmark never multiplies matrices itself. It describes a call with
//! [`GemmCall`] (layout, transposes, dimensions, leading dimensions, scalars)
//! and hands the operands to an [`Sgemm`] implementation:
//!
//! - [`MatrixMultiplyKernel`] (default) runs on the `matrixmultiply` crate.
//! - [`CblasKernel`] (feature `cblas`) runs on whatever CBLAS the binary links.

pub mod matrixmultiply;

#[cfg(feature = "cblas")]
pub mod cblas;

use crate::error::{validation_error, Result};

pub use self::matrixmultiply::MatrixMultiplyKernel;

#[cfg(feature = "cblas")]
pub use self::cblas::CblasKernel;

/// Backend chosen at compile time.
#[cfg(not(feature = "cblas"))]
pub type DefaultKernel = MatrixMultiplyKernel;
#[cfg(feature = "cblas")]
pub type DefaultKernel = CblasKernel;

/// Storage order of every matrix in a call.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    RowMajor = 101,
    ColMajor = 102,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans = 111,
    Trans = 112,
}

impl Transpose {
    pub fn from_flag(transposed: bool) -> Self {
        if transposed {
            Transpose::Trans
        } else {
            Transpose::NoTrans
        }
    }
}

/// Every argument of `cblas_sgemm` except the three buffers.
///
/// Computes `C := alpha * op(A) * op(B) + beta * C` with `op(A)` of shape
/// `m x k`, `op(B)` of shape `k x n` and `C` of shape `m x n`, all stored in
/// `layout` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmCall {
    pub layout: Layout,
    pub trans_a: Transpose,
    pub trans_b: Transpose,
    pub m: usize,
    pub n: usize,
    pub k: usize,
    pub alpha: f32,
    pub lda: usize,
    pub ldb: usize,
    pub beta: f32,
    pub ldc: usize,
}

impl GemmCall {
    /// `C(m x n) = A(m x k) * B(k x n)` with all three buffers row-major.
    ///
    /// Leading dimensions follow the transpose flags: `lda` is `k` for a plain
    /// A and `m` for a transposed one, `ldb` is `n` or `k`, `ldc` is `n`.
    pub fn row_major(m: usize, n: usize, k: usize, trans_a: Transpose, trans_b: Transpose) -> Self {
        Self {
            layout: Layout::RowMajor,
            trans_a,
            trans_b,
            m,
            n,
            k,
            alpha: 1.0,
            lda: row_major_ld_a(m, k, trans_a),
            ldb: row_major_ld_b(n, k, trans_b),
            beta: 0.0,
            ldc: n.max(1),
        }
    }

    /// The column-major call that writes the same row-major `C` as
    /// [`GemmCall::row_major`] on the same buffers.
    ///
    /// A row-major `m x n` matrix is a column-major `n x m` one, so this asks
    /// for `C^T = op(B)^T * op(A)^T`: dimensions become `(n, m, k)` and B must
    /// be passed as the first operand and A as the second. The transpose flag
    /// and leading dimension travel with their operand.
    pub fn col_major_swapped(
        m: usize,
        n: usize,
        k: usize,
        trans_a: Transpose,
        trans_b: Transpose,
    ) -> Self {
        Self {
            layout: Layout::ColMajor,
            trans_a: trans_b,
            trans_b: trans_a,
            m: n,
            n: m,
            k,
            alpha: 1.0,
            lda: row_major_ld_b(n, k, trans_b),
            ldb: row_major_ld_a(m, k, trans_a),
            beta: 0.0,
            ldc: n.max(1),
        }
    }

    pub fn with_scalars(mut self, alpha: f32, beta: f32) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Checks leading dimensions and buffer lengths against the region the
    /// call addresses.
    pub fn validate(&self, a_len: usize, b_len: usize, c_len: usize) -> Result<()> {
        let (a_rows, a_cols) = stored_dims(self.m, self.k, self.trans_a);
        let (b_rows, b_cols) = stored_dims(self.k, self.n, self.trans_b);

        check_operand("A", self.layout, a_rows, a_cols, self.lda, a_len)?;
        check_operand("B", self.layout, b_rows, b_cols, self.ldb, b_len)?;
        check_operand("C", self.layout, self.m, self.n, self.ldc, c_len)
    }
}

/// A dense single-precision GEMM backend.
pub trait Sgemm {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Runs `call` on `a`, `b` and `c`. Implementations validate `call`
    /// against the buffer lengths before touching memory.
    fn sgemm(&self, call: &GemmCall, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()>;
}

impl<K: Sgemm + ?Sized> Sgemm for &K {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn sgemm(&self, call: &GemmCall, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
        (**self).sgemm(call, a, b, c)
    }
}

// Leading dimensions never drop below 1, so empty shapes stay valid calls.
fn row_major_ld_a(m: usize, k: usize, trans_a: Transpose) -> usize {
    match trans_a {
        Transpose::NoTrans => k.max(1),
        Transpose::Trans => m.max(1),
    }
}

fn row_major_ld_b(n: usize, k: usize, trans_b: Transpose) -> usize {
    match trans_b {
        Transpose::NoTrans => n.max(1),
        Transpose::Trans => k.max(1),
    }
}

/// Shape of the matrix as it sits in memory, before `op()` is applied.
fn stored_dims(rows: usize, cols: usize, trans: Transpose) -> (usize, usize) {
    match trans {
        Transpose::NoTrans => (rows, cols),
        Transpose::Trans => (cols, rows),
    }
}

/// `(row stride, column stride)` of a stored matrix.
pub(crate) fn strides(layout: Layout, ld: usize) -> (usize, usize) {
    match layout {
        Layout::RowMajor => (ld, 1),
        Layout::ColMajor => (1, ld),
    }
}

fn check_operand(
    name: &str,
    layout: Layout,
    rows: usize,
    cols: usize,
    ld: usize,
    len: usize,
) -> Result<()> {
    let (outer, inner) = match layout {
        Layout::RowMajor => (rows, cols),
        Layout::ColMajor => (cols, rows),
    };

    if ld < inner.max(1) {
        return Err(validation_error(format!(
            "leading dimension of {name} is {ld}, must be at least {}",
            inner.max(1)
        )));
    }
    if outer == 0 || inner == 0 {
        return Ok(());
    }

    let required = (outer - 1)
        .checked_mul(ld)
        .and_then(|x| x.checked_add(inner))
        .ok_or_else(|| validation_error(format!("{name} extent overflows usize")))?;
    if len < required {
        return Err(validation_error(format!(
            "{name} holds {len} elements, call addresses {required}"
        )));
    }
    Ok(())
}
