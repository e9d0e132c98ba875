//! The benchmark itself: allocate, fill, warm up, time both layouts, compare.

use std::fmt;

use log::{debug, info, warn};

use crate::aligned::AlignedBuffer;
use crate::blas::{GemmCall, Sgemm, Transpose};
use crate::error::{validation_error, Result};
use crate::rng::{fill_uniform, DEFAULT_SEED};
use crate::timer::{repeat, time_repeated};
use crate::validate::{compare, Mismatch, TOLERANCE};
use crate::{
    DEFAULT_BURNING_COUNT, DEFAULT_K, DEFAULT_LOOP_COUNT, DEFAULT_M, DEFAULT_N, FILL_LOWER,
    FILL_UPPER, MEM_ALIGNMENT,
};

/// Neither operand is transposed in either layout.
const TRANS_A: bool = false;
const TRANS_B: bool = false;

/// `A(m x k) * B(k x n) = C(m x n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}

impl Shape {
    pub fn new(m: usize, n: usize, k: usize) -> Self {
        Self { m, n, k }
    }

    fn elements(rows: usize, cols: usize) -> Result<usize> {
        rows.checked_mul(cols)
            .ok_or_else(|| validation_error(format!("{rows} x {cols} elements overflow usize")))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={}, n={}, k={}", self.m, self.n, self.k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub shape: Shape,
    /// Timed calls per layout.
    pub loop_count: usize,
    /// Untimed warm-up calls per layout.
    pub burning_count: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            shape: Shape::new(DEFAULT_M, DEFAULT_N, DEFAULT_K),
            loop_count: DEFAULT_LOOP_COUNT,
            burning_count: DEFAULT_BURNING_COUNT,
        }
    }
}

/// The four operand buffers, each exclusively owned and released on drop.
#[derive(Debug)]
pub struct Workspace {
    shape: Shape,
    a: AlignedBuffer<f32>,
    b: AlignedBuffer<f32>,
    c_row: AlignedBuffer<f32>,
    c_col: AlignedBuffer<f32>,
}

impl Workspace {
    /// Allocates zeroed, `MEM_ALIGNMENT`-aligned buffers for `shape`.
    /// Allocator exhaustion aborts the process.
    pub fn allocate(shape: Shape) -> Result<Self> {
        let Shape { m, n, k } = shape;
        let ws = Self {
            shape,
            a: AlignedBuffer::zeroed(Shape::elements(m, k)?, MEM_ALIGNMENT)?,
            b: AlignedBuffer::zeroed(Shape::elements(k, n)?, MEM_ALIGNMENT)?,
            c_row: AlignedBuffer::zeroed(Shape::elements(m, n)?, MEM_ALIGNMENT)?,
            c_col: AlignedBuffer::zeroed(Shape::elements(m, n)?, MEM_ALIGNMENT)?,
        };
        debug!(
            "allocated A={} B={} C={}x2 floats at {MEM_ALIGNMENT}-byte alignment",
            ws.a.len(),
            ws.b.len(),
            ws.c_row.len()
        );
        Ok(ws)
    }

    /// Fills A and B from `[FILL_LOWER, FILL_UPPER]`, each with its own
    /// generator seeded with `seed`.
    pub fn populate(&mut self, seed: u64) -> Result<()> {
        fill_uniform(&mut self.a, FILL_LOWER, FILL_UPPER, seed)?;
        fill_uniform(&mut self.b, FILL_LOWER, FILL_UPPER, seed)?;
        debug!("populated A and B with seed {seed}");
        Ok(())
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn a(&self) -> &[f32] {
        &self.a
    }

    pub fn b(&self) -> &[f32] {
        &self.b
    }

    pub fn c_row(&self) -> &[f32] {
        &self.c_row
    }

    pub fn c_col(&self) -> &[f32] {
        &self.c_col
    }

    /// Direct access to the column-major output, e.g. to inject a fault
    /// before [`Workspace::compare`].
    pub fn c_col_mut(&mut self) -> &mut [f32] {
        &mut self.c_col
    }

    pub fn row_major_call(&self) -> GemmCall {
        let Shape { m, n, k } = self.shape;
        GemmCall::row_major(
            m,
            n,
            k,
            Transpose::from_flag(TRANS_A),
            Transpose::from_flag(TRANS_B),
        )
    }

    pub fn col_major_call(&self) -> GemmCall {
        let Shape { m, n, k } = self.shape;
        GemmCall::col_major_swapped(
            m,
            n,
            k,
            Transpose::from_flag(TRANS_A),
            Transpose::from_flag(TRANS_B),
        )
    }

    /// One row-major call: `C_row = A * B`.
    pub fn row_sgemm<K: Sgemm>(&mut self, kernel: &K) -> Result<()> {
        let call = self.row_major_call();
        kernel.sgemm(&call, &self.a, &self.b, &mut self.c_row)
    }

    /// One column-major call with B and A swapped, writing the same product
    /// into `C_col`.
    pub fn col_sgemm<K: Sgemm>(&mut self, kernel: &K) -> Result<()> {
        let call = self.col_major_call();
        kernel.sgemm(&call, &self.b, &self.a, &mut self.c_col)
    }

    /// Warms up with `burning_count` row-major calls, then returns the
    /// wall-clock microseconds spent in `loop_count` more.
    pub fn time_row_major<K: Sgemm>(
        &mut self,
        kernel: &K,
        burning_count: usize,
        loop_count: usize,
    ) -> Result<f64> {
        repeat(burning_count, || self.row_sgemm(kernel))?;
        let elapsed = time_repeated(loop_count, || self.row_sgemm(kernel))?;
        debug!("row-major: {loop_count} calls in {elapsed:.0}us");
        Ok(elapsed)
    }

    /// Column-major counterpart of [`Workspace::time_row_major`].
    pub fn time_col_major<K: Sgemm>(
        &mut self,
        kernel: &K,
        burning_count: usize,
        loop_count: usize,
    ) -> Result<f64> {
        repeat(burning_count, || self.col_sgemm(kernel))?;
        let elapsed = time_repeated(loop_count, || self.col_sgemm(kernel))?;
        debug!("col-major: {loop_count} calls in {elapsed:.0}us");
        Ok(elapsed)
    }

    pub fn compare(&self, tolerance: f64) -> Result<Vec<Mismatch>> {
        compare(&self.c_row, &self.c_col, tolerance)
    }
}

/// Average per-call latency of both layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchReport {
    pub shape: Shape,
    pub loop_count: usize,
    pub burning_count: usize,
    pub row_sgemm_us: f64,
    pub col_sgemm_us: f64,
}

impl BenchReport {
    /// Averages `row_elapsed_us` and `col_elapsed_us` over `config.loop_count`.
    /// A zero loop count yields non-finite averages (`NaN` or `inf`), which
    /// are still reported.
    pub fn new(config: &BenchConfig, row_elapsed_us: f64, col_elapsed_us: f64) -> Self {
        let loops = config.loop_count as f64;
        Self {
            shape: config.shape,
            loop_count: config.loop_count,
            burning_count: config.burning_count,
            row_sgemm_us: row_elapsed_us / loops,
            col_sgemm_us: col_elapsed_us / loops,
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Burning times: {}, repeat times: {}",
            self.burning_count, self.loop_count
        )?;
        write!(
            f,
            "{} row_sgemm_us={:.3}, col_sgemm_us={:.3}",
            self.shape, self.row_sgemm_us, self.col_sgemm_us
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchOutcome {
    pub report: BenchReport,
    pub mismatches: Vec<Mismatch>,
}

/// Allocates, populates, times both layouts and compares their outputs.
pub fn run<K: Sgemm>(kernel: &K, config: &BenchConfig) -> Result<BenchOutcome> {
    if config.loop_count == 0 {
        warn!("loop count is 0, averages are not finite");
    }
    info!(
        "sgemm {} on {}: {} warm-up + {} timed calls per layout",
        config.shape,
        kernel.name(),
        config.burning_count,
        config.loop_count
    );

    let mut ws = Workspace::allocate(config.shape)?;
    ws.populate(DEFAULT_SEED)?;

    let row_elapsed = ws.time_row_major(kernel, config.burning_count, config.loop_count)?;
    let col_elapsed = ws.time_col_major(kernel, config.burning_count, config.loop_count)?;
    let report = BenchReport::new(config, row_elapsed, col_elapsed);

    let mismatches = ws.compare(TOLERANCE)?;
    info!("{} entries differ by more than {TOLERANCE}", mismatches.len());

    Ok(BenchOutcome { report, mismatches })
}
