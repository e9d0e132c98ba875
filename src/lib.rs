//! Row-major versus column-major SGEMM latency benchmark.
//!
//! Both layouts compute the same `C = A * B` on the same 64-byte aligned
//! operands; the column-major call gets B and A swapped so its column-major
//! `C^T` lands in memory exactly like the row-major `C`. The two outputs are
//! then compared entry by entry.

pub mod aligned;
pub mod bench;
pub mod blas;
pub mod cli;
pub mod error;
pub mod rng;
pub mod timer;
pub mod validate;

pub use error::{BenchError, Result};

/// Byte alignment of every operand buffer.
pub const MEM_ALIGNMENT: usize = 64;

pub const DEFAULT_M: usize = 1;
pub const DEFAULT_N: usize = 1221;
pub const DEFAULT_K: usize = 1221;
pub const DEFAULT_LOOP_COUNT: usize = 10000;
pub const DEFAULT_BURNING_COUNT: usize = 1000;

/// Range A and B are drawn from.
pub const FILL_LOWER: f32 = -2.0;
pub const FILL_UPPER: f32 = 2.0;
