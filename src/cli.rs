//! Command-line surface: `sgemm-layout-bench [m] [n] [k] [loop_count] [burning_count]`.
//!
//! Values are read the way C's `atoi` reads them, so no argument is ever
//! rejected: trailing garbage is ignored, a value with no leading digits
//! reads as 0 and anything after the fifth value is dropped.

use std::io::Write;

use clap::Parser;
use log::{debug, warn};

use crate::bench::{run, BenchConfig, BenchOutcome, Shape};
use crate::blas::Sgemm;
use crate::error::Result;
use crate::{DEFAULT_BURNING_COUNT, DEFAULT_K, DEFAULT_LOOP_COUNT, DEFAULT_M, DEFAULT_N};

/// Number of positional values the benchmark reads.
const POSITIONALS: usize = 5;

/// Times row-major against column-major SGEMM and checks that both agree.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct BenchArgs {
    /// m n k loop_count burning_count; missing values keep their defaults
    /// (1 1221 1221 10000 1000)
    #[arg(
        value_name = "VALUES",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub values: Vec<String>,
}

impl BenchArgs {
    /// True when nothing followed the program name.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn value_or(&self, position: usize, default: usize) -> usize {
        self.values
            .get(position)
            .map_or(default, |value| parse_count(value))
    }

    pub fn config(&self) -> BenchConfig {
        if self.values.len() > POSITIONALS {
            debug!(
                "ignoring {} argument(s) after burning_count",
                self.values.len() - POSITIONALS
            );
        }
        BenchConfig {
            shape: Shape::new(
                self.value_or(0, DEFAULT_M),
                self.value_or(1, DEFAULT_N),
                self.value_or(2, DEFAULT_K),
            ),
            loop_count: self.value_or(3, DEFAULT_LOOP_COUNT),
            burning_count: self.value_or(4, DEFAULT_BURNING_COUNT),
        }
    }
}

/// Reads a count the way `atoi` does: optional leading whitespace and sign,
/// then the longest run of decimal digits. No digits reads as 0, a negative
/// value clamps to 0 and overflow saturates.
pub fn parse_count(value: &str) -> usize {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let count = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(10).saturating_add(usize::from(digit - b'0'))
        });

    if negative && count > 0 {
        warn!("negative count {value:?} read as 0");
        return 0;
    }
    count
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} m n k loop burning")
}

/// Runs the benchmark for already parsed `args` and writes its report to
/// `out`.
///
/// When `args` is empty the usage line for `program` is written first and the
/// run proceeds with defaults.
pub fn execute<K, W>(
    kernel: &K,
    program: &str,
    args: &BenchArgs,
    out: &mut W,
) -> Result<BenchOutcome>
where
    K: Sgemm,
    W: Write,
{
    if args.is_empty() {
        writeln!(out, "{}", usage(program))?;
    }

    let outcome = run(kernel, &args.config())?;
    writeln!(out, "{}", outcome.report)?;
    for mismatch in &outcome.mismatches {
        writeln!(out, "{mismatch}")?;
    }
    out.flush()?;
    Ok(outcome)
}
