//! Error types for the SGEMM layout benchmark.
//!
//! Allocator exhaustion is not represented here: it aborts the process through
//! [`std::alloc::handle_alloc_error`]. Everything else that can go wrong before
//! or around a kernel call is reported through [`BenchError`].

use std::fmt;
use std::io;

/// Errors that can occur while preparing or running the benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Invalid layout parameters were provided.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Input validation error (shapes, leading dimensions, repetition counts).
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
    /// Writing the report failed.
    OutputError {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "Invalid memory layout: {} (size: {}, alignment: {})",
                message, size, alignment
            ),
            BenchError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            BenchError::OutputError { message } => {
                write!(f, "Output error: {}", message)
            }
        }
    }
}

impl std::error::Error for BenchError {}

impl From<io::Error> for BenchError {
    fn from(err: io::Error) -> Self {
        output_error(err.to_string())
    }
}

/// Result type alias for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> BenchError {
    BenchError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> BenchError {
    BenchError::ValidationError {
        message: message.into(),
    }
}

/// Creates an output error.
pub fn output_error(message: impl Into<String>) -> BenchError {
    BenchError::OutputError {
        message: message.into(),
    }
}
