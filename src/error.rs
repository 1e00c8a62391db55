//! Error types for matbench operations.
//!
//! This module defines custom error types that provide better error handling
//! than panicking, allowing applications to gracefully handle failures.
//! Every failure path in the benchmark driver is fatal ("report and
//! terminate"), with the exception of [`BenchError::EmptyProfile`], which the
//! binary surfaces as a warning.

use std::fmt;
use std::io;

/// Errors that can occur during matbench operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Memory allocation for a matrix or histogram buffer failed.
    AllocationError {
        /// The number of elements that was requested.
        requested_len: usize,
        /// Human-readable error message.
        message: String,
    },
    /// The performance-counter collaborator reported a failure.
    CounterError {
        /// The counter operation that failed (e.g. `"start_sampling"`).
        operation: String,
        /// The collaborator-provided error string.
        message: String,
    },
    /// A sampling run finished with every histogram bucket at zero.
    ///
    /// This usually means the sampling configuration never fired and the
    /// profile contains no information.
    EmptyProfile {
        /// Number of per-sample buffers that were checked.
        num_buffers: usize,
        /// Number of buckets per buffer.
        num_buckets: usize,
    },
    /// Input validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
    /// Writing the report or the histogram dump failed.
    IoError {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::AllocationError {
                requested_len,
                message,
            } => write!(
                f,
                "Memory allocation failed: {} (requested {} elements)",
                message, requested_len
            ),
            BenchError::CounterError { operation, message } => {
                write!(f, "Counter error in {}: {}", operation, message)
            }
            BenchError::EmptyProfile {
                num_buffers,
                num_buckets,
            } => write!(
                f,
                "Empty profile: all {} buckets across {} sample buffers are zero",
                num_buckets, num_buffers
            ),
            BenchError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            BenchError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
        }
    }
}

impl std::error::Error for BenchError {}

impl From<io::Error> for BenchError {
    fn from(err: io::Error) -> Self {
        BenchError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for matbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Creates an allocation error.
pub fn allocation_error(requested_len: usize, message: impl Into<String>) -> BenchError {
    BenchError::AllocationError {
        requested_len,
        message: message.into(),
    }
}

/// Creates a counter error.
pub fn counter_error(operation: impl Into<String>, message: impl Into<String>) -> BenchError {
    BenchError::CounterError {
        operation: operation.into(),
        message: message.into(),
    }
}

/// Creates an empty-profile error.
pub fn empty_profile(num_buffers: usize, num_buckets: usize) -> BenchError {
    BenchError::EmptyProfile {
        num_buffers,
        num_buckets,
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> BenchError {
    BenchError::ValidationError {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_display() {
        let error = allocation_error(160_000, "matrix length overflows usize");
        let display = format!("{}", error);
        assert!(display.contains("Memory allocation failed"));
        assert!(display.contains("160000 elements"));
        assert!(display.contains("matrix length overflows usize"));
    }

    #[test]
    fn test_counter_error_display() {
        let error = counter_error("start_sampling", "library version mismatch");
        let display = format!("{}", error);
        assert!(display.contains("Counter error in start_sampling"));
        assert!(display.contains("library version mismatch"));
    }

    #[test]
    fn test_empty_profile_display() {
        let error = empty_profile(2, 512);
        let display = format!("{}", error);
        assert!(display.contains("Empty profile"));
        assert!(display.contains("512 buckets"));
        assert!(display.contains("2 sample buffers"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = validation_error("dimension must be at least 1");
        let display = format!("{}", error);
        assert!(display.contains("Validation error"));
        assert!(display.contains("dimension must be at least 1"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = counter_error("region_begin", "test");
        let error2 = counter_error("region_begin", "test");
        let error3 = counter_error("region_end", "test");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = validation_error("test error");

        // Should implement Error trait
        let _: &dyn std::error::Error = &error;

        // Should have source method (returns None for our simple errors)
        assert!(std::error::Error::source(&error).is_none());
    }
}
