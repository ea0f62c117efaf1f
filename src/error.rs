//! Error types for gemmtrace operations.
//!
//! This module defines custom error types that provide better error handling
//! than panicking, allowing applications to gracefully handle invalid
//! configurations and out-of-order playback commands.

use std::fmt;

/// Errors that can occur during gemmtrace operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// A matrix dimension is zero or exceeds the supported maximum.
    InvalidDimension {
        /// The axis the offending value belongs to (`'m'`, `'n'` or `'k'`).
        axis: char,
        /// The dimension value that was rejected.
        value: usize,
        /// Human-readable error message.
        message: String,
    },
    /// An algorithm parameter is malformed (bad loop-order permutation,
    /// zero or oversized tile dimension, zero playback speed).
    InvalidAlgorithmParameter {
        /// Human-readable error message.
        message: String,
    },
    /// A playback operation was invoked in a state that does not permit it.
    InvalidStateTransition {
        /// The operation that was attempted.
        operation: String,
        /// The playback state the controller was in at the time.
        state: String,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::InvalidDimension {
                axis,
                value,
                message,
            } => write!(
                f,
                "Invalid dimension: {} (axis {}, value {})",
                message, axis, value
            ),
            TraceError::InvalidAlgorithmParameter { message } => {
                write!(f, "Invalid algorithm parameter: {}", message)
            }
            TraceError::InvalidStateTransition {
                operation,
                state,
                message,
            } => write!(
                f,
                "Invalid state transition: {} (operation '{}' in state {})",
                message, operation, state
            ),
        }
    }
}

impl std::error::Error for TraceError {}

/// Result type alias for gemmtrace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Creates an invalid-dimension error.
pub fn invalid_dimension(axis: char, value: usize, message: impl Into<String>) -> TraceError {
    TraceError::InvalidDimension {
        axis,
        value,
        message: message.into(),
    }
}

/// Creates an invalid-algorithm-parameter error.
pub fn invalid_algorithm_parameter(message: impl Into<String>) -> TraceError {
    TraceError::InvalidAlgorithmParameter {
        message: message.into(),
    }
}

/// Creates an invalid-state-transition error.
pub fn invalid_state_transition(
    operation: impl Into<String>,
    state: impl Into<String>,
    message: impl Into<String>,
) -> TraceError {
    TraceError::InvalidStateTransition {
        operation: operation.into(),
        state: state.into(),
        message: message.into(),
    }
}
