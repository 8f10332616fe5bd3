//! Error types for the finite-volume solver.
//!
//! This module provides a unified error type [`Fvm1dError`] covering every
//! failure that must surface to the caller: invalid problem definitions,
//! singular systems during direct elimination, and invalid solver or study
//! configuration.
//!
//! Iterative non-convergence is not an error. It is reported through
//! [`SolveOutcome::converged`](crate::solver::SolveOutcome) together with the
//! best available iterate.

use thiserror::Error;

/// Result type alias using [`Fvm1dError`].
pub type Result<T> = std::result::Result<T, Fvm1dError>;

/// Unified error type for all solver operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fvm1dError {
    // ============ Problem Definition Errors ============
    /// The problem definition violates a precondition
    #[error("Invalid problem: {message}")]
    InvalidProblem { message: String },

    // ============ Linear Solve Errors ============
    /// A zero or negligible pivot was met during direct elimination
    #[error("Singular system - negligible pivot {pivot:.3e} at row {row}")]
    SingularSystem { row: usize, pivot: f64 },

    /// A value array does not match the number of cells or unknowns
    #[error("Size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Solver configuration is out of range
    #[error("Invalid solver configuration: {message}")]
    InvalidSolverConfig { message: String },

    // ============ Analysis Errors ============
    /// Convergence study parameters are unusable
    #[error("Invalid convergence study: {message}")]
    InvalidConvergenceStudy { message: String },
}

impl Fvm1dError {
    /// Create an invalid problem error
    pub fn invalid_problem(message: impl Into<String>) -> Self {
        Self::InvalidProblem {
            message: message.into(),
        }
    }

    /// Create a singular system error
    pub fn singular(row: usize, pivot: f64) -> Self {
        Self::SingularSystem { row, pivot }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create an invalid solver configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidSolverConfig {
            message: message.into(),
        }
    }

    /// Create an invalid convergence study error
    pub fn invalid_study(message: impl Into<String>) -> Self {
        Self::InvalidConvergenceStudy {
            message: message.into(),
        }
    }
}
