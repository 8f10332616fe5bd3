//! Accuracy and stability diagnostics.
//!
//! Everything here reads a [`Solution`](crate::Solution) or a
//! [`Problem`](crate::Problem) and never changes it.

mod convergence;
mod norms;
mod stability;

pub use convergence::{
    estimate_convergence_order, perform_convergence_study, perform_convergence_study_parallel,
    ConvergenceStudy,
};
pub use norms::{compute_error_metrics, ErrorMetrics, ErrorNorm};
pub use stability::{
    analyze_problem, analyze_stability, peclet_number, ProblemRegime, StabilityReport,
};
