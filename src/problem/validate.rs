//! Problem validation.

use crate::error::{Fvm1dError, Result};

use super::Problem;

/// Validate a problem before any mesh or system is allocated.
///
/// Checks:
/// - At least one cell
/// - Positive, finite domain length
/// - Non-negative diffusion coefficient
/// - Finite coefficients and boundary values
pub fn validate_problem(problem: &Problem) -> Result<()> {
    if problem.cells < 1 {
        return Err(Fvm1dError::invalid_problem("cell count must be at least 1"));
    }

    if !(problem.length.is_finite() && problem.length > 0.0) {
        return Err(Fvm1dError::invalid_problem(format!(
            "domain length must be positive and finite (got {})",
            problem.length
        )));
    }

    for (name, value) in [("a", problem.a), ("b", problem.b), ("c", problem.c)] {
        if !value.is_finite() {
            return Err(Fvm1dError::invalid_problem(format!(
                "coefficient {name} must be finite (got {value})"
            )));
        }
    }

    if problem.a < 0.0 {
        return Err(Fvm1dError::invalid_problem(format!(
            "diffusion coefficient must be non-negative (got {})",
            problem.a
        )));
    }

    if !(problem.u0.is_finite() && problem.u_l.is_finite()) {
        return Err(Fvm1dError::invalid_problem("boundary values must be finite"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::Fvm1dError;
    use crate::problem::Problem;

    #[test]
    fn test_rejects_zero_cells() {
        let err = Problem::builder().cells(0).build().unwrap_err();
        assert!(matches!(err, Fvm1dError::InvalidProblem { .. }));
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(Problem::builder().length(0.0).build().is_err());
        assert!(Problem::builder().length(-2.0).build().is_err());
        assert!(Problem::builder().length(f64::NAN).build().is_err());
    }

    #[test]
    fn test_rejects_negative_diffusion() {
        let err = Problem::builder()
            .coefficients(-0.5, 1.0, 0.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_accepts_pure_convection() {
        assert!(Problem::builder().coefficients(0.0, 1.0, 0.0).build().is_ok());
    }
}
