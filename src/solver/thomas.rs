//! Thomas algorithm (direct tridiagonal elimination).

use crate::error::{Fvm1dError, Result};

use super::system::TridiagonalSystem;
use super::PIVOT_TOLERANCE;

/// Solve the system by forward elimination and back substitution.
///
/// The system is consumed: the diagonal and right-hand side are overwritten
/// during elimination and the right-hand side buffer is returned as the
/// solution, so no array beyond the system itself is allocated.
///
/// A pivot whose magnitude falls below [`PIVOT_TOLERANCE`] times the largest
/// matrix entry (or that is not finite) fails with
/// [`Fvm1dError::SingularSystem`]; no partial solution is returned.
pub fn solve_thomas(system: TridiagonalSystem) -> Result<Vec<f64>> {
    let threshold = PIVOT_TOLERANCE * system.max_abs();
    let TridiagonalSystem {
        lower,
        mut diag,
        upper,
        mut rhs,
    } = system;
    let n = diag.len();
    if n == 0 {
        return Ok(rhs);
    }

    let check = |row: usize, pivot: f64| -> Result<()> {
        if !pivot.is_finite() || pivot.abs() <= threshold {
            return Err(Fvm1dError::singular(row, pivot));
        }
        Ok(())
    };

    // Forward elimination
    check(0, diag[0])?;
    for i in 1..n {
        let m = lower[i - 1] / diag[i - 1];
        diag[i] -= m * upper[i - 1];
        rhs[i] -= m * rhs[i - 1];
        check(i, diag[i])?;
    }

    // Back substitution, in place
    rhs[n - 1] /= diag[n - 1];
    for i in (0..n - 1).rev() {
        rhs[i] = (rhs[i] - upper[i] * rhs[i + 1]) / diag[i];
    }

    Ok(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn system(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> TridiagonalSystem {
        TridiagonalSystem {
            lower: lower.to_vec(),
            diag: diag.to_vec(),
            upper: upper.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    #[test]
    fn test_identity() {
        let sys = system(&[0.0; 3], &[1.0; 4], &[0.0; 3], &[1.0, 2.0, 3.0, 4.0]);
        let x = solve_thomas(sys).unwrap();
        assert_eq!(x, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_laplacian() {
        // [ 2 -1  0  0]       [1]
        // [-1  2 -1  0] * x = [0]
        // [ 0 -1  2 -1]       [0]
        // [ 0  0 -1  2]       [1]
        // Solution: x = [1, 1, 1, 1]
        let sys = system(&[-1.0; 3], &[2.0; 4], &[-1.0; 3], &[1.0, 0.0, 0.0, 1.0]);
        let x = solve_thomas(sys).unwrap();
        for v in x {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_matches_residual() {
        let sys = system(
            &[-1.0, -0.5, -2.0],
            &[4.0, 3.0, 5.0, 6.0],
            &[-1.5, -1.0, -0.25],
            &[1.0, -2.0, 0.5, 3.0],
        );
        let x = solve_thomas(sys.clone()).unwrap();
        assert!(sys.residual(&x) < 1e-12);
    }

    #[test]
    fn test_single_unknown() {
        let x = solve_thomas(system(&[], &[4.0], &[], &[2.0])).unwrap();
        assert_eq!(x, vec![0.5]);
    }

    #[test]
    fn test_zero_pivot_is_singular() {
        let err = solve_thomas(system(&[1.0], &[0.0, 1.0], &[1.0], &[1.0, 1.0])).unwrap_err();
        assert_eq!(err, Fvm1dError::singular(0, 0.0));

        // Eliminating row 1 cancels its diagonal exactly
        let err = solve_thomas(system(&[1.0], &[1.0, 1.0], &[1.0], &[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, Fvm1dError::SingularSystem { row: 1, .. }));
    }
}
