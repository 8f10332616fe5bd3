//! Discrete error norms against a reference function.

use std::fmt;

use crate::solution::Solution;

/// Which error norm to read from [`ErrorMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorNorm {
    L1,
    #[default]
    L2,
    LInf,
}

impl fmt::Display for ErrorNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorNorm::L1 => f.write_str("L1"),
            ErrorNorm::L2 => f.write_str("L2"),
            ErrorNorm::LInf => f.write_str("Linf"),
        }
    }
}

/// Absolute and relative errors of a solution.
///
/// The L1 and L2 norms are weighted by the cell widths, so they approximate
/// the continuous norms on `(0, L)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorMetrics {
    /// `Σ |e_i|·dx_i`
    pub l1: f64,
    /// `sqrt(Σ e_i²·dx_i)`
    pub l2: f64,
    /// `max |e_i|`
    pub linf: f64,
    pub relative_l1: f64,
    pub relative_l2: f64,
    pub relative_linf: f64,
    /// `sqrt(Σ e_i²·dx_i / L)`
    pub rms_l2: f64,
}

impl ErrorMetrics {
    /// Absolute error in the given norm.
    pub fn get(&self, norm: ErrorNorm) -> f64 {
        match norm {
            ErrorNorm::L1 => self.l1,
            ErrorNorm::L2 => self.l2,
            ErrorNorm::LInf => self.linf,
        }
    }

    /// Relative error in the given norm.
    pub fn relative(&self, norm: ErrorNorm) -> f64 {
        match norm {
            ErrorNorm::L1 => self.relative_l1,
            ErrorNorm::L2 => self.relative_l2,
            ErrorNorm::LInf => self.relative_linf,
        }
    }
}

/// Compare `solution` with `exact` at the cell centres.
///
/// Relative errors divide by the matching norm of `exact`; when that norm is
/// zero the absolute error is reported instead.
pub fn compute_error_metrics<F>(solution: &Solution, exact: F) -> ErrorMetrics
where
    F: Fn(f64) -> f64,
{
    let mut error = [0.0f64; 3];
    let mut norm = [0.0f64; 3];

    for ((&x, &dx), &u) in solution
        .mesh_points()
        .iter()
        .zip(solution.cell_widths())
        .zip(solution.values())
    {
        let reference = exact(x);
        let e = (u - reference).abs();

        error[0] += e * dx;
        error[1] += e * e * dx;
        error[2] = error[2].max(e);

        norm[0] += reference.abs() * dx;
        norm[1] += reference * reference * dx;
        norm[2] = norm[2].max(reference.abs());
    }

    let relative = |e: f64, n: f64| if n > 0.0 { e / n } else { e };
    let l2 = error[1].sqrt();
    let norm_l2 = norm[1].sqrt();

    ErrorMetrics {
        l1: error[0],
        l2,
        linf: error[2],
        relative_l1: relative(error[0], norm[0]),
        relative_l2: relative(l2, norm_l2),
        relative_linf: relative(error[2], norm[2]),
        rms_l2: (error[1] / solution.mesh().length()).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, MeshKind};
    use approx::assert_relative_eq;

    fn offset_solution(length: f64, offset: f64) -> Solution {
        let mesh = Mesh::build(4, length, MeshKind::Uniform).unwrap();
        let values = mesh.centers().iter().map(|&x| x + offset).collect();
        Solution::new(values, mesh).unwrap()
    }

    #[test]
    fn test_exact_solution_has_zero_error() {
        let metrics = compute_error_metrics(&offset_solution(1.0, 0.0), |x| x);
        assert_eq!(metrics.l1, 0.0);
        assert_eq!(metrics.l2, 0.0);
        assert_eq!(metrics.linf, 0.0);
        assert_eq!(metrics.relative_l2, 0.0);
    }

    #[test]
    fn test_constant_offset() {
        // Error 0.1 everywhere on (0, 2)
        let metrics = compute_error_metrics(&offset_solution(2.0, 0.1), |x| x);
        assert_relative_eq!(metrics.l1, 0.2, epsilon = 1e-12);
        assert_relative_eq!(metrics.l2, (0.01f64 * 2.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(metrics.linf, 0.1, epsilon = 1e-12);
        assert_relative_eq!(metrics.rms_l2, 0.1, epsilon = 1e-12);
        // ‖x‖_∞ over the centres is 1.75
        assert_relative_eq!(metrics.relative_linf, 0.1 / 1.75, epsilon = 1e-12);
        assert_eq!(metrics.get(ErrorNorm::LInf), metrics.linf);
    }

    #[test]
    fn test_zero_reference_falls_back_to_absolute() {
        let metrics = compute_error_metrics(&offset_solution(1.0, 0.0), |_| 0.0);
        assert_eq!(metrics.relative_l1, metrics.l1);
        assert_eq!(metrics.relative(ErrorNorm::L2), metrics.l2);
        assert_eq!(metrics.relative_linf, metrics.linf);
    }
}
