//! Mesh-refinement studies and observed convergence order.

use std::time::Duration;

use rayon::prelude::*;

use crate::error::{Fvm1dError, Result};
use crate::problem::Problem;
use crate::solver::{FiniteVolumeSolver, SolverConfig};

use super::norms::{compute_error_metrics, ErrorMetrics, ErrorNorm};

/// Number of most-refined pairwise orders averaged into
/// [`ConvergenceStudy::average_order`].
const ASYMPTOTIC_PAIRS: usize = 3;

/// Observed order `p` from errors `e1`, `e2` at mesh sizes `h1`, `h2`.
///
/// Returns NaN when the estimate is undefined:
/// - zero `e2` or `h2`
/// - equal mesh sizes
/// - zero `e1`, where the logarithm alone would give `-inf`
/// - any other non-finite result
pub fn estimate_convergence_order(e1: f64, e2: f64, h1: f64, h2: f64) -> f64 {
    if e2 == 0.0 || h2 == 0.0 {
        return f64::NAN;
    }
    let scale = (h1 / h2).ln();
    if scale == 0.0 {
        return f64::NAN;
    }
    let order = (e1 / e2).ln() / scale;
    if order.is_finite() {
        order
    } else {
        f64::NAN
    }
}

/// Results of solving one problem on a sequence of refined meshes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvergenceStudy {
    /// Cell counts, strictly ascending
    pub mesh_sizes: Vec<usize>,
    /// Nominal step `L / n` per cell count
    pub step_sizes: Vec<f64>,
    pub errors: Vec<ErrorMetrics>,
    /// L2 orders between consecutive refinements
    pub orders: Vec<f64>,
    /// Solve time per cell count
    pub elapsed: Vec<Duration>,
    /// Whether each level's linear solve converged
    pub converged: Vec<bool>,
    /// Sweeps per level; 1 for the direct solver
    pub iterations: Vec<usize>,
    /// Mean of the last three L2 orders, NaN entries skipped
    pub average_order: f64,
}

impl ConvergenceStudy {
    fn from_samples(length: f64, mesh_sizes: &[usize], samples: Vec<Level>) -> Self {
        let step_sizes: Vec<f64> = mesh_sizes.iter().map(|&n| length / n as f64).collect();

        let mut study = Self {
            mesh_sizes: mesh_sizes.to_vec(),
            step_sizes,
            errors: samples.iter().map(|l| l.metrics).collect(),
            orders: Vec::new(),
            elapsed: samples.iter().map(|l| l.elapsed).collect(),
            converged: samples.iter().map(|l| l.converged).collect(),
            iterations: samples.iter().map(|l| l.iterations).collect(),
            average_order: f64::NAN,
        };
        if !study.all_converged() {
            log::warn!(
                "convergence study includes unconverged iterative solves; \
                 errors and orders at those levels reflect the iteration cap"
            );
        }
        study.orders = study.orders_by(ErrorNorm::L2);
        study.average_order = asymptotic_mean(&study.orders);
        study
    }

    /// Pairwise orders measured in `norm`.
    pub fn orders_by(&self, norm: ErrorNorm) -> Vec<f64> {
        self.errors
            .windows(2)
            .zip(self.step_sizes.windows(2))
            .map(|(e, h)| estimate_convergence_order(e[0].get(norm), e[1].get(norm), h[0], h[1]))
            .collect()
    }

    /// Whether every level's linear solve converged.
    ///
    /// Errors and orders are only meaningful as discretisation errors when
    /// this holds.
    pub fn all_converged(&self) -> bool {
        self.converged.iter().all(|&c| c)
    }

    /// Number of refinement levels.
    pub fn len(&self) -> usize {
        self.mesh_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh_sizes.is_empty()
    }
}

fn asymptotic_mean(orders: &[f64]) -> f64 {
    let tail = &orders[orders.len().saturating_sub(ASYMPTOTIC_PAIRS)..];
    let (sum, count) = tail
        .iter()
        .filter(|p| !p.is_nan())
        .fold((0.0, 0usize), |(s, c), p| (s + p, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn check_mesh_sizes(mesh_sizes: &[usize]) -> Result<()> {
    if mesh_sizes.len() < 2 {
        return Err(Fvm1dError::invalid_study(format!(
            "need at least two mesh sizes (got {})",
            mesh_sizes.len()
        )));
    }
    if mesh_sizes.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Fvm1dError::invalid_study(format!(
            "mesh sizes must be strictly ascending (got {mesh_sizes:?})"
        )));
    }
    Ok(())
}

/// Measurements from one refinement level.
struct Level {
    metrics: ErrorMetrics,
    elapsed: Duration,
    converged: bool,
    iterations: usize,
}

fn sample<F>(
    solver: &FiniteVolumeSolver,
    problem: &Problem,
    exact: &F,
    cells: usize,
) -> Result<Level>
where
    F: Fn(f64) -> f64,
{
    let refined = problem.with_cells(cells)?;
    let outcome = solver.solve(&refined)?;
    let metrics = compute_error_metrics(&outcome.solution, exact);
    log::info!(
        "n = {cells:>6}: L2 = {:.3e}, Linf = {:.3e} ({:?})",
        metrics.l2,
        metrics.linf,
        outcome.elapsed
    );
    Ok(Level {
        metrics,
        elapsed: outcome.elapsed,
        converged: outcome.converged,
        iterations: outcome.iterations,
    })
}

/// Solve `problem` at each cell count in `mesh_sizes` and compare with `exact`.
///
/// Only the cell count changes between levels; coefficients, boundary values,
/// source and mesh layout are taken from `problem`.
pub fn perform_convergence_study<F>(
    problem: &Problem,
    exact: F,
    mesh_sizes: &[usize],
    config: &SolverConfig,
) -> Result<ConvergenceStudy>
where
    F: Fn(f64) -> f64,
{
    check_mesh_sizes(mesh_sizes)?;
    let solver = FiniteVolumeSolver::new(config.clone());

    let samples = mesh_sizes
        .iter()
        .map(|&n| sample(&solver, problem, &exact, n))
        .collect::<Result<Vec<_>>>()?;

    let study = ConvergenceStudy::from_samples(problem.length(), mesh_sizes, samples);
    log::info!("average convergence order {:.3}", study.average_order);
    Ok(study)
}

/// [`perform_convergence_study`] with the levels solved concurrently.
///
/// Solves share nothing, so results match the sequential study exactly apart
/// from the timings.
pub fn perform_convergence_study_parallel<F>(
    problem: &Problem,
    exact: F,
    mesh_sizes: &[usize],
    config: &SolverConfig,
) -> Result<ConvergenceStudy>
where
    F: Fn(f64) -> f64 + Sync,
{
    check_mesh_sizes(mesh_sizes)?;
    let solver = FiniteVolumeSolver::new(config.clone());

    let samples = mesh_sizes
        .par_iter()
        .map(|&n| sample(&solver, problem, &exact, n))
        .collect::<Result<Vec<_>>>()?;

    let study = ConvergenceStudy::from_samples(problem.length(), mesh_sizes, samples);
    log::info!("average convergence order {:.3}", study.average_order);
    Ok(study)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshKind;
    use crate::solver::SolverStrategy;
    use approx::assert_relative_eq;

    fn direct() -> SolverConfig {
        SolverConfig::new().with_strategy(SolverStrategy::Thomas)
    }

    #[test]
    fn test_order_estimate() {
        let p = estimate_convergence_order(4e-2, 1e-2, 0.2, 0.1);
        assert_relative_eq!(p, 2.0, epsilon = 1e-12);
        let p = estimate_convergence_order(1e-2, 5e-3, 0.1, 0.05);
        assert_relative_eq!(p, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_order_is_nan() {
        assert!(estimate_convergence_order(1e-3, 0.0, 0.1, 0.05).is_nan());
        assert!(estimate_convergence_order(1e-3, 1e-4, 0.1, 0.0).is_nan());
        assert!(estimate_convergence_order(1e-3, 1e-4, 0.1, 0.1).is_nan());
        assert!(estimate_convergence_order(0.0, 1e-4, 0.1, 0.05).is_nan());
    }

    #[test]
    fn test_second_order_on_smooth_solution() {
        let (problem, exact) = Problem::sine_manufactured(1.0, 0.0, 0.0, 1.0, 10).unwrap();
        let study =
            perform_convergence_study(&problem, exact, &[10, 20, 40, 80], &direct()).unwrap();

        assert_eq!(study.len(), 4);
        assert_eq!(study.orders.len(), 3);
        assert!(study.errors.windows(2).all(|e| e[1].l2 < e[0].l2));
        for &p in &study.orders {
            assert!(p > 1.8, "observed order {p}");
        }
        assert!(study.average_order > 1.8);
        assert_relative_eq!(study.step_sizes[3], 1.0 / 80.0);
    }

    #[test]
    fn test_study_records_solver_convergence() {
        let (problem, exact) = Problem::sine_manufactured(1.0, 0.0, 0.0, 1.0, 10).unwrap();
        let sizes = [10, 20, 40, 80];

        let study = perform_convergence_study(&problem, exact.clone(), &sizes, &direct()).unwrap();
        assert!(study.all_converged());
        assert_eq!(study.iterations, vec![1; 4]);

        let capped = SolverConfig::new()
            .with_strategy(SolverStrategy::GaussSeidel)
            .with_max_iterations(5);
        let study = perform_convergence_study(&problem, exact.clone(), &sizes, &capped).unwrap();
        assert!(!study.all_converged());
        assert_eq!(study.converged, vec![false; 4]);
        assert_eq!(study.iterations, vec![5; 4]);

        let study = perform_convergence_study_parallel(&problem, exact, &sizes, &capped).unwrap();
        assert!(!study.all_converged());
    }

    #[test]
    fn test_clustered_mesh_still_converges() {
        let (problem, exact) = Problem::sine_manufactured(1.0, 0.0, 1.0, 1.0, 10).unwrap();
        let problem = problem.with_mesh_kind(MeshKind::Clustered);
        let study =
            perform_convergence_study(&problem, exact, &[20, 40, 80], &direct()).unwrap();
        assert!(study.average_order > 1.5, "observed order {}", study.average_order);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (problem, exact) = Problem::sine_manufactured(0.5, 1.0, 2.0, 2.0, 10).unwrap();
        let sizes = [8, 16, 32, 64, 128];
        let serial =
            perform_convergence_study(&problem, exact.clone(), &sizes, &direct()).unwrap();
        let parallel =
            perform_convergence_study_parallel(&problem, exact, &sizes, &direct()).unwrap();

        assert_eq!(serial.mesh_sizes, parallel.mesh_sizes);
        assert_eq!(serial.errors, parallel.errors);
        assert_eq!(serial.orders_by(ErrorNorm::LInf), parallel.orders_by(ErrorNorm::LInf));
    }

    #[test]
    fn test_average_uses_last_three_orders() {
        assert_relative_eq!(asymptotic_mean(&[0.5, 1.0, 2.0, 3.0, 4.0]), 3.0);
        assert_relative_eq!(asymptotic_mean(&[1.0, f64::NAN, 2.0]), 1.5);
        assert!(asymptotic_mean(&[f64::NAN]).is_nan());
        assert!(asymptotic_mean(&[]).is_nan());
    }

    #[test]
    fn test_rejects_bad_mesh_sizes() {
        let (problem, exact) = Problem::sine_manufactured(1.0, 0.0, 0.0, 1.0, 10).unwrap();
        for sizes in [&[10][..], &[20, 10][..], &[10, 10][..]] {
            let err = perform_convergence_study(&problem, exact.clone(), sizes, &direct())
                .unwrap_err();
            assert!(matches!(err, Fvm1dError::InvalidConvergenceStudy { .. }));
        }
        let err = perform_convergence_study(&problem, exact, &[0, 10], &direct()).unwrap_err();
        assert!(matches!(err, Fvm1dError::InvalidProblem { .. }));
    }
}
