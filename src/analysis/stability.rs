//! Péclet-number stability diagnostics.

use std::fmt;

use crate::problem::Problem;

/// Largest mesh Péclet number for which central convection stays monotone.
const PECLET_LIMIT: f64 = 2.0;

/// Coefficients below this are treated as absent when classifying.
const NEGLIGIBLE: f64 = 1e-10;

/// Mesh Péclet number `|b|·h / (2a)`; infinite when `a = 0`.
pub fn peclet_number(b: f64, h: f64, a: f64) -> f64 {
    if a == 0.0 {
        return f64::INFINITY;
    }
    b.abs() * h / (2.0 * a)
}

/// Dominant transport mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProblemRegime {
    PureDiffusion,
    PureConvection,
    /// Péclet number above 10
    ConvectionDominant,
    /// Péclet number below 0.1
    DiffusionDominant,
    Balanced,
}

impl ProblemRegime {
    fn classify(a: f64, b: f64, peclet: f64) -> Self {
        if b.abs() < NEGLIGIBLE {
            ProblemRegime::PureDiffusion
        } else if a < NEGLIGIBLE {
            ProblemRegime::PureConvection
        } else if peclet > 10.0 {
            ProblemRegime::ConvectionDominant
        } else if peclet < 0.1 {
            ProblemRegime::DiffusionDominant
        } else {
            ProblemRegime::Balanced
        }
    }
}

impl fmt::Display for ProblemRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemRegime::PureDiffusion => "pure diffusion",
            ProblemRegime::PureConvection => "pure convection",
            ProblemRegime::ConvectionDominant => "convection dominant",
            ProblemRegime::DiffusionDominant => "diffusion dominant",
            ProblemRegime::Balanced => "balanced convection-diffusion",
        };
        f.write_str(name)
    }
}

/// Stability verdict for a coefficient set on a uniform mesh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StabilityReport {
    /// `h = L / n`
    pub mesh_size: f64,
    pub peclet: f64,
    /// `a / h²`
    pub diffusion_number: f64,
    pub regime: ProblemRegime,
    /// Péclet number above 2
    pub oscillatory: bool,
    /// `c < 0` with `|c|·h²/a > 4`
    pub reaction_unstable: bool,
    pub stable: bool,
    /// Smallest cell count bringing the Péclet number back to 2, when one exists
    pub recommended_cells: Option<usize>,
    pub recommendation: String,
}

impl fmt::Display for StabilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mesh size:        {:.6e}", self.mesh_size)?;
        writeln!(f, "Peclet number:    {:.6}", self.peclet)?;
        writeln!(f, "diffusion number: {:.6e}", self.diffusion_number)?;
        writeln!(f, "regime:           {}", self.regime)?;
        writeln!(f, "stable:           {}", self.stable)?;
        write!(f, "recommendation:   {}", self.recommendation)
    }
}

/// Analyse coefficients `a`, `b`, `c` on `cells` uniform cells over `(0, length)`.
///
/// Purely diagnostic. The upwind discretisation stays monotone either way;
/// the verdict tells whether the mesh resolves the boundary layer.
pub fn analyze_stability(a: f64, b: f64, c: f64, length: f64, cells: usize) -> StabilityReport {
    let h = length / cells as f64;
    let peclet = peclet_number(b, h, a);
    let regime = ProblemRegime::classify(a, b, peclet);

    let oscillatory = peclet > PECLET_LIMIT;
    let reaction_unstable = c < 0.0 && c.abs() * h * h / a > 4.0;
    let stable = !oscillatory && !reaction_unstable;

    let recommended_cells = if oscillatory && a > 0.0 {
        Some((b.abs() * length / (2.0 * a)).ceil() as usize)
    } else {
        None
    };

    let recommendation = match (stable, recommended_cells) {
        (true, _) => "configuration stable".to_string(),
        (false, Some(n)) => format!("increase the cell count to at least {n} for Pe <= 2"),
        (false, None) if oscillatory => {
            "no diffusion: the Peclet number is unbounded on any mesh".to_string()
        }
        (false, None) => "check the problem parameters: reaction term too strong".to_string(),
    };

    if !stable {
        log::warn!("potentially unstable configuration (Pe = {peclet:.3}): {recommendation}");
    }

    StabilityReport {
        mesh_size: h,
        peclet,
        diffusion_number: a / (h * h),
        regime,
        oscillatory,
        reaction_unstable,
        stable,
        recommended_cells,
        recommendation,
    }
}

/// [`analyze_stability`] for the coefficients and mesh of `problem`.
pub fn analyze_problem(problem: &Problem) -> StabilityReport {
    analyze_stability(
        problem.diffusion(),
        problem.convection(),
        problem.reaction(),
        problem.length(),
        problem.cells(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peclet_number() {
        assert_relative_eq!(peclet_number(1.0, 0.1, 0.01), 5.0);
        assert_relative_eq!(peclet_number(-1.0, 0.1, 0.01), 5.0);
        assert!(peclet_number(1.0, 0.1, 0.0).is_infinite());
    }

    #[test]
    fn test_stable_diffusion() {
        let report = analyze_stability(1.0, 0.0, 0.0, 1.0, 10);
        assert!(report.stable);
        assert_eq!(report.regime, ProblemRegime::PureDiffusion);
        assert_eq!(report.recommended_cells, None);
        assert_relative_eq!(report.diffusion_number, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_convection_recommends_refinement() {
        // Pe = 1·0.1/(2·0.01) = 5
        let report = analyze_stability(0.01, 1.0, 0.0, 1.0, 10);
        assert!(report.oscillatory && !report.stable);
        assert_eq!(report.regime, ProblemRegime::Balanced);
        assert_eq!(report.recommended_cells, Some(50));
        assert!(report.recommendation.contains("50"));

        let refined = analyze_stability(0.01, 1.0, 0.0, 1.0, 50);
        assert!(refined.stable);
    }

    #[test]
    fn test_regimes() {
        let regime = |a, b| analyze_stability(a, b, 0.0, 1.0, 10).regime;
        assert_eq!(regime(0.0, 1.0), ProblemRegime::PureConvection);
        assert_eq!(regime(1e-4, 1.0), ProblemRegime::ConvectionDominant);
        assert_eq!(regime(1.0, 0.1), ProblemRegime::DiffusionDominant);
    }

    #[test]
    fn test_pure_convection_has_no_recommended_mesh() {
        let report = analyze_stability(0.0, 1.0, 0.0, 1.0, 10);
        assert!(!report.stable);
        assert_eq!(report.recommended_cells, None);
    }

    #[test]
    fn test_strong_negative_reaction() {
        // |c|·h²/a = 500·0.01 = 5 > 4
        let report = analyze_stability(1.0, 0.0, -500.0, 1.0, 10);
        assert!(report.reaction_unstable && !report.oscillatory && !report.stable);
        assert!(report.recommendation.contains("reaction"));
        assert!(analyze_stability(1.0, 0.0, -300.0, 1.0, 10).stable);
    }

    #[test]
    fn test_analyze_problem() {
        let problem = Problem::builder()
            .coefficients(0.01, 1.0, 0.0)
            .cells(200)
            .build()
            .unwrap();
        let report = analyze_problem(&problem);
        assert_relative_eq!(report.peclet, 0.25, epsilon = 1e-12);
        assert!(report.stable);
    }
}
