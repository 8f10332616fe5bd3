//! Tridiagonal system assembly.

use crate::mesh::Mesh;
use crate::problem::Problem;

/// Tridiagonal linear system `A·u = rhs`.
///
/// Row `i` reads `lower[i-1]·u[i-1] + diag[i]·u[i] + upper[i]·u[i+1] = rhs[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    /// Sub-diagonal, length `n - 1`
    pub lower: Vec<f64>,
    /// Main diagonal, length `n`
    pub diag: Vec<f64>,
    /// Super-diagonal, length `n - 1`
    pub upper: Vec<f64>,
    /// Right-hand side, length `n`
    pub rhs: Vec<f64>,
}

impl TridiagonalSystem {
    /// Create a zeroed system with `size` unknowns.
    pub fn new(size: usize) -> Self {
        let off = size.saturating_sub(1);
        Self {
            lower: vec![0.0; off],
            diag: vec![0.0; size],
            upper: vec![0.0; off],
            rhs: vec![0.0; size],
        }
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Stamp the coupling between cells `i` and `i + 1`.
    ///
    /// `west` is the west-face conductance of cell `i + 1`, `east` the
    /// east-face conductance of cell `i`:
    ///   A[i,i]     += east
    ///   A[i+1,i+1] += west
    ///   A[i,i+1]   -= east
    ///   A[i+1,i]   -= west
    pub fn stamp_face(&mut self, i: usize, east: f64, west: f64) {
        self.diag[i] += east;
        self.diag[i + 1] += west;
        self.upper[i] -= east;
        self.lower[i] -= west;
    }

    /// Stamp a wall conductance `g` tying row `i` to the known value `u_wall`.
    pub fn stamp_wall(&mut self, i: usize, g: f64, u_wall: f64) {
        self.diag[i] += g;
        self.rhs[i] += g * u_wall;
    }

    /// Largest absolute matrix entry, used to scale pivot checks.
    pub fn max_abs(&self) -> f64 {
        self.lower
            .iter()
            .chain(&self.diag)
            .chain(&self.upper)
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    /// Whether every row satisfies `diag >= |lower| + |upper|`.
    pub fn is_diagonally_dominant(&self) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            let west = if i > 0 { self.lower[i - 1].abs() } else { 0.0 };
            let east = if i + 1 < n { self.upper[i].abs() } else { 0.0 };
            self.diag[i] >= west + east
        })
    }

    /// Product `A·u`.
    pub fn apply(&self, u: &[f64]) -> Vec<f64> {
        let n = self.size();
        (0..n)
            .map(|i| {
                let mut v = self.diag[i] * u[i];
                if i > 0 {
                    v += self.lower[i - 1] * u[i - 1];
                }
                if i + 1 < n {
                    v += self.upper[i] * u[i + 1];
                }
                v
            })
            .collect()
    }

    /// Max-norm of the residual `rhs - A·u`.
    pub fn residual(&self, u: &[f64]) -> f64 {
        self.apply(u)
            .iter()
            .zip(&self.rhs)
            .fold(0.0f64, |acc, (au, b)| acc.max((b - au).abs()))
    }
}

/// Assemble the finite-volume system for `problem` on `mesh`.
///
/// For cell `i` with centre distances `dxw`, `dxe` to its neighbours:
///
/// ```text
/// aw = a/dxw + max(b, 0)
/// ae = a/dxe + max(-b, 0)
/// ap = aw + ae + c·dx[i]
/// ```
///
/// giving `lower[i-1] = -aw`, `diag[i] = ap`, `upper[i] = -ae` and
/// `rhs[i] = f(x[i])·dx[i]`. At the walls the neighbour distance is the
/// half-cell to the boundary and the Dirichlet value moves to the right-hand
/// side, so the wall conductance sits once on the diagonal and once, scaled by
/// the wall value, in `rhs`.
///
/// Every off-diagonal entry is non-positive; with `a >= 0` and `c >= 0` the
/// matrix is weakly diagonally dominant. A strongly negative `c` can break
/// dominance; this is reported by the stability analysis, not corrected here.
pub fn assemble(problem: &Problem, mesh: &Mesh) -> TridiagonalSystem {
    let n = mesh.len();
    let a = problem.diffusion();
    let b = problem.convection();
    let c = problem.reaction();
    let b_pos = b.max(0.0);
    let b_neg = (-b).max(0.0);

    let x = mesh.centers();
    let dx = mesh.widths();
    let mut system = TridiagonalSystem::new(n);

    // Source and reaction terms integrated over each cell
    for i in 0..n {
        system.rhs[i] = problem.source(x[i]) * dx[i];
        system.diag[i] = c * dx[i];
    }

    // Interior faces
    for i in 0..n.saturating_sub(1) {
        let distance = mesh.east_distance(i);
        let east = a / distance + b_neg;
        let west = a / distance + b_pos;
        system.stamp_face(i, east, west);
    }

    // Wall faces
    let aw_wall = a / mesh.west_distance(0) + b_pos;
    let ae_wall = a / mesh.east_distance(n - 1) + b_neg;
    system.stamp_wall(0, aw_wall, problem.u0());
    system.stamp_wall(n - 1, ae_wall, problem.u_l());

    log::debug!(
        "assembled {n}x{n} tridiagonal system (diagonally dominant: {})",
        system.is_diagonally_dominant()
    );

    system
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshKind;
    use approx::assert_relative_eq;

    fn build(a: f64, b: f64, c: f64, n: usize) -> (Problem, Mesh) {
        let problem = Problem::builder()
            .coefficients(a, b, c)
            .boundary_values(2.0, 5.0)
            .cells(n)
            .constant_source(1.0)
            .build()
            .unwrap();
        let mesh = Mesh::build(n, problem.length(), MeshKind::Uniform).unwrap();
        (problem, mesh)
    }

    #[test]
    fn test_interior_row() {
        let (problem, mesh) = build(1.0, 0.0, 0.0, 4);
        let system = assemble(&problem, &mesh);
        // h = 0.25 → a/h = 4
        assert_relative_eq!(system.lower[0], -4.0);
        assert_relative_eq!(system.diag[1], 8.0);
        assert_relative_eq!(system.upper[1], -4.0);
        assert_relative_eq!(system.rhs[1], 0.25);
    }

    #[test]
    fn test_boundary_rows() {
        let (problem, mesh) = build(1.0, 0.0, 0.0, 4);
        let system = assemble(&problem, &mesh);
        // Wall conductance a/(h/2) = 8
        assert_relative_eq!(system.diag[0], 4.0 + 8.0);
        assert_relative_eq!(system.rhs[0], 0.25 + 8.0 * 2.0);
        assert_relative_eq!(system.diag[3], 4.0 + 8.0);
        assert_relative_eq!(system.rhs[3], 0.25 + 8.0 * 5.0);
    }

    #[test]
    fn test_upwind_split() {
        let (problem, mesh) = build(1.0, 3.0, 0.0, 4);
        let system = assemble(&problem, &mesh);
        // Positive velocity loads the west (upstream) side only
        assert_relative_eq!(system.lower[0], -(4.0 + 3.0));
        assert_relative_eq!(system.upper[0], -4.0);

        let (problem, mesh) = build(1.0, -3.0, 0.0, 4);
        let system = assemble(&problem, &mesh);
        assert_relative_eq!(system.lower[0], -4.0);
        assert_relative_eq!(system.upper[0], -(4.0 + 3.0));
    }

    #[test]
    fn test_single_cell_sees_both_walls() {
        let (problem, mesh) = build(1.0, 0.0, 2.0, 1);
        let system = assemble(&problem, &mesh);
        assert!(system.lower.is_empty() && system.upper.is_empty());
        // Two walls at distance 1/2 each plus reaction c·dx
        assert_relative_eq!(system.diag[0], 2.0 + 2.0 + 2.0);
        assert_relative_eq!(system.rhs[0], 1.0 + 2.0 * 2.0 + 2.0 * 5.0);
    }

    #[test]
    fn test_diagonal_dominance() {
        let (problem, mesh) = build(0.01, 1.0, 0.5, 50);
        let system = assemble(&problem, &mesh);
        assert!(system.is_diagonally_dominant());
        assert!(system.lower.iter().chain(&system.upper).all(|&v| v <= 0.0));

        let (problem, mesh) = build(1.0, 0.0, -500.0, 10);
        assert!(!assemble(&problem, &mesh).is_diagonally_dominant());
    }

    #[test]
    fn test_residual_of_exact_vector() {
        let (problem, mesh) = build(1.0, 0.0, 0.0, 3);
        let system = assemble(&problem, &mesh);
        let rhs = system.apply(&[1.0, 2.0, 3.0]);
        let mut shifted = system.clone();
        shifted.rhs = rhs;
        assert!(shifted.residual(&[1.0, 2.0, 3.0]) < 1e-12);
    }
}
