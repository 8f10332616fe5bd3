//! Cell-centred mesh generation.
//!
//! A mesh is two parallel sequences of length `n`: the cell centres `x` and the
//! cell widths `dx`. Boundary cells always extend half a width from their
//! centre to the wall, so `dx[0] = 2·x[0]` and `dx[n-1] = 2·(L - x[n-1])`, and
//! the widths add up to `L`.
//!
//! Two layouts are supported:
//! - [`MeshKind::Uniform`]: `x[i] = (i + 0.5)·h` with `h = L/n`
//! - [`MeshKind::Clustered`]: cell faces placed by the map
//!   `x(ξ) = L·(ξ - sin(2πξ)/(2π))`, whose derivative vanishes at `ξ = 0, 1`,
//!   so cells shrink toward both walls

use std::f64::consts::PI;

use crate::error::{Fvm1dError, Result};

/// Layout of the control volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MeshKind {
    /// Equal widths `L/n`
    #[default]
    Uniform,
    /// Widths shrinking toward both boundaries
    Clustered,
}

/// Cell centres and widths on `(0, L)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mesh {
    centers: Vec<f64>,
    widths: Vec<f64>,
    length: f64,
}

impl Mesh {
    /// Build a mesh of `cells` control volumes on `(0, length)`.
    pub fn build(cells: usize, length: f64, kind: MeshKind) -> Result<Self> {
        if cells < 1 {
            return Err(Fvm1dError::invalid_problem("cell count must be at least 1"));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(Fvm1dError::invalid_problem(format!(
                "domain length must be positive and finite (got {length})"
            )));
        }

        let mesh = match kind {
            MeshKind::Uniform => Self::uniform(cells, length),
            MeshKind::Clustered => Self::clustered(cells, length),
        };
        log::debug!("built {kind:?} mesh with {cells} cells on (0, {length})");
        Ok(mesh)
    }

    fn uniform(n: usize, length: f64) -> Self {
        let h = length / n as f64;
        let centers: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) * h).collect();

        let mut widths = vec![h; n];
        widths[0] = 2.0 * centers[0];
        widths[n - 1] = 2.0 * (length - centers[n - 1]);

        Self {
            centers,
            widths,
            length,
        }
    }

    fn clustered(n: usize, length: f64) -> Self {
        // Faces are mapped, centres sit halfway between them. The end faces are
        // pinned so the widths telescope to exactly L.
        let mut faces: Vec<f64> = (0..=n)
            .map(|k| {
                let xi = k as f64 / n as f64;
                length * (xi - (2.0 * PI * xi).sin() / (2.0 * PI))
            })
            .collect();
        faces[0] = 0.0;
        faces[n] = length;

        let centers = faces.windows(2).map(|f| 0.5 * (f[0] + f[1])).collect();
        let widths = faces.windows(2).map(|f| f[1] - f[0]).collect();

        Self {
            centers,
            widths,
            length,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// A mesh always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Domain length `L`.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Cell centre positions, strictly increasing inside `(0, L)`.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Cell widths, all positive.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Distance between the centres of cells `i - 1` and `i`.
    pub fn west_distance(&self, i: usize) -> f64 {
        if i == 0 {
            0.5 * self.widths[0]
        } else {
            0.5 * (self.widths[i - 1] + self.widths[i])
        }
    }

    /// Distance between the centres of cells `i` and `i + 1`.
    pub fn east_distance(&self, i: usize) -> f64 {
        let last = self.len() - 1;
        if i == last {
            0.5 * self.widths[last]
        } else {
            0.5 * (self.widths[i] + self.widths[i + 1])
        }
    }

    /// Split into centres and widths.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.centers, self.widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn assert_invariants(mesh: &Mesh) {
        let n = mesh.len();
        let x = mesh.centers();
        let dx = mesh.widths();
        let l = mesh.length();

        assert!(x.windows(2).all(|w| w[0] < w[1]), "centres must increase");
        assert!(x[0] > 0.0 && x[n - 1] < l);
        assert!(dx.iter().all(|&w| w > 0.0));
        assert_abs_diff_eq!(dx.iter().sum::<f64>(), l, epsilon = 1e-12);
        assert_abs_diff_eq!(dx[0], 2.0 * x[0], epsilon = 1e-12);
        assert_abs_diff_eq!(dx[n - 1], 2.0 * (l - x[n - 1]), epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_mesh() {
        let mesh = Mesh::build(4, 2.0, MeshKind::Uniform).unwrap();
        assert_eq!(mesh.centers(), &[0.25, 0.75, 1.25, 1.75]);
        for &w in mesh.widths() {
            assert_relative_eq!(w, 0.5);
        }
        assert_invariants(&mesh);
    }

    #[test]
    fn test_single_cell_spans_domain() {
        for kind in [MeshKind::Uniform, MeshKind::Clustered] {
            let mesh = Mesh::build(1, 3.0, kind).unwrap();
            assert_relative_eq!(mesh.centers()[0], 1.5);
            assert_relative_eq!(mesh.widths()[0], 3.0);
        }
    }

    #[test]
    fn test_widths_sum_to_length() {
        for &n in &[1usize, 2, 3, 7, 50, 333] {
            for kind in [MeshKind::Uniform, MeshKind::Clustered] {
                let mesh = Mesh::build(n, 1.7, kind).unwrap();
                assert_eq!(mesh.len(), n);
                assert_invariants(&mesh);
            }
        }
    }

    #[test]
    fn test_clustered_refines_walls() {
        let mesh = Mesh::build(40, 1.0, MeshKind::Clustered).unwrap();
        let dx = mesh.widths();
        assert!(dx[0] < 0.1 * dx[20]);
        assert!(dx[39] < 0.1 * dx[20]);
        // Symmetric about the midpoint
        assert_relative_eq!(dx[0], dx[39], max_relative = 1e-9);
    }

    #[test]
    fn test_centre_distances() {
        let mesh = Mesh::build(5, 1.0, MeshKind::Clustered).unwrap();
        let x = mesh.centers();
        assert_relative_eq!(mesh.west_distance(0), x[0], max_relative = 1e-12);
        assert_relative_eq!(mesh.west_distance(3), x[3] - x[2], max_relative = 1e-12);
        assert_relative_eq!(mesh.east_distance(4), 1.0 - x[4], max_relative = 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Mesh::build(0, 1.0, MeshKind::Uniform).is_err());
        assert!(Mesh::build(3, 0.0, MeshKind::Clustered).is_err());
    }
}
