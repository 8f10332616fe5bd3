//! Discrete solution and interpolation.

use crate::error::{Fvm1dError, Result};
use crate::mesh::Mesh;

/// Cell-centre values together with the mesh they live on.
///
/// Solutions produced by the solver also carry the Dirichlet values, which
/// lets [`Solution::interpolate`] reach the walls instead of flattening out
/// past the first and last cell centres.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    values: Vec<f64>,
    mesh: Mesh,
    boundary: Option<(f64, f64)>,
}

impl Solution {
    /// Pair `values` with `mesh`; the lengths must agree.
    pub fn new(values: Vec<f64>, mesh: Mesh) -> Result<Self> {
        if values.len() != mesh.len() {
            return Err(Fvm1dError::size_mismatch(mesh.len(), values.len()));
        }
        Ok(Self {
            values,
            mesh,
            boundary: None,
        })
    }

    /// Attach the Dirichlet values at `x = 0` and `x = L`.
    pub fn with_boundary_values(mut self, u0: f64, u_l: f64) -> Self {
        self.boundary = Some((u0, u_l));
        self
    }

    /// Cell values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cell centre positions.
    pub fn mesh_points(&self) -> &[f64] {
        self.mesh.centers()
    }

    /// Cell widths.
    pub fn cell_widths(&self) -> &[f64] {
        self.mesh.widths()
    }

    /// Mesh the values live on.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Dirichlet values `(u0, uL)`, when attached.
    pub fn boundary_values(&self) -> Option<(f64, f64)> {
        self.boundary
    }

    /// Number of cell values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a solution built from a mesh.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of cell `i`, if it exists.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// Iterate over `(x, u)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mesh_points().iter().copied().zip(self.values.iter().copied())
    }

    /// Piecewise-linear interpolation at `x`.
    ///
    /// Between cell centres the two neighbouring values are blended linearly.
    /// Between a wall and its nearest centre the Dirichlet value is used as
    /// the wall anchor when known; otherwise the end cell value is held
    /// constant. Outside `[0, L]` the nearest wall (or end cell) value is
    /// returned. A NaN position gives NaN.
    pub fn interpolate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let xs = self.mesh.centers();
        let n = xs.len();
        let first = xs[0];
        let last = xs[n - 1];

        if x <= first {
            return match self.boundary {
                Some((u0, _)) if x <= 0.0 => u0,
                Some((u0, _)) => lerp(0.0, u0, first, self.values[0], x),
                None => self.values[0],
            };
        }
        if x >= last {
            let length = self.mesh.length();
            return match self.boundary {
                Some((_, u_l)) if x >= length => u_l,
                Some((_, u_l)) => lerp(last, self.values[n - 1], length, u_l, x),
                None => self.values[n - 1],
            };
        }

        // first < x < last, so 1 <= upper <= n - 1
        let upper = xs.partition_point(|&xi| xi <= x);
        let lower = upper - 1;
        lerp(
            xs[lower],
            self.values[lower],
            xs[upper],
            self.values[upper],
            x,
        )
    }
}

fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}
