//! Problem definition for the steady 1D boundary-value problem.
//!
//! A [`Problem`] bundles the equation coefficients, the domain length, the
//! Dirichlet values, the mesh request and the source term. It is validated
//! once on construction and never mutated afterwards; refinement studies derive
//! new problems through [`Problem::with_cells`].

mod validate;

pub use validate::validate_problem;

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::mesh::MeshKind;

/// Source term `f(x)` of the equation.
///
/// Shared behind an `Arc` so problems can be cloned cheaply and handed to
/// worker threads.
pub type SourceFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A validated boundary-value problem `-a·u'' + b·u' + c·u = f` on `(0, L)`.
#[derive(Clone)]
pub struct Problem {
    a: f64,
    b: f64,
    c: f64,
    length: f64,
    u0: f64,
    u_l: f64,
    cells: usize,
    mesh_kind: MeshKind,
    source: SourceFn,
}

impl Problem {
    /// Start building a problem from the default configuration.
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::default()
    }

    /// Diffusion coefficient `a`.
    pub fn diffusion(&self) -> f64 {
        self.a
    }

    /// Convection coefficient `b`.
    pub fn convection(&self) -> f64 {
        self.b
    }

    /// Reaction coefficient `c`.
    pub fn reaction(&self) -> f64 {
        self.c
    }

    /// Domain length `L`.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Dirichlet value at `x = 0`.
    pub fn u0(&self) -> f64 {
        self.u0
    }

    /// Dirichlet value at `x = L`.
    pub fn u_l(&self) -> f64 {
        self.u_l
    }

    /// Number of control volumes.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Requested mesh layout.
    pub fn mesh_kind(&self) -> MeshKind {
        self.mesh_kind
    }

    /// Nominal mesh size `L / n`.
    pub fn mesh_size(&self) -> f64 {
        self.length / self.cells as f64
    }

    /// Evaluate the source term.
    pub fn source(&self, x: f64) -> f64 {
        (self.source)(x)
    }

    /// The same problem on a different number of cells.
    pub fn with_cells(&self, cells: usize) -> Result<Self> {
        let problem = Self {
            cells,
            ..self.clone()
        };
        validate_problem(&problem)?;
        Ok(problem)
    }

    /// The same problem on a different mesh layout.
    pub fn with_mesh_kind(&self, mesh_kind: MeshKind) -> Self {
        Self {
            mesh_kind,
            ..self.clone()
        }
    }

    /// Manufactured problem with exact solution `u(x) = sin(πx/L)`.
    ///
    /// The source is chosen so that `-a·u'' + b·u' + c·u = f` holds exactly;
    /// both Dirichlet values are zero. Returns the problem together with the
    /// exact solution.
    pub fn sine_manufactured(
        a: f64,
        b: f64,
        c: f64,
        length: f64,
        cells: usize,
    ) -> Result<(Self, impl Fn(f64) -> f64 + Clone + Send + Sync)> {
        let k = PI / length;
        let problem = Self::builder()
            .coefficients(a, b, c)
            .length(length)
            .boundary_values(0.0, 0.0)
            .cells(cells)
            .source(move |x| (a * k * k + c) * (k * x).sin() + b * k * (k * x).cos())
            .build()?;
        Ok((problem, move |x: f64| (k * x).sin()))
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("c", &self.c)
            .field("length", &self.length)
            .field("u0", &self.u0)
            .field("u_l", &self.u_l)
            .field("cells", &self.cells)
            .field("mesh_kind", &self.mesh_kind)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Problem`].
///
/// Defaults: `a = 1`, `b = c = 0`, `L = 1`, `u0 = uL = 0`, 10 uniform cells and
/// a zero source.
#[derive(Clone)]
pub struct ProblemBuilder {
    a: f64,
    b: f64,
    c: f64,
    length: f64,
    u0: f64,
    u_l: f64,
    cells: usize,
    mesh_kind: MeshKind,
    source: SourceFn,
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            length: 1.0,
            u0: 0.0,
            u_l: 0.0,
            cells: 10,
            mesh_kind: MeshKind::Uniform,
            source: Arc::new(|_| 0.0),
        }
    }
}

impl ProblemBuilder {
    /// Set the equation coefficients `a` (diffusion), `b` (convection), `c` (reaction).
    pub fn coefficients(mut self, a: f64, b: f64, c: f64) -> Self {
        self.a = a;
        self.b = b;
        self.c = c;
        self
    }

    /// Set the domain length `L`.
    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Set the Dirichlet values at both ends.
    pub fn boundary_values(mut self, u0: f64, u_l: f64) -> Self {
        self.u0 = u0;
        self.u_l = u_l;
        self
    }

    /// Set the number of control volumes.
    pub fn cells(mut self, cells: usize) -> Self {
        self.cells = cells;
        self
    }

    /// Choose uniform or clustered cells.
    pub fn mesh_kind(mut self, mesh_kind: MeshKind) -> Self {
        self.mesh_kind = mesh_kind;
        self
    }

    /// Shorthand for the uniformity flag.
    pub fn uniform(self, uniform: bool) -> Self {
        self.mesh_kind(if uniform {
            MeshKind::Uniform
        } else {
            MeshKind::Clustered
        })
    }

    /// Set the source term.
    pub fn source<F>(mut self, source: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.source = Arc::new(source);
        self
    }

    /// Set a constant source term.
    pub fn constant_source(self, value: f64) -> Self {
        self.source(move |_| value)
    }

    /// Validate and build the problem.
    pub fn build(self) -> Result<Problem> {
        let problem = Problem {
            a: self.a,
            b: self.b,
            c: self.c,
            length: self.length,
            u0: self.u0,
            u_l: self.u_l,
            cells: self.cells,
            mesh_kind: self.mesh_kind,
            source: self.source,
        };
        validate_problem(&problem)?;
        Ok(problem)
    }
}
