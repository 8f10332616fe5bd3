//! fvm1d - steady 1D convection-diffusion-reaction solver
//!
//! Solves `-a·u'' + b·u' + c·u = f` with Dirichlet boundaries by finite volumes.
//!
//! # Usage
//!
//! ```bash
//! fvm1d solve -a 0.01 -b 1 --u0 0 --ul 1 -n 200 > profile.csv
//! fvm1d stability -a 0.01 -b 1 -n 10
//! fvm1d convergence --sizes 10,20,40,80
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use fvm1d::analysis::{
    analyze_problem, perform_convergence_study, perform_convergence_study_parallel,
};
use fvm1d::{error::Result, FiniteVolumeSolver, MeshKind, Problem, SolverConfig, SolverStrategy};

/// Finite-volume solver for steady 1D boundary-value problems
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the problem and print `x,u` rows
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        solver: SolverArgs,

        /// Also print the two boundary points
        #[arg(long)]
        with_boundary: bool,
    },
    /// Print the Péclet stability report
    Stability {
        #[command(flatten)]
        problem: ProblemArgs,
    },
    /// Run a refinement study on the manufactured solution u = sin(πx/L)
    Convergence {
        #[command(flatten)]
        coefficients: CoefficientArgs,

        /// Ascending cell counts
        #[arg(long, value_delimiter = ',', default_values_t = [10, 20, 40, 80])]
        sizes: Vec<usize>,

        /// Cluster cells toward the walls
        #[arg(long)]
        clustered: bool,

        /// Solve the levels concurrently
        #[arg(long)]
        parallel: bool,

        #[command(flatten)]
        solver: SolverArgs,
    },
}

#[derive(Args, Debug)]
struct CoefficientArgs {
    /// Diffusion coefficient a (>= 0)
    #[arg(short = 'a', long = "diffusion", default_value_t = 1.0, allow_negative_numbers = true)]
    a: f64,

    /// Convection coefficient b
    #[arg(short = 'b', long = "convection", default_value_t = 0.0, allow_negative_numbers = true)]
    b: f64,

    /// Reaction coefficient c
    #[arg(short = 'c', long = "reaction", default_value_t = 0.0, allow_negative_numbers = true)]
    c: f64,

    /// Domain length L
    #[arg(short = 'L', long, default_value_t = 1.0)]
    length: f64,
}

#[derive(Args, Debug)]
struct ProblemArgs {
    #[command(flatten)]
    coefficients: CoefficientArgs,

    /// Value at x = 0
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    u0: f64,

    /// Value at x = L
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    ul: f64,

    /// Number of cells
    #[arg(short = 'n', long, default_value_t = 50)]
    cells: usize,

    /// Cluster cells toward the walls
    #[arg(long)]
    clustered: bool,

    /// Constant source term f
    #[arg(short = 'f', long, default_value_t = 0.0, allow_negative_numbers = true)]
    source: f64,
}

impl ProblemArgs {
    fn build(&self) -> Result<Problem> {
        let CoefficientArgs { a, b, c, length } = self.coefficients;
        Problem::builder()
            .coefficients(a, b, c)
            .length(length)
            .boundary_values(self.u0, self.ul)
            .cells(self.cells)
            .uniform(!self.clustered)
            .constant_source(self.source)
            .build()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Auto,
    Thomas,
    GaussSeidel,
    Sor,
}

impl From<Strategy> for SolverStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Auto => SolverStrategy::Auto,
            Strategy::Thomas => SolverStrategy::Thomas,
            Strategy::GaussSeidel => SolverStrategy::GaussSeidel,
            Strategy::Sor => SolverStrategy::Sor,
        }
    }
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Linear solver
    #[arg(long, value_enum, default_value_t = Strategy::Auto)]
    strategy: Strategy,

    /// Iterative convergence tolerance
    #[arg(long)]
    tolerance: Option<f64>,

    /// Iteration cap for iterative solvers
    #[arg(long)]
    max_iterations: Option<usize>,

    /// SOR relaxation factor
    #[arg(long)]
    relaxation: Option<f64>,
}

impl SolverArgs {
    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::new().with_strategy(self.strategy.into());
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(relaxation) = self.relaxation {
            config = config.with_relaxation(relaxation);
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("logger unavailable: {e}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Solve {
            problem,
            solver,
            with_boundary,
        } => {
            let problem = problem.build()?;
            let outcome = FiniteVolumeSolver::new(solver.config()).solve(&problem)?;
            log::info!(
                "{} solve: {} iterations, converged = {}, {:?}",
                outcome.strategy,
                outcome.iterations,
                outcome.converged,
                outcome.elapsed
            );

            println!("x,u");
            if with_boundary {
                println!("{},{}", 0.0, problem.u0());
            }
            for (x, u) in outcome.solution.iter() {
                println!("{x},{u}");
            }
            if with_boundary {
                println!("{},{}", problem.length(), problem.u_l());
            }
        }
        Command::Stability { problem } => {
            let report = analyze_problem(&problem.build()?);
            println!("{report}");
        }
        Command::Convergence {
            coefficients,
            sizes,
            clustered,
            parallel,
            solver,
        } => {
            let CoefficientArgs { a, b, c, length } = coefficients;
            let first = sizes.first().copied().unwrap_or(1);
            let (problem, exact) = Problem::sine_manufactured(a, b, c, length, first)?;
            let problem = if clustered {
                problem.with_mesh_kind(MeshKind::Clustered)
            } else {
                problem
            };

            let config = solver.config();
            let study = if parallel {
                perform_convergence_study_parallel(&problem, exact, &sizes, &config)?
            } else {
                perform_convergence_study(&problem, exact, &sizes, &config)?
            };

            println!(
                "{:>8} {:>12} {:>12} {:>12} {:>8} {:>12}",
                "n", "h", "L2", "Linf", "order", "time"
            );
            for i in 0..study.len() {
                let order = if i == 0 {
                    String::from("-")
                } else {
                    format!("{:.3}", study.orders[i - 1])
                };
                let flag = if study.converged[i] { "" } else { " *" };
                println!(
                    "{:>8} {:>12.4e} {:>12.4e} {:>12.4e} {:>8} {:>12?}{}",
                    study.mesh_sizes[i],
                    study.step_sizes[i],
                    study.errors[i].l2,
                    study.errors[i].linf,
                    order,
                    study.elapsed[i],
                    flag
                );
            }
            println!("average order: {:.3}", study.average_order);
            if !study.all_converged() {
                println!("* iterative solve hit the iteration cap at this level");
            }
        }
    }

    Ok(())
}
