// Additional shared helpers/utilities can be added here
pub mod divide_and_conquer;
pub mod single_run;

pub use crate::algorithms::divide_and_conquer::*;
pub use crate::algorithms::single_run::*;

use std::time::Duration;

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::graph::Graph;
use crate::infrastructure::QuantumSolver;
use crate::solution::Solution;

/// Trait for all solve strategies in misbench.
/// Each strategy should implement this trait for its argument type.
pub trait AlgorithmTrait {
    type Args<'a>;

    /// Run the strategy with the given arguments.
    fn run<'a>(&self, args: Self::Args<'a>) -> Result<SolveOutcome, SolveError>;

    /// Get the strategy's name.
    fn name(&self) -> String;

    /// Get a description of the strategy.
    fn description(&self) -> String;
}

/// Arguments required to run any solve strategy.
#[derive(Clone, Copy)]
pub struct SolveArgs<'a> {
    pub graph: &'a Graph,
    pub config: &'a SolverConfig,
    pub solver: &'a dyn QuantumSolver,
}

/// A finished solve: the feasible solution and the time the backend spent.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub solution: Solution,
    pub elapsed: Duration,
}
