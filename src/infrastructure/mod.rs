use std::str::FromStr;
use std::sync::Arc;

use crate::config::SolverConfig;
use crate::error::{ParseError, SolveError};
use crate::graph::Graph;

/// Backends supported by misbench
/// - Qaoa: QAOA on the quantum SDK, reached through a Python worker process.
/// - Annealing: classical in-process baseline, deterministic given the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    Qaoa,
    Annealing,
}

impl FromStr for SolverKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qaoa" => Ok(SolverKind::Qaoa),
            "annealing" => Ok(SolverKind::Annealing),
            _ => Err(ParseError::Malformed(format!("unknown solver kind: {}", s))),
        }
    }
}

/// Trait for combinatorial-optimization backends
/// - solve: Run one independent-set solve over the whole given graph.
/// - capacity: Largest vertex count a single call may receive.
/// - name: Backend name for logs and records.
pub trait QuantumSolver: Send + Sync {
    fn solve(&self, graph: &Graph, config: &SolverConfig) -> Result<Vec<usize>, SolveError>;
    fn capacity(&self) -> usize;
    fn name(&self) -> &str;
}

/// Builds the backend for `kind` under `config`.
pub fn create_solver(kind: SolverKind, config: &SolverConfig) -> Arc<dyn QuantumSolver> {
    match kind {
        SolverKind::Qaoa => Arc::new(QaoaWorkerSolver::new(config)),
        SolverKind::Annealing => Arc::new(AnnealingSolver::new(config.max_qubits)),
    }
}

pub mod annealing;
pub mod qaoa_worker;
pub use annealing::AnnealingSolver;
pub use qaoa_worker::QaoaWorkerSolver;
