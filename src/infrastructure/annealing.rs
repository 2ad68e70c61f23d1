//! Classical baseline backend: best-of-N randomized greedy sampling, fully
//! deterministic given the configured seed. Also serves as the stand-in
//! backend in tests, where a remote quantum service is unavailable.

use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::graph::Graph;
use crate::infrastructure::QuantumSolver;

pub struct AnnealingSolver {
    capacity: usize,
}

impl AnnealingSolver {
    pub fn new(capacity: usize) -> Self {
        AnnealingSolver { capacity }
    }
}

impl QuantumSolver for AnnealingSolver {
    fn solve(&self, graph: &Graph, config: &SolverConfig) -> Result<Vec<usize>, SolveError> {
        let start = Instant::now();
        let nodes: Vec<usize> = graph.nodes().collect();
        let mut best: Vec<usize> = Vec::new();
        for attempt in 0..config.max_attempts.max(1) as u64 {
            // one rng per attempt so attempts are independent and reorderable
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(attempt));
            let mut order = nodes.clone();
            order.shuffle(&mut rng);
            let mut selected = vec![false; graph.num_nodes()];
            let mut candidate = Vec::new();
            for &node in &order {
                if graph.neighbors(node).iter().any(|&neigh| selected[neigh]) {
                    continue;
                }
                selected[node] = true;
                candidate.push(node);
            }
            if candidate.len() > best.len() {
                best = candidate;
            }
        }
        debug!(
            "Annealing sampled {} attempts on {} nodes in {:?}, best size {}",
            config.max_attempts,
            graph.num_nodes(),
            start.elapsed(),
            best.len()
        );
        best.sort_unstable();
        Ok(best)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &str {
        "annealing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Solution;

    #[test]
    fn deterministic_test() {
        let graph = Graph::from_edges(6, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]).unwrap();
        let config = SolverConfig::default();
        let solver = AnnealingSolver::new(usize::MAX);
        let a = solver.solve(&graph, &config).unwrap();
        let b = solver.solve(&graph, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_is_independent_test() {
        let graph = Graph::from_edges(5, vec![(0, 1), (0, 2), (1, 2), (2, 3), (3, 4)]).unwrap();
        let config = SolverConfig::default();
        let solver = AnnealingSolver::new(usize::MAX);
        let nodes = solver.solve(&graph, &config).unwrap();
        assert!(Solution::from_nodes(nodes).is_independent(&graph));
    }

    #[test]
    fn clique_yields_single_vertex_test() {
        let graph =
            Graph::from_edges(4, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]).unwrap();
        let config = SolverConfig::default();
        let solver = AnnealingSolver::new(usize::MAX);
        let nodes = solver.solve(&graph, &config).unwrap();
        assert_eq!(nodes.len(), 1);
    }
}
