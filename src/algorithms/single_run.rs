use std::time::Instant;

use log::debug;

use crate::algorithms::{AlgorithmTrait, SolveArgs, SolveOutcome};
use crate::error::SolveError;
use crate::solution::Solution;

/// One backend call over the whole graph, followed by the greedy repair the
/// raw samples need before the independence invariant can be guaranteed.
pub struct SingleRun;

impl AlgorithmTrait for SingleRun {
    type Args<'a> = SolveArgs<'a>;

    fn run<'a>(&self, args: SolveArgs<'a>) -> Result<SolveOutcome, SolveError> {
        let n = args.graph.num_nodes();
        let capacity = args.solver.capacity();
        if n > capacity {
            return Err(SolveError::CapacityExceeded { nodes: n, capacity });
        }

        let start = Instant::now();
        let raw = args.solver.solve(args.graph, args.config)?;
        if let Some(&bad) = raw.iter().find(|&&node| node >= n) {
            return Err(SolveError::Backend(format!(
                "backend returned out-of-range vertex {}",
                bad
            )));
        }
        let mut solution = Solution::from_nodes(raw);
        let raw_size = solution.size();
        solution.repair(args.graph);
        let elapsed = start.elapsed();
        debug!(
            "{} solved {} nodes in {:?}: raw {} -> repaired {}",
            args.solver.name(),
            n,
            elapsed,
            raw_size,
            solution.size()
        );

        if !solution.is_independent(args.graph) {
            // repair guarantees independence; reaching this is a solver bug
            return Err(SolveError::InvalidSolution(
                "solution still violates independence after repair".into(),
            ));
        }
        Ok(SolveOutcome { solution, elapsed })
    }

    fn name(&self) -> String {
        String::from("Single Run Strategy")
    }

    fn description(&self) -> String {
        String::from("Base strategy to solve a graph with one backend call")
    }
}
