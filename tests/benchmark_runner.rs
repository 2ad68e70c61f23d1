use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use misbench::benchmark::{run_benchmark, BenchmarkOpts, BenchmarkRecord};
use misbench::config::SolverConfig;
use misbench::error::SolveError;
use misbench::graph::Graph;
use misbench::infrastructure::{AnnealingSolver, QuantumSolver};

/// Backend double that stalls on graphs at or above `slow_from` vertices and
/// otherwise selects every vertex (the fixtures keep those graphs edgeless).
struct SleepSolver {
    slow_from: usize,
    delay: Duration,
}

impl QuantumSolver for SleepSolver {
    fn solve(&self, graph: &Graph, _config: &SolverConfig) -> Result<Vec<usize>, SolveError> {
        if graph.num_nodes() >= self.slow_from {
            thread::sleep(self.delay);
        }
        Ok(graph.nodes().collect())
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn name(&self) -> &str {
        "sleepy"
    }
}

struct FailingSolver;

impl QuantumSolver for FailingSolver {
    fn solve(&self, _graph: &Graph, _config: &SolverConfig) -> Result<Vec<usize>, SolveError> {
        Err(SolveError::Backend("simulated backend outage".into()))
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("misbench_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("instances")).unwrap();
        fs::create_dir_all(root.join("solutions")).unwrap();
        Workspace { root }
    }

    fn write_instance(&self, name: &str, contents: &str) {
        fs::write(self.root.join("instances").join(name), contents).unwrap();
    }

    fn opts(&self) -> BenchmarkOpts {
        BenchmarkOpts {
            instance_dir: self.root.join("instances"),
            solutions_dir: self.root.join("solutions"),
            generated_dir: self.root.join("solutionstemp"),
            output_file: self.root.join("stats.csv"),
            timeout: Duration::from_secs(5),
            fallback_timeout: Duration::from_secs(5),
            config: SolverConfig::default(),
        }
    }

    fn csv_rows(&self) -> Vec<String> {
        fs::read_to_string(self.root.join("stats.csv"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn field<'a>(row: &'a str, idx: usize) -> &'a str {
    row.split(',').nth(idx).unwrap()
}

#[test]
fn timeout_row_is_recorded_and_batch_continues() {
    let ws = Workspace::new("timeout");
    // a_slow sorts first so the timeout must not abort the batch
    ws.write_instance("a_slow.gph", "p edge 4 0\n");
    ws.write_instance("b_fast.gph", "p edge 3 0\n");
    let mut opts = ws.opts();
    opts.timeout = Duration::from_millis(100);
    opts.fallback_timeout = Duration::from_millis(100);
    let solver = Arc::new(SleepSolver { slow_from: 4, delay: Duration::from_millis(600) });
    let recorded = run_benchmark(&opts, solver).unwrap();
    assert_eq!(recorded, 2);

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], BenchmarkRecord::HEADER);

    let slow = &rows[1];
    assert_eq!(field(slow, 0), "a_slow");
    assert_eq!(field(slow, 4), "", "timeout rows carry no objective");
    assert_eq!(field(slow, 8), "1", "timeout flag set");
    assert_eq!(field(slow, 9), "1", "fallback was attempted");

    let fast = &rows[2];
    assert_eq!(field(fast, 0), "b_fast");
    assert_eq!(field(fast, 4), "3");
    assert_eq!(field(fast, 7), "1", "feasible flag set");
    assert_eq!(field(fast, 8), "0");
}

#[test]
fn failed_row_carries_error_kind_and_batch_continues() {
    let ws = Workspace::new("failure");
    ws.write_instance("a.gph", "p edge 3 0\n");
    ws.write_instance("b.gph", "p edge 3 0\n");
    let recorded = run_benchmark(&ws.opts(), Arc::new(FailingSolver)).unwrap();
    assert_eq!(recorded, 2);

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(field(&rows[1], 10), "backend");
    assert_eq!(field(&rows[2], 10), "backend");
}

#[test]
fn malformed_instance_is_skipped_without_a_row() {
    let ws = Workspace::new("malformed");
    ws.write_instance("bad.gph", "p edge 2 1\ne 1 7\n");
    ws.write_instance("good.gph", "p edge 2 0\n");
    let solver = Arc::new(AnnealingSolver::new(usize::MAX));
    let recorded = run_benchmark(&ws.opts(), solver).unwrap();
    assert_eq!(recorded, 1);

    let rows = ws.csv_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(field(&rows[1], 0), "good");
}

#[test]
fn reference_solution_feeds_opt_size_and_ratio() {
    let ws = Workspace::new("reference");
    // {1,2,3,4} with edges {(1,2),(3,4)}: optimum 2
    ws.write_instance("pairs.gph", "p edge 4 2\ne 1 2\ne 3 4\n");
    fs::write(ws.root.join("solutions").join("pairs.opt.sol"), "1\n3\n").unwrap();
    let solver = Arc::new(AnnealingSolver::new(usize::MAX));
    let recorded = run_benchmark(&ws.opts(), solver).unwrap();
    assert_eq!(recorded, 1);

    let rows = ws.csv_rows();
    let row = &rows[1];
    assert_eq!(field(row, 3), "2");
    assert_eq!(field(row, 4), "2");
    assert_eq!(field(row, 5), "1.0000");
    assert_eq!(field(row, 7), "1");

    // the computed solution is persisted and round-trips
    let saved =
        misbench::solution::Solution::load(ws.root.join("solutionstemp").join("pairs.sol"))
            .unwrap();
    assert_eq!(saved.size(), 2);
    let graph = Graph::load(ws.root.join("instances").join("pairs.gph")).unwrap();
    assert!(saved.is_independent(&graph));
}

#[test]
fn large_instance_takes_divide_and_conquer_path() {
    let ws = Workspace::new("dnc");
    // path graph on 8 vertices, solver capacity 4 forces decomposition
    let mut gph = String::from("p edge 8 7\n");
    for u in 1..8 {
        gph.push_str(&format!("e {} {}\n", u, u + 1));
    }
    ws.write_instance("path8.gph", &gph);
    let mut opts = ws.opts();
    opts.config.max_block_size = 4;
    let solver = Arc::new(AnnealingSolver::new(4));
    let recorded = run_benchmark(&opts, solver).unwrap();
    assert_eq!(recorded, 1);

    let rows = ws.csv_rows();
    let row = &rows[1];
    assert_eq!(field(row, 7), "1", "merged solution is feasible");
    assert_eq!(field(row, 8), "0");
    // a path on 8 vertices has an independent set of size 4; the heuristic
    // decomposition stays feasible but may land below that
    let size: usize = field(row, 4).parse().unwrap();
    assert!(size >= 3);
}

#[test]
fn missing_instance_dir_is_fatal() {
    let ws = Workspace::new("fatal");
    let mut opts = ws.opts();
    opts.instance_dir = ws.root.join("nowhere");
    let solver = Arc::new(AnnealingSolver::new(usize::MAX));
    assert!(run_benchmark(&opts, solver).is_err());
}
