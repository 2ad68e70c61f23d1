//! Timeout-wrapped benchmark runner: iterates over an instance library,
//! solves each graph under a wall-clock bound and appends one row per run to
//! the results table. No per-instance outcome ever aborts the batch.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::algorithms::{AlgorithmTrait, DivideAndConquer, SingleRun, SolveArgs, SolveOutcome};
use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::graph::Graph;
use crate::infrastructure::QuantumSolver;
use crate::solution;

/// Instances at or above this vertex count are skipped outright.
pub const HARD_NODE_CAP: usize = 1000;

/// Everything one benchmark run needs besides the backend itself.
#[derive(Debug, Clone)]
pub struct BenchmarkOpts {
    pub instance_dir: PathBuf,
    pub solutions_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub output_file: PathBuf,
    pub timeout: Duration,
    pub fallback_timeout: Duration,
    pub config: SolverConfig,
}

/// One row of the results table. Append-only, never mutated.
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    pub graph: String,
    pub nodes: usize,
    pub edges: usize,
    pub opt_size: usize,
    pub size: Option<usize>,
    pub ratio: Option<f64>,
    pub time: Duration,
    pub feasible: bool,
    pub timeout: bool,
    pub fallback: bool,
    pub error: Option<String>,
}

impl BenchmarkRecord {
    pub const HEADER: &'static str =
        "Graph,Nodes,Edges,OptSize,Size,Ratio,Time,Feasible,Timeout,Fallback,Error";

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.3},{},{},{},{}",
            self.graph,
            self.nodes,
            self.edges,
            self.opt_size,
            self.size.map(|s| s.to_string()).unwrap_or_default(),
            self.ratio.map(|r| format!("{:.4}", r)).unwrap_or_default(),
            self.time.as_secs_f64(),
            self.feasible as u8,
            self.timeout as u8,
            self.fallback as u8,
            self.error.as_deref().unwrap_or(""),
        )
    }
}

/// Appends `record` to the CSV at `path`, writing the header only when the
/// file is new.
pub fn append_record(path: &Path, record: &BenchmarkRecord) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{}", BenchmarkRecord::HEADER)?;
    }
    writeln!(file, "{}", record.to_csv_row())
}

enum RunStatus {
    Done(SolveOutcome),
    Failed(SolveError),
    TimedOut,
}

/// Runs one solve on a worker thread and waits at most `timeout` for it.
///
/// On expiry the worker is abandoned; whatever it later sends lands in a
/// closed channel and is discarded, so a timed-out instance cannot corrupt
/// later iterations.
fn solve_with_timeout(
    graph: &Graph,
    config: &SolverConfig,
    solver: &Arc<dyn QuantumSolver>,
    decompose: bool,
    timeout: Duration,
) -> RunStatus {
    let (tx, rx) = mpsc::channel();
    let graph = graph.clone();
    let config = config.clone();
    let solver = Arc::clone(solver);
    thread::spawn(move || {
        let args = SolveArgs { graph: &graph, config: &config, solver: solver.as_ref() };
        let result =
            if decompose { DivideAndConquer.run(args) } else { SingleRun.run(args) };
        let _ = tx.send(result);
    });
    match rx.recv_timeout(timeout) {
        Ok(Ok(outcome)) => RunStatus::Done(outcome),
        Ok(Err(e)) => RunStatus::Failed(e),
        Err(_) => RunStatus::TimedOut,
    }
}

/// Runs the whole benchmark batch. Returns the number of recorded rows.
///
/// Only a process-level misconfiguration (unreadable instance directory,
/// unwritable results file) is fatal; every per-instance failure is logged,
/// recorded where applicable, and skipped.
pub fn run_benchmark(
    opts: &BenchmarkOpts,
    solver: Arc<dyn QuantumSolver>,
) -> Result<usize, Box<dyn Error>> {
    let mut instances: Vec<PathBuf> = fs::read_dir(&opts.instance_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "gph"))
        .collect();
    instances.sort();
    fs::create_dir_all(&opts.generated_dir)?;
    info!(
        "Benchmarking {} instances with backend '{}' (timeout {}, fallback {})",
        instances.len(),
        solver.name(),
        humantime::format_duration(opts.timeout),
        humantime::format_duration(opts.fallback_timeout),
    );

    let mut recorded = 0;
    for path in instances {
        let name = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        info!("Processing: {}", name);
        let graph = match Graph::load(&path) {
            Ok(graph) => graph,
            Err(e) => {
                warn!("skipping {}: {}", name, e);
                continue;
            }
        };
        if graph.num_nodes() >= HARD_NODE_CAP {
            warn!(
                "skipping {}: {} nodes is at or above the {}-node cap",
                name,
                graph.num_nodes(),
                HARD_NODE_CAP
            );
            continue;
        }
        let opt_size = match solution::find_reference(&opts.solutions_dir, &name) {
            Some((ref_path, reference)) => {
                if !reference.is_independent(&graph) {
                    warn!("reference {} violates independence", ref_path.display());
                }
                info!("Loaded reference from {} with size {}", ref_path.display(), reference.size());
                reference.size()
            }
            None => {
                info!("No reference solution found for {}", name);
                0
            }
        };

        let fits = graph.num_nodes() <= solver.capacity();
        if !fits {
            info!("{} exceeds backend capacity, starting divide-and-conquer solver", name);
        }
        let mut fallback = false;
        let mut start = Instant::now();
        let mut status = solve_with_timeout(&graph, &opts.config, &solver, !fits, opts.timeout);
        if matches!(status, RunStatus::TimedOut) && fits {
            warn!(
                "{} exceeded {}, falling back to divide-and-conquer",
                name,
                humantime::format_duration(opts.timeout)
            );
            fallback = true;
            start = Instant::now();
            status = solve_with_timeout(&graph, &opts.config, &solver, true, opts.fallback_timeout);
        }
        let elapsed = start.elapsed();

        let record = match status {
            RunStatus::Done(outcome) => {
                let feasible = outcome.solution.is_independent(&graph);
                if !feasible {
                    warn!("{}: solver returned an infeasible solution", name);
                }
                let size = outcome.solution.size();
                let ratio =
                    if opt_size > 0 { Some(size as f64 / opt_size as f64) } else { None };
                let sol_path = opts.generated_dir.join(format!("{}.sol", name));
                if let Err(e) = outcome.solution.save(&sol_path, &name, graph.num_nodes()) {
                    warn!("failed to write {}: {}", sol_path.display(), e);
                }
                info!(
                    " -> {}: {} | Opt: {} | Time: {:.3}s",
                    solver.name(),
                    size,
                    opt_size,
                    elapsed.as_secs_f64()
                );
                BenchmarkRecord {
                    graph: name,
                    nodes: graph.num_nodes(),
                    edges: graph.num_edges(),
                    opt_size,
                    size: Some(size),
                    ratio,
                    time: elapsed,
                    feasible,
                    timeout: false,
                    fallback,
                    error: None,
                }
            }
            RunStatus::Failed(e) => {
                warn!("{} failed: {}", name, e);
                BenchmarkRecord {
                    graph: name,
                    nodes: graph.num_nodes(),
                    edges: graph.num_edges(),
                    opt_size,
                    size: None,
                    ratio: None,
                    time: elapsed,
                    feasible: false,
                    timeout: false,
                    fallback,
                    error: Some(e.kind().to_string()),
                }
            }
            RunStatus::TimedOut => {
                warn!("{} timed out, no solution recorded", name);
                BenchmarkRecord {
                    graph: name,
                    nodes: graph.num_nodes(),
                    edges: graph.num_edges(),
                    opt_size,
                    size: None,
                    ratio: None,
                    time: elapsed,
                    feasible: false,
                    timeout: true,
                    fallback,
                    error: None,
                }
            }
        };
        append_record(&opts.output_file, &record)?;
        recorded += 1;
    }
    Ok(recorded)
}
