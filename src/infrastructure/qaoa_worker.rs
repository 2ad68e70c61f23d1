//! QAOA backend adapter. The quantum SDK lives on the Python side; this
//! module hands it one job per call through a worker process and parses the
//! JSON reply from its stdout.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::graph::Graph;
use crate::infrastructure::QuantumSolver;

/// One solve job as handed to the worker.
///
/// Vertices are implicit (`0..num_nodes`) and edges are emitted in ascending
/// order, so the same graph always serializes to the same payload.
#[derive(Debug, Serialize)]
struct WorkerJob {
    num_nodes: usize,
    edges: Vec<(usize, usize)>,
    shots: u32,
    reps: u32,
    max_attempts: u32,
    max_iter: u32,
    penalty: f64,
    opt_level: u8,
    bond_dim: u32,
}

#[derive(Debug, Deserialize)]
struct WorkerReply {
    nodes: Vec<usize>,
}

/// Runs QAOA solves through the Python worker script.
pub struct QaoaWorkerSolver {
    script: String,
    capacity: usize,
}

impl QaoaWorkerSolver {
    pub fn new(config: &SolverConfig) -> Self {
        QaoaWorkerSolver {
            script: config.worker_script.clone(),
            capacity: config.max_qubits,
        }
    }
}

impl QuantumSolver for QaoaWorkerSolver {
    fn solve(&self, graph: &Graph, config: &SolverConfig) -> Result<Vec<usize>, SolveError> {
        // 1. Serialize the job
        let start_serialize = Instant::now();
        let job = WorkerJob {
            num_nodes: graph.num_nodes(),
            edges: graph.edges().collect(),
            shots: config.shots,
            reps: config.reps,
            max_attempts: config.max_attempts,
            max_iter: config.max_iter,
            penalty: config.penalty,
            opt_level: config.opt_level,
            bond_dim: config.bond_dim,
        };
        let payload = serde_json::to_string(&job).map_err(|e| {
            error!("Failed to serialize worker job: {}", e);
            SolveError::Backend(format!("job serialization failed: {}", e))
        })?;
        debug!("Job serialized in {:?}", start_serialize.elapsed());

        // 2. Start the worker process
        let start_worker = Instant::now();
        let mut process = Command::new("python")
            .arg(&self.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to start worker process '{}': {}", self.script, e);
                SolveError::Backend(format!("failed to start worker: {}", e))
            })?;
        {
            let stdin = process
                .stdin
                .as_mut()
                .ok_or_else(|| SolveError::Backend("worker stdin unavailable".into()))?;
            stdin.write_all(payload.as_bytes()).map_err(|e| {
                error!("Failed to write job to worker: {}", e);
                SolveError::Backend(format!("failed to write job: {}", e))
            })?;
        }

        // 3. Collect the output
        let output = process.wait_with_output().map_err(|e| {
            error!("Failed to wait on worker process: {}", e);
            SolveError::Backend(format!("failed to wait on worker: {}", e))
        })?;
        debug!("Worker finished in {:?}", start_worker.elapsed());
        if !output.status.success() {
            error!("Worker exited with {}", output.status);
            return Err(SolveError::Backend(format!("worker exited with {}", output.status)));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);

        // The worker may print progress lines; the result is the JSON line.
        let json_line = stdout
            .lines()
            .find(|line| line.trim_start().starts_with('{'))
            .ok_or_else(|| {
                error!("Worker output does not contain JSON:\n{}", stdout);
                SolveError::Backend("worker output does not contain JSON".into())
            })?;
        let reply: WorkerReply = serde_json::from_str(json_line).map_err(|e| {
            error!("Worker output is not valid JSON: {}\nRaw output:\n{}", e, stdout);
            SolveError::Backend(format!("worker output is not valid JSON: {}", e))
        })?;
        Ok(reply.nodes)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn name(&self) -> &str {
        "qaoa"
    }
}
