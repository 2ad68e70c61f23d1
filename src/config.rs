//! Solver configuration, threaded explicitly through every backend call.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// All tunables of a solver run.
///
/// Replaces ambient process state (seeds, backend session parameters) with an
/// explicit object, so the same configuration always reproduces the same
/// backend encoding and the same classical sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Shots per circuit execution on the quantum backend.
    pub shots: u32,
    /// QAOA circuit repetitions.
    pub reps: u32,
    /// Independent solve attempts; the best feasible result wins.
    pub max_attempts: u32,
    /// Iteration cap for the classical optimizer inside the backend.
    pub max_iter: u32,
    /// QUBO constraint penalty.
    pub penalty: f64,
    /// Transpiler optimization level.
    pub opt_level: u8,
    /// Matrix-product-state bond dimension of the simulator.
    pub bond_dim: u32,
    /// Largest vertex count a single backend call may receive.
    pub max_qubits: usize,
    /// Largest block size the divide-and-conquer driver produces.
    pub max_block_size: usize,
    /// Seed for every random choice in this crate.
    pub seed: u64,
    /// Path to the Python worker that talks to the quantum SDK.
    pub worker_script: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            shots: 1024,
            reps: 2,
            max_attempts: 12,
            max_iter: 50,
            penalty: 1.5,
            opt_level: 1,
            bond_dim: 16,
            max_qubits: 120,
            max_block_size: 100,
            seed: 42,
            worker_script: "scripts/qaoa_worker.py".to_string(),
        }
    }
}

impl SolverConfig {
    /// Loads a configuration from a JSON file; absent keys keep their
    /// defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ParseError::Malformed(format!("bad config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_test() {
        let config = SolverConfig::default();
        assert_eq!(config.shots, 1024);
        assert_eq!(config.max_qubits, 120);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn partial_json_keeps_defaults_test() {
        let config: SolverConfig = serde_json::from_str(r#"{"shots": 64, "seed": 7}"#).unwrap();
        assert_eq!(config.shots, 64);
        assert_eq!(config.seed, 7);
        assert_eq!(config.reps, 2);
    }
}
