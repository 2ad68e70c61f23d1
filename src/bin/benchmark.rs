//! Binary that runs the benchmark batch: solves every instance in a
//! directory under a per-instance timeout and appends one row per run to the
//! results CSV.

use std::error;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use misbench::benchmark::{run_benchmark, BenchmarkOpts};
use misbench::config::SolverConfig;
use misbench::infrastructure::{create_solver, SolverKind};
use misbench::setup_logger;

const USAGE: &str = "Usage: benchmark <instances-dir> [options]
Options:
    --solutions <dir>         reference solutions directory (default: solutions)
    --generated <dir>         computed solutions directory (default: solutionstemp)
    --output <csv>            results table (default: benchmark_stats_all.csv)
    --timeout <dur>           per-instance timeout, e.g. 30m (default: 2h)
    --fallback-timeout <dur>  divide-and-conquer fallback timeout (default: 3h)
    --solver <qaoa|annealing> backend (default: qaoa)
    --config <json>           solver configuration file
    --log <file>              also write a debug log file";

struct CliArgs {
    opts: BenchmarkOpts,
    solver: SolverKind,
    log_file: Option<String>,
}

fn parse_args() -> Result<CliArgs, Box<dyn error::Error>> {
    let mut args = std::env::args().skip(1);
    let instance_dir = match args.next() {
        Some(dir) if !dir.starts_with("--") => PathBuf::from(dir),
        _ => return Err("missing <instances-dir>".into()),
    };
    let mut opts = BenchmarkOpts {
        instance_dir,
        solutions_dir: PathBuf::from("solutions"),
        generated_dir: PathBuf::from("solutionstemp"),
        output_file: PathBuf::from("benchmark_stats_all.csv"),
        timeout: Duration::from_secs(7200),
        fallback_timeout: Duration::from_secs(10800),
        config: SolverConfig::default(),
    };
    let mut solver = SolverKind::Qaoa;
    let mut log_file = None;
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--solutions" => opts.solutions_dir = PathBuf::from(value()?),
            "--generated" => opts.generated_dir = PathBuf::from(value()?),
            "--output" => opts.output_file = PathBuf::from(value()?),
            "--timeout" => opts.timeout = humantime::parse_duration(&value()?)?,
            "--fallback-timeout" => opts.fallback_timeout = humantime::parse_duration(&value()?)?,
            "--solver" => solver = value()?.parse()?,
            "--config" => opts.config = SolverConfig::from_file(value()?)?,
            "--log" => log_file = Some(value()?),
            _ => return Err(format!("unknown flag: {}", flag).into()),
        }
    }
    Ok(CliArgs { opts, solver, log_file })
}

pub fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {}\n{}", e, USAGE);
            exit(2);
        }
    };
    if let Err(e) = setup_logger(cli.log_file.as_deref()) {
        eprintln!("error: failed to set up logger: {}", e);
        exit(1);
    }
    let solver = create_solver(cli.solver, &cli.opts.config);
    match run_benchmark(&cli.opts, solver) {
        Ok(recorded) => {
            log::info!("Benchmark finished, {} rows recorded", recorded);
        }
        Err(e) => {
            log::error!("Benchmark aborted: {}", e);
            exit(1);
        }
    }
}
