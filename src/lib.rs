// Description: This library benchmarks quantum and classical independent-set
// solvers on a fixed instance library and renders comparison images.

use std::io::ErrorKind;

pub mod algorithms;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod graph;
pub mod infrastructure;
pub mod solution;
pub mod visualize;

pub use algorithms::AlgorithmTrait;

/// Sets up the global logger: stdout always, plus a log file when given.
/// An existing log file is truncated so each run starts fresh.
pub fn setup_logger(log_path: Option<&str>) -> Result<(), fern::InitError> {
    if let Some(path) = log_path {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                return Err(fern::InitError::Io(e));
            }
        }
    }

    // debug detail only goes to runs that keep a log file
    let level =
        if log_path.is_some() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());
    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}
