//! This module contains all custom errors used in this library.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors raised while reading an instance or solution file.
#[derive(Debug)]
pub enum ParseError {
    IoError(std::io::Error),
    /// The file does not follow the expected line grammar.
    Malformed(String),
    BadInt(std::num::ParseIntError),
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> ParseError {
        ParseError::IoError(e)
    }
}

impl From<std::num::ParseIntError> for ParseError {
    fn from(e: std::num::ParseIntError) -> ParseError {
        ParseError::BadInt(e)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "Parse: IoError: {}", e),
            Self::Malformed(msg) => write!(f, "Parse: input is malformed: {}", msg),
            Self::BadInt(_) => write!(f, "Parse: integer is malformed."),
        }
    }
}

impl Error for ParseError {}

/// Errors raised by a solve strategy or the backend behind it.
#[derive(Debug)]
pub enum SolveError {
    /// The graph does not fit into a single backend call.
    CapacityExceeded { nodes: usize, capacity: usize },
    /// The backend call itself failed (spawn, I/O, bad reply).
    Backend(String),
    /// One block of a decomposed solve failed; the whole call is abandoned.
    PartialSolveFailure { block: usize, source: Box<SolveError> },
    /// The solver returned a vertex set that violates independence.
    InvalidSolution(String),
}

impl SolveError {
    /// Short machine-readable kind, used in the results table.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Backend(_) => "backend",
            Self::PartialSolveFailure { .. } => "partial_solve",
            Self::InvalidSolution(_) => "invalid_solution",
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { nodes, capacity } => {
                write!(f, "graph with {} nodes exceeds backend capacity of {}", nodes, capacity)
            }
            Self::Backend(msg) => write!(f, "backend error: {}", msg),
            Self::PartialSolveFailure { block, source } => {
                write!(f, "block {} of decomposed solve failed: {}", block, source)
            }
            Self::InvalidSolution(msg) => write!(f, "invalid solution: {}", msg),
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PartialSolveFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors raised while rendering a comparison image.
#[derive(Debug)]
pub enum RenderError {
    /// An input file the visualizer needs does not exist.
    MissingInput(PathBuf),
    IoError(std::io::Error),
    Parse(ParseError),
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> RenderError {
        RenderError::IoError(e)
    }
}

impl From<ParseError> for RenderError {
    fn from(e: ParseError) -> RenderError {
        RenderError::Parse(e)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(path) => write!(f, "missing input file: {}", path.display()),
            Self::IoError(e) => write!(f, "Render: IoError: {}", e),
            Self::Parse(e) => write!(f, "Render: {}", e),
        }
    }
}

impl Error for RenderError {}
