//! Binary that renders one comparison image from a graph file, a reference
//! solution and a computed solution.

use std::path::Path;
use std::process::exit;

use misbench::setup_logger;
use misbench::visualize::render;

pub fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: visualize <graph-file> <reference-solution> <computed-solution> <output-svg>");
        exit(2);
    }
    if let Err(e) = setup_logger(None) {
        eprintln!("error: failed to set up logger: {}", e);
        exit(1);
    }
    if let Err(e) = render(
        Path::new(&args[1]),
        Path::new(&args[2]),
        Path::new(&args[3]),
        Path::new(&args[4]),
    ) {
        log::error!("visualization failed: {}", e);
        exit(1);
    }
}
