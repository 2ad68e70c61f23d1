//! Renders a comparison image for one instance: the graph, the reference
//! solution and the computed solution in a single SVG. Pure beyond writing
//! the output file.

use std::fs;
use std::path::Path;

use log::info;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RenderError;
use crate::graph::Graph;
use crate::solution::Solution;

/// Fixed layout seed so re-rendering an instance yields the same image.
pub const LAYOUT_SEED: u64 = 42;

const LAYOUT_ITERATIONS: usize = 50;
const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 60.0;
const NODE_RADIUS: f64 = 6.0;
/// Vertex id labels are drawn only for graphs up to this size.
const LABEL_NODE_LIMIT: usize = 64;

/// Computes a Fruchterman-Reingold spring layout with positions normalized
/// to the unit square. Deterministic for a given seed.
pub fn spring_layout(graph: &Graph, seed: u64, iterations: usize) -> Array2<f64> {
    let n = graph.num_nodes();
    let mut pos = Array2::<f64>::zeros((n, 2));
    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..n {
        for d in 0..2 {
            pos[[i, d]] = rng.gen_range(0.0..1.0);
        }
    }
    if n <= 1 {
        return pos;
    }

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);
    for _ in 0..iterations {
        let mut disp = Array2::<f64>::zeros((n, 2));
        // repulsive forces between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[[i, 0]] - pos[[j, 0]];
                let dy = pos[[i, 1]] - pos[[j, 1]];
                let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / dist;
                disp[[i, 0]] += dx / dist * force;
                disp[[i, 1]] += dy / dist * force;
                disp[[j, 0]] -= dx / dist * force;
                disp[[j, 1]] -= dy / dist * force;
            }
        }
        // attractive forces along edges
        for (u, v) in graph.edges() {
            let dx = pos[[u, 0]] - pos[[v, 0]];
            let dy = pos[[u, 1]] - pos[[v, 1]];
            let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = dist * dist / k;
            disp[[u, 0]] -= dx / dist * force;
            disp[[u, 1]] -= dy / dist * force;
            disp[[v, 0]] += dx / dist * force;
            disp[[v, 1]] += dy / dist * force;
        }
        for i in 0..n {
            let dx = disp[[i, 0]];
            let dy = disp[[i, 1]];
            let len = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = len.min(temperature);
            pos[[i, 0]] += dx / len * step;
            pos[[i, 1]] += dy / len * step;
        }
        temperature -= cooling;
    }

    // normalize to the unit square
    for d in 0..2 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..n {
            min = min.min(pos[[i, d]]);
            max = max.max(pos[[i, d]]);
        }
        let span = (max - min).max(1e-9);
        for i in 0..n {
            pos[[i, d]] = (pos[[i, d]] - min) / span;
        }
    }
    pos
}

fn node_color(node: usize, reference: &Solution, computed: &Solution) -> &'static str {
    match (reference.contains(node), computed.contains(node)) {
        (true, true) => "purple",
        (true, false) => "green",
        (false, true) => "red",
        (false, false) => "lightgray",
    }
}

/// Assembles the comparison SVG as a string.
pub fn render_svg(graph: &Graph, reference: &Solution, computed: &Solution, title: &str) -> String {
    let n = graph.num_nodes();
    let pos = spring_layout(graph, LAYOUT_SEED, LAYOUT_ITERATIONS);
    let x = |i: usize| MARGIN + pos[[i, 0]] * (WIDTH - 2.0 * MARGIN);
    let y = |i: usize| MARGIN + pos[[i, 1]] * (HEIGHT - 2.0 * MARGIN);

    let mut svg = format!(
        r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">
<rect width="100%" height="100%" fill="white"/>
<text x="{}" y="30" font-family="Arial" font-size="18" text-anchor="middle">{}</text>
"#,
        WIDTH,
        HEIGHT,
        WIDTH / 2.0,
        title
    );

    for (u, v) in graph.edges() {
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="1" stroke-opacity="0.15"/>
"#,
            x(u),
            y(u),
            x(v),
            y(v)
        ));
    }

    for node in graph.nodes() {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}" stroke="black" stroke-width="0.5"/>
"#,
            x(node),
            y(node),
            NODE_RADIUS,
            node_color(node, reference, computed)
        ));
        if n <= LABEL_NODE_LIMIT {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-family="Arial" font-size="9" font-weight="bold" text-anchor="middle">{}</text>
"#,
                x(node),
                y(node) - NODE_RADIUS - 2.0,
                node + 1
            ));
        }
    }

    // legend
    let legend = [
        ("green", "Provided Solution"),
        ("purple", "Both Solutions"),
        ("red", "Our Solution"),
        ("lightgray", "Unselected"),
    ];
    for (i, (color, label)) in legend.iter().enumerate() {
        let ly = HEIGHT - MARGIN + 14.0 * (i as f64 + 1.0) - 40.0;
        svg.push_str(&format!(
            r#"<circle cx="{}" cy="{:.1}" r="5" fill="{}" stroke="black" stroke-width="0.5"/>
<text x="{}" y="{:.1}" font-family="Arial" font-size="11">{}</text>
"#,
            WIDTH - 180.0,
            ly,
            color,
            WIDTH - 168.0,
            ly + 4.0,
            label
        ));
    }

    // stats box
    let stats = [
        format!("Nodes: {}", n),
        format!("Edges: {}", graph.num_edges()),
        format!("Provided: {}", reference.size()),
        format!("Our: {}", computed.size()),
    ];
    svg.push_str(
        "<rect x=\"10\" y=\"10\" width=\"130\" height=\"66\" fill=\"white\" fill-opacity=\"0.8\" stroke=\"black\" stroke-width=\"0.5\" rx=\"4\"/>\n",
    );
    for (i, line) in stats.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="18" y="{}" font-family="Arial" font-size="11">{}</text>
"#,
            25 + i * 15,
            line
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Reads the three inputs and writes the comparison image to `out_path`.
pub fn render(
    graph_path: &Path,
    reference_path: &Path,
    computed_path: &Path,
    out_path: &Path,
) -> Result<(), RenderError> {
    for path in [graph_path, reference_path, computed_path] {
        if !path.is_file() {
            return Err(RenderError::MissingInput(path.to_path_buf()));
        }
    }
    let graph = Graph::load(graph_path)?;
    let reference = Solution::load(reference_path)?;
    let computed = Solution::load(computed_path)?;
    let title = graph_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("instance");
    let svg = render_svg(&graph, &reference, &computed, title);
    fs::write(out_path, svg)?;
    info!("Wrote {}", out_path.display());
    Ok(())
}
