//! Solution sets for the independent set problem: file formats, the
//! independence invariant and the greedy conflict repair.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::ParseError;
use crate::graph::Graph;

/// A set of selected vertices claimed to be independent.
///
/// Vertex ids are 0-based in memory; both file formats store 1-based ids to
/// match the instance numbering.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Solution {
    nodes: BTreeSet<usize>,
}

impl Solution {
    pub fn empty() -> Self {
        Solution { nodes: BTreeSet::new() }
    }

    pub fn from_nodes<I: IntoIterator<Item = usize>>(nodes: I) -> Self {
        Solution { nodes: nodes.into_iter().collect() }
    }

    /// Objective value: the number of selected vertices.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns an iterator over the selected vertices in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().copied()
    }

    /// Checks the independence invariant: every selected vertex exists in
    /// `graph` and no two selected vertices share an edge.
    pub fn is_independent(&self, graph: &Graph) -> bool {
        for &node in &self.nodes {
            if node >= graph.num_nodes() {
                return false;
            }
            if graph.neighbors(node).iter().any(|neigh| self.nodes.contains(neigh)) {
                return false;
            }
        }
        true
    }

    /// Returns all violated edges between selected vertices, with `u < v`.
    pub fn conflicts(&self, graph: &Graph) -> Vec<(usize, usize)> {
        self.nodes
            .iter()
            .flat_map(|&u| {
                graph
                    .neighbors(u)
                    .iter()
                    .filter(move |&&v| u < v && self.nodes.contains(&v))
                    .map(move |&v| (u, v))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Greedily removes vertices until the set is independent.
    ///
    /// Fixed priority for repeatability: the vertex involved in the most
    /// conflicts is dropped first, ties broken by dropping the higher id.
    pub fn repair(&mut self, graph: &Graph) {
        self.nodes.retain(|&node| node < graph.num_nodes());
        loop {
            let conflicts = self.conflicts(graph);
            if conflicts.is_empty() {
                return;
            }
            let mut counts: std::collections::BTreeMap<usize, usize> = Default::default();
            for (u, v) in &conflicts {
                *counts.entry(*u).or_insert(0) += 1;
                *counts.entry(*v).or_insert(0) += 1;
            }
            let worst = counts
                .iter()
                .max_by_key(|(node, count)| (**count, **node))
                .map(|(node, _)| *node)
                .expect("conflicts is not empty");
            self.nodes.remove(&worst);
        }
    }
}

impl Solution {
    /// Reads a solution file.
    ///
    /// Two formats are accepted: the assignment format (`x#<i> <0|1>` per
    /// line) and the index-list format (one selected 1-based vertex id per
    /// line). `#` and `c` lines are comments.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut nodes = BTreeSet::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("c ") || line == "c" {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() == 2 && parts[0].starts_with("x#") {
                // x#<i> <0|1>
                let idx: usize = parts[0][2..].parse()?;
                if idx == 0 {
                    return Err(ParseError::Malformed("variable index 0 in solution".into()));
                }
                match parts[1] {
                    "1" => {
                        nodes.insert(idx - 1);
                    }
                    "0" => {}
                    other => {
                        return Err(ParseError::Malformed(format!(
                            "expected 0 or 1 assignment, found '{}'",
                            other
                        )));
                    }
                }
            } else if parts.len() == 1 {
                let idx: usize = parts[0].parse()?;
                if idx == 0 {
                    return Err(ParseError::Malformed("vertex id 0 in solution".into()));
                }
                nodes.insert(idx - 1);
            } else {
                return Err(ParseError::Malformed(format!("unparseable solution line '{}'", line)));
            }
        }
        Ok(Solution { nodes })
    }

    /// Reads a solution file from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Solution::read(BufReader::new(file))
    }

    /// Writes the assignment format:
    ///
    /// ```text
    /// # Solution for model <name>
    /// # Objective value = <size>
    /// x#1 0
    /// x#2 1
    /// ```
    pub fn write<W: Write>(&self, name: &str, num_nodes: usize, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Solution for model {}", name)?;
        writeln!(writer, "# Objective value = {}", self.size())?;
        for i in 1..=num_nodes {
            let val = if self.nodes.contains(&(i - 1)) { 1 } else { 0 };
            writeln!(writer, "x#{} {}", i, val)?;
        }
        Ok(())
    }

    /// Writes the solution to `path` in assignment format.
    pub fn save<P: AsRef<Path>>(&self, path: P, name: &str, num_nodes: usize) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        self.write(name, num_nodes, &mut file)
    }
}

/// Looks up the reference solution for `name` in `dir`, preferring the
/// known-optimal file over the best-known one over a plain computed one.
///
/// An unreadable candidate is skipped with a warning so a later candidate can
/// still serve as reference.
pub fn find_reference(dir: &Path, name: &str) -> Option<(PathBuf, Solution)> {
    for ext in ["opt.sol", "bst.sol", "sol"] {
        let candidate = dir.join(format!("{}.{}", name, ext));
        if !candidate.is_file() {
            continue;
        }
        match Solution::load(&candidate) {
            Ok(solution) => return Some((candidate, solution)),
            Err(e) => warn!("skipping unreadable reference {}: {}", candidate.display(), e),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pair_graph() -> Graph {
        // {1,2,3,4} with edges {(1,2),(3,4)}, 0-based in memory
        Graph::from_edges(4, vec![(0, 1), (2, 3)]).unwrap()
    }

    #[test]
    fn read_assignment_format_test() {
        let sol = Cursor::new("# Solution for model t\n# Objective value = 2\nx#1 1\nx#2 0\nx#3 1\nx#4 0\n");
        let solution = Solution::read(sol).unwrap();
        assert_eq!(solution.nodes().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn read_index_list_format_test() {
        let sol = Cursor::new("c reference\n1\n3\n");
        let solution = Solution::read(sol).unwrap();
        assert_eq!(solution.nodes().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn round_trip_test() {
        let solution = Solution::from_nodes(vec![0, 2]);
        let mut buf = Vec::new();
        solution.write("t", 4, &mut buf).unwrap();
        let read_back = Solution::read(Cursor::new(buf)).unwrap();
        assert_eq!(read_back, solution);
    }

    #[test]
    fn independence_test() {
        let graph = pair_graph();
        assert!(Solution::from_nodes(vec![0, 2]).is_independent(&graph));
        assert!(!Solution::from_nodes(vec![0, 1]).is_independent(&graph));
        // out of range vertex
        assert!(!Solution::from_nodes(vec![0, 7]).is_independent(&graph));
    }

    #[test]
    fn repair_drops_higher_id_on_tie_test() {
        let graph = pair_graph();
        let mut solution = Solution::from_nodes(vec![0, 1, 2, 3]);
        solution.repair(&graph);
        assert!(solution.is_independent(&graph));
        assert_eq!(solution.nodes().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn repair_prefers_most_conflicted_test() {
        // star: center 0 conflicts with all leaves
        let graph = Graph::from_edges(4, vec![(0, 1), (0, 2), (0, 3)]).unwrap();
        let mut solution = Solution::from_nodes(vec![0, 1, 2, 3]);
        solution.repair(&graph);
        assert_eq!(solution.nodes().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
