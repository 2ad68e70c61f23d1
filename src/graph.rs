//! Implementation of a simple, immutable undirected graph together with the
//! DIMACS-like `.gph` reader used by the instance library.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ParseError;

/// A simple undirected graph over vertices `0..n`.
///
/// Adjacency is kept in ordered sets so that every iteration over vertices,
/// neighbors or edges is deterministic, which in turn keeps the backend
/// problem encoding stable between runs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Graph {
    adj: Vec<BTreeSet<usize>>,
}

impl Graph {
    /// Creates a graph with `n` vertices and no edges.
    pub fn new(n: usize) -> Self {
        Graph { adj: vec![BTreeSet::new(); n] }
    }

    /// Builds a graph from an edge list over vertices `0..n`.
    /// Rejects self-loops and endpoints outside the vertex range.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Graph::new(n);
        for (u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), ParseError> {
        let n = self.adj.len();
        if u >= n || v >= n {
            return Err(ParseError::Malformed(format!(
                "edge ({}, {}) references a vertex outside 0..{}",
                u, v, n
            )));
        }
        if u == v {
            return Err(ParseError::Malformed(format!("self-loop at vertex {}", u)));
        }
        self.adj[u].insert(v);
        self.adj[v].insert(u);
        Ok(())
    }

    /// Returns the number of vertices.
    pub fn num_nodes(&self) -> usize {
        self.adj.len()
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.adj.iter().map(|neighs| neighs.len()).sum::<usize>() / 2
    }

    /// Returns an `Iterator` over all vertices.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        0..self.adj.len()
    }

    /// Returns the neighborhood of `node`.
    pub fn neighbors(&self, node: usize) -> &BTreeSet<usize> {
        &self.adj[node]
    }

    /// Returns the degree of `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adj[node].len()
    }

    /// Checks whether the edge `(u, v)` exists.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains(&v)
    }

    /// Returns an iterator over all edges `(u, v)` with `u < v`, in ascending
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj.iter().enumerate().flat_map(|(u, neighs)| {
            neighs
                .iter()
                .filter(move |v| u < **v)
                .map(move |v| (u, *v))
                .collect::<Vec<_>>()
        })
    }

    /// Returns the subgraph induced on `block` together with the index that
    /// maps each subgraph vertex back to its original id.
    ///
    /// Block vertices are sorted first, so the relabeling to `0..block.len()`
    /// is deterministic regardless of the order the block was assembled in.
    pub fn induced_subgraph(&self, block: &[usize]) -> (Graph, Vec<usize>) {
        let mut index: Vec<usize> = block.to_vec();
        index.sort_unstable();
        index.dedup();
        let rank: std::collections::BTreeMap<usize, usize> =
            index.iter().enumerate().map(|(i, v)| (*v, i)).collect();
        let mut sub = Graph::new(index.len());
        for (i, v) in index.iter().enumerate() {
            for neigh in &self.adj[*v] {
                if let Some(j) = rank.get(neigh) {
                    sub.adj[i].insert(*j);
                    sub.adj[*j].insert(i);
                }
            }
        }
        (sub, index)
    }
}

impl Graph {
    /// Reads a `.gph` instance and creates a `Graph`.
    ///
    /// Grammar: comment lines start with `c`, one `p <fmt> <n> <m>` header,
    /// then `e <u> <v>` edge lines with 1-based endpoints. Duplicate edges
    /// are tolerated; a duplicate header, a self-loop or an out-of-range
    /// endpoint is a parse error.
    pub fn read_gph<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut graph: Option<Graph> = None;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("p") => {
                    if graph.is_some() {
                        return Err(ParseError::Malformed("duplicate problem header".into()));
                    }
                    // p <fmt> <n> <m>
                    let _fmt = tokens
                        .next()
                        .ok_or_else(|| ParseError::Malformed("truncated header".into()))?;
                    let n: usize = tokens
                        .next()
                        .ok_or_else(|| ParseError::Malformed("header misses node count".into()))?
                        .parse()?;
                    let _m: usize = tokens
                        .next()
                        .ok_or_else(|| ParseError::Malformed("header misses edge count".into()))?
                        .parse()?;
                    graph = Some(Graph::new(n));
                }
                Some("e") => {
                    let graph = graph
                        .as_mut()
                        .ok_or_else(|| ParseError::Malformed("edge before problem header".into()))?;
                    let u: usize = tokens
                        .next()
                        .ok_or_else(|| ParseError::Malformed("edge misses endpoint".into()))?
                        .parse()?;
                    let v: usize = tokens
                        .next()
                        .ok_or_else(|| ParseError::Malformed("edge misses endpoint".into()))?
                        .parse()?;
                    if u == 0 || v == 0 {
                        return Err(ParseError::Malformed(
                            "edge endpoints are 1-based, found 0".into(),
                        ));
                    }
                    graph.add_edge(u - 1, v - 1)?;
                }
                Some(other) => {
                    return Err(ParseError::Malformed(format!("unknown line kind '{}'", other)));
                }
                None => {}
            }
        }
        graph.ok_or_else(|| ParseError::Malformed("no problem header found".into()))
    }

    /// Reads a `.gph` instance from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Graph::read_gph(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_gph_test() {
        let gph = Cursor::new("c a comment\np edge 4 2\ne 1 2\ne 3 4\n");
        let graph = Graph::read_gph(gph).unwrap();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 2);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(2, 3));
        assert!(!graph.has_edge(1, 2));
    }

    #[test]
    fn duplicate_header_test() {
        let gph = Cursor::new("p edge 2 0\np edge 2 0\n");
        assert!(Graph::read_gph(gph).is_err());
    }

    #[test]
    fn out_of_range_edge_test() {
        let gph = Cursor::new("p edge 2 1\ne 1 5\n");
        assert!(Graph::read_gph(gph).is_err());
    }

    #[test]
    fn edge_before_header_test() {
        let gph = Cursor::new("e 1 2\np edge 2 1\n");
        assert!(Graph::read_gph(gph).is_err());
    }

    #[test]
    fn edges_are_sorted_test() {
        let gph = Cursor::new("p edge 4 3\ne 3 4\ne 1 3\ne 1 2\n");
        let graph = Graph::read_gph(gph).unwrap();
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (2, 3)]);
    }

    #[test]
    fn induced_subgraph_test() {
        let gph = Cursor::new("p edge 5 4\ne 1 2\ne 2 3\ne 3 4\ne 4 5\n");
        let graph = Graph::read_gph(gph).unwrap();
        let (sub, index) = graph.induced_subgraph(&[4, 2, 3]);
        assert_eq!(index, vec![2, 3, 4]);
        assert_eq!(sub.num_nodes(), 3);
        assert_eq!(sub.num_edges(), 2);
        assert!(sub.has_edge(0, 1));
        assert!(sub.has_edge(1, 2));
        assert!(!sub.has_edge(0, 2));
    }
}
