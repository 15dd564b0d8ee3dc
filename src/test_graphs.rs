//! Fixture graphs for the crate's tests.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::accessor::GraphAccessor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

#[derive(Clone, Debug, Default)]
struct Adjacency {
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

/// Adjacency-list graph over `u32` labels. Edges are enumerated in insertion
/// order, nodes in first-mention order.
#[derive(Clone, Debug, Default)]
pub struct TestGraph {
    nodes: IndexMap<u32, Adjacency>,
    edges: Vec<(u32, u32)>,
}

impl TestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut graph = Self::new();
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    pub fn add_node(&mut self, node: u32) {
        self.nodes.entry(node).or_default();
    }

    pub fn add_edge(&mut self, source: u32, target: u32) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push((source, target));
        self.nodes.entry(source).or_default().outgoing.push(id);
        self.nodes.entry(target).or_default().incoming.push(id);
        id
    }

    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes.keys().copied()
    }

    pub fn endpoints(&self, edge: EdgeId) -> (u32, u32) {
        self.edges[edge.0]
    }

    /// Renders a path as `a>b>c`.
    pub fn path_string(&self, path: &[EdgeId]) -> String {
        let mut out = String::new();
        for (i, edge) in path.iter().enumerate() {
            let (source, target) = self.endpoints(*edge);
            if i == 0 {
                write!(out, "{source}").unwrap();
            }
            write!(out, ">{target}").unwrap();
        }
        out
    }

    /// Nodes 1..=9 with edges 1→2, 1→3, 1→4, 3→4, 2→5, 2→6, 2→7, 5→8, 8→7,
    /// 7→9. Node 7 is a merge point reached from 2 directly and through 5→8.
    pub fn reference() -> Self {
        let mut graph = Self::new();
        for node in 1..=9 {
            graph.add_node(node);
        }
        for (source, target) in [
            (1, 2),
            (1, 3),
            (1, 4),
            (3, 4),
            (2, 5),
            (2, 6),
            (2, 7),
            (5, 8),
            (8, 7),
            (7, 9),
        ] {
            graph.add_edge(source, target);
        }
        graph
    }

    /// `0 → 1 → … → n-1 → 0`.
    pub fn cycle(n: u32) -> Self {
        Self::from_edges((0..n).map(|i| (i, (i + 1) % n)))
    }

    /// Diamonds `3k → {3k+1, 3k+2} → 3k+3`, chained through their corners so
    /// each diamond doubles the number of paths.
    pub fn diamond_chain(diamonds: u32) -> Self {
        let mut graph = Self::new();
        for k in 0..diamonds {
            let top = 3 * k;
            graph.add_edge(top, top + 1);
            graph.add_edge(top, top + 2);
            graph.add_edge(top + 1, top + 3);
            graph.add_edge(top + 2, top + 3);
        }
        graph
    }
}

impl GraphAccessor for TestGraph {
    type Node = u32;
    type Edge = EdgeId;
    type Edges<'a> = std::iter::Copied<std::slice::Iter<'a, EdgeId>>;

    fn in_edges(&self, node: &u32) -> Self::Edges<'_> {
        self.nodes
            .get(node)
            .map_or(&[] as &[EdgeId], |n| n.incoming.as_slice())
            .iter()
            .copied()
    }

    fn out_edges(&self, node: &u32) -> Self::Edges<'_> {
        self.nodes
            .get(node)
            .map_or(&[] as &[EdgeId], |n| n.outgoing.as_slice())
            .iter()
            .copied()
    }

    fn source(&self, edge: &EdgeId) -> u32 {
        self.edges[edge.0].0
    }

    fn target(&self, edge: &EdgeId) -> u32 {
        self.edges[edge.0].1
    }
}

mod test {
    use super::*;

    #[test]
    fn reference_edges_keep_insertion_order() {
        let graph = TestGraph::reference();
        let ins: Vec<u32> = graph.in_edges(&7).map(|e| graph.source(&e)).collect();
        assert_eq!(ins, vec![2, 8]);
        let outs: Vec<u32> = graph.out_edges(&1).map(|e| graph.target(&e)).collect();
        assert_eq!(outs, vec![2, 3, 4]);
        assert_eq!(graph.nodes().count(), 9);
        assert_eq!(graph.in_edges(&42).count(), 0);
    }

    #[test]
    fn diamond_chain_shares_corners() {
        let graph = TestGraph::diamond_chain(2);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(graph.out_edges(&3).count(), 2);
    }
}
