//! # Graph accessors
//!
//! The tracing algorithms never own a graph. Everything they know about the
//! caller's graph is obtained through a [`GraphAccessor`]: the ordered in- and
//! out-edges of a node, and the two endpoints of an edge. The order in which an
//! accessor enumerates edges is significant: it decides sibling order in
//! depth-first traces and tie-breaking in breadth-first ones.
//!
//! When the caller's node and edge types already know their own adjacency,
//! implementing [`NativeNode`] and [`NativeEdge`] is enough, and [`Native`]
//! provides the accessor.

use std::hash::Hash;
use std::marker::PhantomData;

/// Orientation in which an edge is followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Source to target, through an out-edge.
    #[display(fmt = "forward")]
    Forward,
    /// Target to source, through an in-edge.
    #[display(fmt = "backward")]
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Read-only view of a directed graph whose storage is owned by the caller.
///
/// Nodes are compared and hashed to maintain visited sets, so they should be
/// cheap handles (indices, ids, reference-counted pointers).
pub trait GraphAccessor {
    type Node: Clone + Eq + Hash;
    type Edge: Clone;

    /// Edge enumeration returned by [`in_edges`](Self::in_edges) and
    /// [`out_edges`](Self::out_edges).
    type Edges<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    /// Edges whose target is `node`, in a stable order.
    fn in_edges(&self, node: &Self::Node) -> Self::Edges<'_>;

    /// Edges whose source is `node`, in a stable order.
    fn out_edges(&self, node: &Self::Node) -> Self::Edges<'_>;

    fn source(&self, edge: &Self::Edge) -> Self::Node;

    fn target(&self, edge: &Self::Edge) -> Self::Node;

    /// Edges leaving `node` when walking in `direction`.
    fn edges_towards(&self, node: &Self::Node, direction: Direction) -> Self::Edges<'_> {
        match direction {
            Direction::Forward => self.out_edges(node),
            Direction::Backward => self.in_edges(node),
        }
    }

    /// The endpoint reached by following `edge` in `direction`.
    fn far_end(&self, edge: &Self::Edge, direction: Direction) -> Self::Node {
        match direction {
            Direction::Forward => self.target(edge),
            Direction::Backward => self.source(edge),
        }
    }
}

impl<A: GraphAccessor + ?Sized> GraphAccessor for &A {
    type Node = A::Node;
    type Edge = A::Edge;
    type Edges<'a>
        = A::Edges<'a>
    where
        Self: 'a;

    fn in_edges(&self, node: &Self::Node) -> Self::Edges<'_> {
        (**self).in_edges(node)
    }

    fn out_edges(&self, node: &Self::Node) -> Self::Edges<'_> {
        (**self).out_edges(node)
    }

    fn source(&self, edge: &Self::Edge) -> Self::Node {
        (**self).source(edge)
    }

    fn target(&self, edge: &Self::Edge) -> Self::Node {
        (**self).target(edge)
    }
}

/// An edge that knows its own endpoints.
pub trait NativeEdge: Clone {
    type Node;

    fn source(&self) -> Self::Node;
    fn target(&self) -> Self::Node;
}

/// A node that knows its own incident edges.
pub trait NativeNode: Clone + Eq + Hash {
    type Edge: NativeEdge<Node = Self>;
    type Edges: Iterator<Item = Self::Edge>;

    fn in_edges(&self) -> Self::Edges;
    fn out_edges(&self) -> Self::Edges;
}

/// Accessor for graphs made of [`NativeNode`]s.
pub struct Native<N>(PhantomData<fn() -> N>);

impl<N> Native<N> {
    pub fn new() -> Self {
        Native(PhantomData)
    }
}

impl<N> Default for Native<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Native<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Native<N> {}

impl<N> std::fmt::Debug for Native<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Native")
    }
}

impl<N: NativeNode> GraphAccessor for Native<N> {
    type Node = N;
    type Edge = N::Edge;
    type Edges<'a>
        = N::Edges
    where
        Self: 'a;

    fn in_edges(&self, node: &N) -> N::Edges {
        node.in_edges()
    }

    fn out_edges(&self, node: &N) -> N::Edges {
        node.out_edges()
    }

    fn source(&self, edge: &N::Edge) -> N {
        edge.source()
    }

    fn target(&self, edge: &N::Edge) -> N {
        edge.target()
    }
}

/// Decides whether a trace may step over `edge` to `neighbour`.
///
/// `direction` is [`Direction::Backward`] when the edge is an in-edge of the
/// node being expanded and [`Direction::Forward`] when it is an out-edge.
/// Rejecting a neighbour only affects this one step; the neighbour can still be
/// reached through another edge.
pub trait ShouldTrace<N, E> {
    fn should_trace(&mut self, edge: &E, neighbour: &N, direction: Direction) -> bool;
}

impl<N, E, F> ShouldTrace<N, E> for F
where
    F: FnMut(&E, &N, Direction) -> bool,
{
    fn should_trace(&mut self, edge: &E, neighbour: &N, direction: Direction) -> bool {
        self(edge, neighbour, direction)
    }
}

/// The predicate that follows every edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceAll;

impl<N, E> ShouldTrace<N, E> for TraceAll {
    fn should_trace(&mut self, _: &E, _: &N, _: Direction) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use by_address::ByAddress;
    use itertools::Itertools;

    use super::*;
    use crate::tracer::{GraphTracer, Traversal};

    struct NodeData {
        id: u32,
        in_edges: RefCell<Vec<Edge>>,
        out_edges: RefCell<Vec<Edge>>,
    }

    #[derive(Clone, PartialEq, Eq, Hash)]
    struct Node(ByAddress<Rc<NodeData>>);

    #[derive(Clone)]
    struct Edge(Rc<(Node, Node)>);

    impl Node {
        fn new(id: u32) -> Self {
            Node(ByAddress(Rc::new(NodeData {
                id,
                in_edges: RefCell::new(Vec::new()),
                out_edges: RefCell::new(Vec::new()),
            })))
        }

        fn connect(&self, targets: &[&Node]) {
            for target in targets {
                let edge = Edge(Rc::new((self.clone(), (*target).clone())));
                self.0.out_edges.borrow_mut().push(edge.clone());
                target.0.in_edges.borrow_mut().push(edge);
            }
        }
    }

    impl NativeEdge for Edge {
        type Node = Node;

        fn source(&self) -> Node {
            self.0 .0.clone()
        }

        fn target(&self) -> Node {
            self.0 .1.clone()
        }
    }

    impl NativeNode for Node {
        type Edge = Edge;
        type Edges = std::vec::IntoIter<Edge>;

        fn in_edges(&self) -> Self::Edges {
            self.0.in_edges.borrow().clone().into_iter()
        }

        fn out_edges(&self) -> Self::Edges {
            self.0.out_edges.borrow().clone().into_iter()
        }
    }

    fn reference() -> Vec<Node> {
        let n: Vec<Node> = (1..=9).map(Node::new).collect();
        n[0].connect(&[&n[1], &n[2], &n[3]]);
        n[2].connect(&[&n[3]]);
        n[1].connect(&[&n[4], &n[5], &n[6]]);
        n[4].connect(&[&n[7]]);
        n[7].connect(&[&n[6]]);
        n[6].connect(&[&n[8]]);
        n
    }

    fn ids(nodes: impl Iterator<Item = Node>) -> String {
        nodes.map(|n| n.0.id).join(",")
    }

    #[test]
    fn native_nodes_need_no_adapter() {
        let nodes = reference();
        let root = nodes[0].clone();

        let bfs = GraphTracer::new(Native::new(), Traversal::Bfs);
        assert_eq!(
            ids(bfs.trace_forward([root.clone()], TraceAll)),
            "1,2,3,4,5,6,7,8,9"
        );

        let dfs = GraphTracer::new(Native::new(), Traversal::Dfs);
        assert_eq!(ids(dfs.trace_forward([root], TraceAll)), "1,2,5,8,7,9,6,3,4");
    }

    #[test]
    fn native_end_nodes() {
        let nodes = reference();
        let dfs = GraphTracer::new(Native::new(), Traversal::Dfs);
        assert_eq!(ids(dfs.trace_end_nodes(nodes, TraceAll)), "9,6,4");
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(Direction::Forward.reverse(), Direction::Backward);
        assert_eq!(Direction::Backward.reverse(), Direction::Forward);
        assert_eq!(Direction::Backward.to_string(), "backward");
    }

    #[test]
    fn closures_are_predicates() {
        let mut only_forward = |_: &u8, _: &u8, d: Direction| d == Direction::Forward;
        assert!(only_forward.should_trace(&0, &0, Direction::Forward));
        assert!(!only_forward.should_trace(&0, &0, Direction::Backward));
        assert!(ShouldTrace::<u8, u8>::should_trace(
            &mut TraceAll,
            &0,
            &0,
            Direction::Backward
        ));
    }
}
