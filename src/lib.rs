//! # Graphtrace
//!
//! Graphtrace walks graphs it does not own. Callers describe their graph through
//! a [`GraphAccessor`] (the in- and out-edges of a node and the endpoints of an
//! edge) and get lazy breadth-first or depth-first traces, path enumeration,
//! backward aggregation of edge values and topological orders back.
//!
//! Every trace takes a [`ShouldTrace`] predicate which can veto individual
//! edges. Any `FnMut(&Edge, &Node, Direction) -> bool` closure is one, and
//! [`TraceAll`] accepts everything.
//!
//! ```
//! use graphtrace::{GraphAccessor, GraphTracer, TraceAll};
//!
//! struct Chain(u32);
//!
//! impl GraphAccessor for Chain {
//!     type Node = u32;
//!     type Edge = (u32, u32);
//!     type Edges<'a> = std::option::IntoIter<(u32, u32)>;
//!
//!     fn in_edges(&self, node: &u32) -> Self::Edges<'_> {
//!         (*node > 0).then(|| (node - 1, *node)).into_iter()
//!     }
//!
//!     fn out_edges(&self, node: &u32) -> Self::Edges<'_> {
//!         (*node + 1 < self.0).then(|| (*node, node + 1)).into_iter()
//!     }
//!
//!     fn source(&self, edge: &(u32, u32)) -> u32 {
//!         edge.0
//!     }
//!
//!     fn target(&self, edge: &(u32, u32)) -> u32 {
//!         edge.1
//!     }
//! }
//!
//! let tracer = GraphTracer::dfs(Chain(5));
//! let reached: Vec<u32> = tracer.trace_forward([2], TraceAll).collect();
//! assert_eq!(reached, vec![2, 3, 4]);
//! ```

pub mod accessor;
pub mod algorithms;
pub mod tracer;

#[cfg(test)]
mod test_graphs;

pub use accessor::{Direction, GraphAccessor, Native, NativeEdge, NativeNode, ShouldTrace, TraceAll};
pub use algorithms::{topological_order, topological_order_stream, TopoError, TopologicalOrderExt};
pub use tracer::{GraphTracer, ParseTraversalError, Traversal};
