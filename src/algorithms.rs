//! # Algorithms built on top of the tracer
//!
//! - [`paths`]: every simple path between two nodes, see [`GraphTracer::paths`].
//! - [`aggregate`]: folds edge values backwards from an end node, see
//!   [`GraphTracer::trace_backward_and_aggregate_edges`].
//! - [`topological_order`]: dependency-first ordering over any relation, with
//!   a blocking and a [`Stream`](futures::Stream) flavour.
//!
//! [`GraphTracer::paths`]: crate::tracer::GraphTracer::paths
//! [`GraphTracer::trace_backward_and_aggregate_edges`]: crate::tracer::GraphTracer::trace_backward_and_aggregate_edges

pub mod aggregate;
pub mod paths;
pub mod topological_order;

pub use aggregate::AggregateMap;
pub use paths::Paths;
pub use topological_order::{
    topological_order, topological_order_stream, TopoError, TopologicalOrder,
    TopologicalOrderExt, TopologicalOrderStream,
};
