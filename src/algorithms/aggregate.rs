//! # Backward aggregation of edge values
//!
//! Starting from an end node, values carried by edges are folded along every
//! path leading into it and the results of different paths meeting at the same
//! node are merged. With a path-count fold this counts the routes from each
//! node to the end node; with `max` over summed weights it gives longest
//! distances, and so on.
//!
//! The walk is a breadth-first search without a visited set: a node is queued
//! once per route that reaches it, because every route contributes its own
//! value to the merge. On a graph with a cycle behind the end node the queue
//! never drains. Callers must only aggregate over acyclic regions, for
//! instance by rejecting back edges in the predicate.

use std::collections::VecDeque;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::accessor::{Direction, GraphAccessor, ShouldTrace};
use crate::tracer::GraphTracer;

/// Aggregates per node, in order of first arrival.
pub type AggregateMap<N, T> = IndexMap<N, T, ahash::RandomState>;

impl<A: GraphAccessor> GraphTracer<A> {
    /// Traces back from `end` and aggregates edge values per node.
    ///
    /// - `zero`: the value at `end` itself.
    /// - `edge_value`: the value an edge contributes.
    /// - `along_path`: extends the value of a route by one more edge,
    ///   `along_path(value_so_far, edge_value(edge))`.
    /// - `across_paths`: merges a new route's value into the one stored for a
    ///   node, `across_paths(stored, arriving)`.
    ///
    /// Always breadth-first, whatever traversal the tracer is bound to.
    pub fn trace_backward_and_aggregate_edges<T, P>(
        &self,
        end: A::Node,
        zero: T,
        mut edge_value: impl FnMut(&A::Edge) -> T,
        mut along_path: impl FnMut(&T, &T) -> T,
        mut across_paths: impl FnMut(&T, &T) -> T,
        mut should_trace: P,
    ) -> AggregateMap<A::Node, T>
    where
        T: Clone,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        let accessor = self.accessor();
        let mut result = AggregateMap::default();
        let mut queue = VecDeque::new();
        queue.push_back((end, zero));

        while let Some((node, running)) = queue.pop_front() {
            match result.entry(node.clone()) {
                Entry::Occupied(mut stored) => {
                    let merged = across_paths(stored.get(), &running);
                    *stored.get_mut() = merged;
                }
                Entry::Vacant(slot) => {
                    slot.insert(running.clone());
                }
            }

            for edge in accessor.in_edges(&node) {
                let source = accessor.source(&edge);
                if should_trace.should_trace(&edge, &source, Direction::Backward) {
                    let value = along_path(&running, &edge_value(&edge));
                    queue.push_back((source, value));
                }
            }
            tracing::trace!(queued = queue.len(), "aggregated node");
        }

        result
    }
}
