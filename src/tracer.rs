//! # Tracing reachable nodes
//!
//! A [`GraphTracer`] binds a [`GraphAccessor`] to a [`Traversal`] and produces
//! lazy traces over the nodes reachable from a set of sources. All traces share
//! the same contract:
//!
//! - every source is emitted first, before any of its neighbours, even when it
//!   has no edges at all;
//! - every reachable node is emitted exactly once;
//! - the accessor is only queried as the trace is consumed.
//!
//! ## Traversals
//!
//! - [`Traversal::Bfs`]: level order away from the sources. Output is
//!   non-decreasing in distance to the nearest source.
//! - [`Traversal::Dfs`]: the order of a recursive pre-order depth-first walk,
//!   computed with an explicit stack of neighbour iterators. Pushing all
//!   neighbours of a node at once would reverse sibling order, so only the top
//!   frame is ever advanced.
//!
//! ## Operations
//!
//! | operation | follows | emits |
//! |---|---|---|
//! | [`trace_forward`](GraphTracer::trace_forward) | out-edges | all reached nodes |
//! | [`trace_backward`](GraphTracer::trace_backward) | in-edges | all reached nodes |
//! | [`trace_completely`](GraphTracer::trace_completely) | both | all reached nodes |
//! | [`trace_backward_and_forward`](GraphTracer::trace_backward_and_forward) | in-edges, then out-edges | union of both traces |
//! | [`trace_start_nodes`](GraphTracer::trace_start_nodes) | in-edges | reached nodes without in-edges |
//! | [`trace_end_nodes`](GraphTracer::trace_end_nodes) | out-edges | reached nodes without out-edges |

use std::str::FromStr;

use ahash::AHashSet;
use thiserror::Error;

use crate::accessor::{Direction, GraphAccessor, ShouldTrace};

pub mod bfs;
pub mod dfs;
pub mod neighbours;

pub use bfs::Bfs;
pub use dfs::Dfs;
pub use neighbours::{Expansion, Neighbours};

/// Order in which reachable nodes are discovered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Traversal {
    /// Breadth first: a queue, explored in layers away from the sources.
    #[default]
    #[display(fmt = "bfs")]
    Bfs,
    /// Depth first: a stack of neighbour iterators, one branch fully explored
    /// at a time. Matches a recursive depth-first walk.
    #[display(fmt = "dfs")]
    Dfs,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTraversalError {
    #[error("unknown traversal algorithm: {0:?}")]
    UnknownAlgorithm(String),
}

impl FromStr for Traversal {
    type Err = ParseTraversalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Traversal::Bfs),
            "dfs" | "depth-first" => Ok(Traversal::Dfs),
            _ => Err(ParseTraversalError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Traces a caller-owned graph through its accessor.
#[derive(Clone, Debug)]
pub struct GraphTracer<A> {
    accessor: A,
    traversal: Traversal,
}

impl<A: GraphAccessor> GraphTracer<A> {
    pub fn new(accessor: A, traversal: Traversal) -> Self {
        GraphTracer {
            accessor,
            traversal,
        }
    }

    pub fn bfs(accessor: A) -> Self {
        Self::new(accessor, Traversal::Bfs)
    }

    pub fn dfs(accessor: A) -> Self {
        Self::new(accessor, Traversal::Dfs)
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    fn trace<S, P>(&self, sources: S, expansion: Expansion, should_trace: P) -> Trace<'_, A, S, P>
    where
        S: Iterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        tracing::trace!(
            traversal = %self.traversal,
            incoming = expansion.incoming,
            outgoing = expansion.outgoing,
            "starting trace"
        );
        match self.traversal {
            Traversal::Bfs => Trace::Bfs(Bfs::new(&self.accessor, sources, expansion, should_trace)),
            Traversal::Dfs => Trace::Dfs(Dfs::new(&self.accessor, sources, expansion, should_trace)),
        }
    }

    /// Follows out-edges from all `sources`.
    pub fn trace_forward<I, P>(&self, sources: I, should_trace: P) -> Trace<'_, A, I::IntoIter, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        self.trace(sources.into_iter(), Expansion::FORWARD, should_trace)
    }

    /// Follows in-edges from all `sources`.
    pub fn trace_backward<I, P>(&self, sources: I, should_trace: P) -> Trace<'_, A, I::IntoIter, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        self.trace(sources.into_iter(), Expansion::BACKWARD, should_trace)
    }

    /// Follows edges in both directions, returning every node connected to the
    /// sources. In-edges of a node are expanded before its out-edges.
    pub fn trace_completely<I, P>(
        &self,
        sources: I,
        should_trace: P,
    ) -> Trace<'_, A, I::IntoIter, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        self.trace(sources.into_iter(), Expansion::BOTH, should_trace)
    }

    /// The full backward trace, then the nodes of the forward trace that the
    /// backward one did not emit.
    pub fn trace_backward_and_forward<I, P>(
        &self,
        sources: I,
        should_trace: P,
    ) -> BackwardAndForward<'_, A, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        let sources: Vec<A::Node> = sources.into_iter().collect();
        let backward = self.trace(sources.clone().into_iter(), Expansion::BACKWARD, should_trace);
        BackwardAndForward {
            tracer: self,
            stage: Stage::Backward { backward, sources },
            seen: AHashSet::new(),
        }
    }

    /// Traces the sources back as far as possible and keeps the nodes without
    /// any in-edges.
    pub fn trace_start_nodes<I, P>(
        &self,
        sources: I,
        should_trace: P,
    ) -> Terminals<'_, A, I::IntoIter, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        Terminals {
            trace: self.trace_backward(sources, should_trace),
            direction: Direction::Backward,
        }
    }

    /// Traces the sources forward as far as possible and keeps the nodes
    /// without any out-edges.
    pub fn trace_end_nodes<I, P>(
        &self,
        sources: I,
        should_trace: P,
    ) -> Terminals<'_, A, I::IntoIter, P>
    where
        I: IntoIterator<Item = A::Node>,
        P: ShouldTrace<A::Node, A::Edge>,
    {
        Terminals {
            trace: self.trace_forward(sources, should_trace),
            direction: Direction::Forward,
        }
    }
}

/// A lazy trace produced by one of the [`GraphTracer`] operations.
pub enum Trace<'a, A: GraphAccessor, S, P> {
    Bfs(Bfs<'a, A, S, P>),
    Dfs(Dfs<'a, A, S, P>),
}

impl<'a, A: GraphAccessor, S, P> Trace<'a, A, S, P> {
    /// Gives the predicate back, dropping the trace state.
    pub fn into_should_trace(self) -> P {
        match self {
            Trace::Bfs(bfs) => bfs.into_should_trace(),
            Trace::Dfs(dfs) => dfs.into_should_trace(),
        }
    }

    fn accessor(&self) -> &'a A {
        match self {
            Trace::Bfs(bfs) => bfs.accessor(),
            Trace::Dfs(dfs) => dfs.accessor(),
        }
    }
}

impl<A, S, P> Iterator for Trace<'_, A, S, P>
where
    A: GraphAccessor,
    S: Iterator<Item = A::Node>,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = A::Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Trace::Bfs(bfs) => bfs.next(),
            Trace::Dfs(dfs) => dfs.next(),
        }
    }
}

/// Nodes of a trace that have no edges left in the traced direction.
pub struct Terminals<'a, A: GraphAccessor, S, P> {
    trace: Trace<'a, A, S, P>,
    direction: Direction,
}

impl<A, S, P> Iterator for Terminals<'_, A, S, P>
where
    A: GraphAccessor,
    S: Iterator<Item = A::Node>,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = A::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let accessor = self.trace.accessor();
        let direction = self.direction;
        self.trace
            .find(|node| accessor.edges_towards(node, direction).next().is_none())
    }
}

enum Stage<'a, A: GraphAccessor, P> {
    Backward {
        backward: Trace<'a, A, std::vec::IntoIter<A::Node>, P>,
        sources: Vec<A::Node>,
    },
    Forward(Trace<'a, A, std::vec::IntoIter<A::Node>, P>),
    Done,
}

/// See [`GraphTracer::trace_backward_and_forward`].
pub struct BackwardAndForward<'a, A: GraphAccessor, P> {
    tracer: &'a GraphTracer<A>,
    stage: Stage<'a, A, P>,
    seen: AHashSet<A::Node>,
}

impl<A, P> Iterator for BackwardAndForward<'_, A, P>
where
    A: GraphAccessor,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = A::Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.stage {
                Stage::Backward { backward, .. } => {
                    if let Some(node) = backward.next() {
                        self.seen.insert(node.clone());
                        return Some(node);
                    }
                    if let Stage::Backward { backward, sources } =
                        std::mem::replace(&mut self.stage, Stage::Done)
                    {
                        self.stage = Stage::Forward(self.tracer.trace(
                            sources.into_iter(),
                            Expansion::FORWARD,
                            backward.into_should_trace(),
                        ));
                    }
                }
                Stage::Forward(forward) => {
                    let seen = &self.seen;
                    if let Some(node) = forward.find(|node| !seen.contains(node)) {
                        return Some(node);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }
}
