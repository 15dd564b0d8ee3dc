//! # Simple path enumeration
//!
//! [`GraphTracer::paths`] lists every simple path between two nodes. Each
//! pending branch owns its edge sequence and its own set of visited nodes:
//! sharing one visited set between branches would cut off alternative routes
//! through a common prefix.
//!
//! The number of simple paths grows exponentially with the number of merge
//! points (a chain of `k` diamonds has `2^k` of them). Nothing here bounds the
//! enumeration; stop pulling from the iterator to stop the search.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::accessor::{Direction, GraphAccessor, ShouldTrace};
use crate::tracer::{GraphTracer, Traversal};

struct Branch<N, E> {
    node: N,
    path: Vec<E>,
    visited: AHashSet<N>,
}

impl<A: GraphAccessor> GraphTracer<A> {
    /// Enumerates the simple paths from `earlier` to `later`.
    ///
    /// With [`Direction::Forward`] the search starts at `earlier` and follows
    /// out-edges; with [`Direction::Backward`] it starts at `later` and follows
    /// in-edges, which is cheaper when the graph merges more than it splits
    /// between the two nodes. Either way each path is returned as the edge
    /// sequence leading from `earlier` to `later`, and the predicate receives the
    /// walking direction.
    ///
    /// [`Traversal::Bfs`] returns shorter paths first. [`Traversal::Dfs`]
    /// explores the most recently discovered branch first.
    pub fn paths<P>(
        &self,
        earlier: A::Node,
        later: A::Node,
        direction: Direction,
        should_trace: P,
    ) -> Paths<'_, A, P>
    where
        P: ShouldTrace<A::Node, A::Edge>,
    {
        let (start, end) = match direction {
            Direction::Forward => (earlier, later),
            Direction::Backward => (later, earlier),
        };
        tracing::trace!(traversal = %self.traversal(), %direction, "enumerating paths");

        let mut pending = VecDeque::new();
        pending.push_back(Branch {
            node: start,
            path: Vec::new(),
            visited: AHashSet::new(),
        });
        Paths {
            accessor: self.accessor(),
            traversal: self.traversal(),
            direction,
            end,
            should_trace,
            pending,
        }
    }
}

/// Lazy enumeration of simple paths, see [`GraphTracer::paths`].
pub struct Paths<'a, A: GraphAccessor, P> {
    accessor: &'a A,
    traversal: Traversal,
    direction: Direction,
    end: A::Node,
    should_trace: P,
    pending: VecDeque<Branch<A::Node, A::Edge>>,
}

impl<A: GraphAccessor, P> Paths<'_, A, P> {
    fn pop(&mut self) -> Option<Branch<A::Node, A::Edge>> {
        match self.traversal {
            Traversal::Bfs => self.pending.pop_front(),
            Traversal::Dfs => self.pending.pop_back(),
        }
    }

    /// Branches waiting to be extended.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<A, P> Iterator for Paths<'_, A, P>
where
    A: GraphAccessor,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = Vec<A::Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Branch {
            node,
            mut path,
            mut visited,
        }) = self.pop()
        {
            if node == self.end {
                tracing::trace!(length = path.len(), "path found");
                if self.direction == Direction::Backward {
                    path.reverse();
                }
                return Some(path);
            }

            visited.insert(node.clone());

            for edge in self.accessor.edges_towards(&node, self.direction) {
                let next = self.accessor.far_end(&edge, self.direction);
                if !self.should_trace.should_trace(&edge, &next, self.direction)
                    || visited.contains(&next)
                {
                    continue;
                }

                let mut branch_path = Vec::with_capacity(path.len() + 1);
                branch_path.extend(path.iter().cloned());
                branch_path.push(edge);
                self.pending.push_back(Branch {
                    node: next,
                    path: branch_path,
                    visited: visited.clone(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;
    use crate::accessor::TraceAll;
    use crate::test_graphs::{EdgeId, TestGraph};

    fn render(graph: &TestGraph, paths: impl Iterator<Item = Vec<EdgeId>>) -> String {
        paths.map(|p| graph.path_string(&p)).join(" ")
    }

    #[test]
    fn both_routes_into_the_merge_point() {
        let graph = TestGraph::reference();
        let bfs = GraphTracer::bfs(&graph);
        let dfs = GraphTracer::dfs(&graph);

        insta::assert_snapshot!(
            render(&graph, bfs.paths(1, 7, Direction::Forward, TraceAll)),
            @"1>2>7 1>2>5>8>7"
        );
        insta::assert_snapshot!(
            render(&graph, bfs.paths(1, 7, Direction::Backward, TraceAll)),
            @"1>2>7 1>2>5>8>7"
        );
        insta::assert_snapshot!(
            render(&graph, dfs.paths(1, 7, Direction::Forward, TraceAll)),
            @"1>2>7 1>2>5>8>7"
        );
        // walking back from 7, the route through 8 is the last one pushed
        insta::assert_snapshot!(
            render(&graph, dfs.paths(1, 7, Direction::Backward, TraceAll)),
            @"1>2>5>8>7 1>2>7"
        );
    }

    #[test]
    fn dfs_takes_the_latest_branch_first() {
        let graph = TestGraph::reference();
        let dfs = GraphTracer::dfs(&graph);
        assert_eq!(
            render(&graph, dfs.paths(1, 4, Direction::Forward, TraceAll)),
            "1>4 1>3>4"
        );
        let bfs = GraphTracer::bfs(&graph);
        assert_eq!(
            render(&graph, bfs.paths(1, 4, Direction::Forward, TraceAll)),
            "1>4 1>3>4"
        );
        assert_eq!(
            render(&graph, dfs.paths(1, 9, Direction::Forward, TraceAll)),
            "1>2>7>9 1>2>5>8>7>9"
        );
    }

    #[test]
    fn same_node_is_one_empty_path() {
        let graph = TestGraph::reference();
        let paths: Vec<_> = GraphTracer::bfs(&graph)
            .paths(5, 5, Direction::Forward, TraceAll)
            .collect();
        assert_eq!(paths, vec![Vec::<EdgeId>::new()]);
    }

    #[test]
    fn unreachable_target_has_no_paths() {
        let graph = TestGraph::reference();
        let tracer = GraphTracer::dfs(&graph);
        assert_eq!(tracer.paths(7, 1, Direction::Forward, TraceAll).count(), 0);
        assert_eq!(tracer.paths(6, 9, Direction::Backward, TraceAll).count(), 0);
    }

    #[test]
    fn predicate_removes_routes() {
        let graph = TestGraph::reference();
        let tracer = GraphTracer::bfs(&graph);
        let avoid_eight = |_: &EdgeId, n: &u32, _: Direction| *n != 8;
        assert_eq!(
            render(&graph, tracer.paths(1, 7, Direction::Forward, avoid_eight)),
            "1>2>7"
        );

        let mut directions = Vec::new();
        let record = |_: &EdgeId, _: &u32, d: Direction| {
            directions.push(d);
            true
        };
        assert_eq!(tracer.paths(1, 7, Direction::Backward, record).count(), 2);
        assert!(directions.iter().all(|d| *d == Direction::Backward));
    }

    #[test]
    fn branches_do_not_share_visited_nodes() {
        // both branches pass through 3 on their way to 4
        let graph = TestGraph::from_edges([(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        let tracer = GraphTracer::bfs(&graph);
        assert_eq!(
            render(&graph, tracer.paths(0, 4, Direction::Forward, TraceAll)),
            "0>1>3>4 0>2>3>4"
        );
    }

    #[test]
    fn cycles_are_not_reentered() {
        let mut graph = TestGraph::cycle(4);
        graph.add_edge(0, 2);
        for traversal in [Traversal::Bfs, Traversal::Dfs] {
            let tracer = GraphTracer::new(&graph, traversal);
            let paths = tracer
                .paths(0, 3, Direction::Forward, TraceAll)
                .map(|p| graph.path_string(&p))
                .sorted()
                .join(" ");
            assert_eq!(paths, "0>1>2>3 0>2>3");
        }
    }

    #[test]
    fn path_count_doubles_per_diamond() {
        let graph = TestGraph::diamond_chain(6);
        let tracer = GraphTracer::dfs(&graph);
        assert_eq!(tracer.paths(0, 18, Direction::Forward, TraceAll).count(), 64);
        assert_eq!(tracer.paths(0, 18, Direction::Backward, TraceAll).count(), 64);

        let mut paths = tracer.paths(0, 18, Direction::Forward, TraceAll);
        assert_eq!(paths.next().map(|p| p.len()), Some(12));
        assert!(paths.pending() > 0);
    }
}
