use std::collections::VecDeque;

use ahash::AHashSet;

use super::{Expansion, Neighbours};
use crate::accessor::{GraphAccessor, ShouldTrace};

/// Multi-source breadth-first trace.
///
/// All sources are emitted (and enqueued) before the first node is expanded.
/// A neighbour is emitted the moment it is discovered, so the output is in
/// non-decreasing distance from the nearest source, with ties broken by the
/// accessor's edge order.
pub struct Bfs<'a, A: GraphAccessor, S, P> {
    accessor: &'a A,
    expansion: Expansion,
    should_trace: P,
    sources: Option<S>,
    visited: AHashSet<A::Node>,
    queue: VecDeque<A::Node>,
    expanding: Option<Neighbours<'a, A>>,
}

impl<'a, A: GraphAccessor, S, P> Bfs<'a, A, S, P> {
    pub fn new(accessor: &'a A, sources: S, expansion: Expansion, should_trace: P) -> Self {
        Bfs {
            accessor,
            expansion,
            should_trace,
            sources: Some(sources),
            visited: AHashSet::new(),
            queue: VecDeque::new(),
            expanding: None,
        }
    }

    pub fn into_should_trace(self) -> P {
        self.should_trace
    }

    pub(crate) fn accessor(&self) -> &'a A {
        self.accessor
    }
}

impl<A, S, P> Iterator for Bfs<'_, A, S, P>
where
    A: GraphAccessor,
    S: Iterator<Item = A::Node>,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = A::Node;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sources) = &mut self.sources {
            for source in sources.by_ref() {
                if self.visited.insert(source.clone()) {
                    self.queue.push_back(source.clone());
                    return Some(source);
                }
            }
            self.sources = None;
        }

        loop {
            if let Some(neighbours) = &mut self.expanding {
                for (edge, neighbour, direction) in neighbours.by_ref() {
                    if self.should_trace.should_trace(&edge, &neighbour, direction)
                        && self.visited.insert(neighbour.clone())
                    {
                        self.queue.push_back(neighbour.clone());
                        return Some(neighbour);
                    }
                }
            }

            let node = self.queue.pop_front()?;
            self.expanding = Some(Neighbours::new(self.accessor, &node, self.expansion));
        }
    }
}
