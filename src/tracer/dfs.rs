use ahash::AHashSet;

use super::{Expansion, Neighbours};
use crate::accessor::{GraphAccessor, ShouldTrace};

/// Depth-first trace in recursive pre-order.
///
/// The stack holds one neighbour iterator per open node. Only the top iterator
/// is advanced: the first unvisited neighbour is emitted and gets its own
/// frame, which suspends the parent until that subtree is exhausted. A node is
/// emitted when it is discovered, not when its frame is popped.
///
/// Sources are taken one at a time; the next source is only looked at once the
/// previous one's subtree is exhausted.
pub struct Dfs<'a, A: GraphAccessor, S, P> {
    accessor: &'a A,
    expansion: Expansion,
    should_trace: P,
    sources: S,
    visited: AHashSet<A::Node>,
    stack: Vec<Neighbours<'a, A>>,
}

impl<'a, A: GraphAccessor, S, P> Dfs<'a, A, S, P> {
    pub fn new(accessor: &'a A, sources: S, expansion: Expansion, should_trace: P) -> Self {
        Dfs {
            accessor,
            expansion,
            should_trace,
            sources,
            visited: AHashSet::new(),
            stack: Vec::new(),
        }
    }

    pub fn into_should_trace(self) -> P {
        self.should_trace
    }

    pub(crate) fn accessor(&self) -> &'a A {
        self.accessor
    }

    /// Number of open frames, i.e. the length of the current branch.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<A, S, P> Iterator for Dfs<'_, A, S, P>
where
    A: GraphAccessor,
    S: Iterator<Item = A::Node>,
    P: ShouldTrace<A::Node, A::Edge>,
{
    type Item = A::Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(top) = self.stack.last_mut() else {
                let source = self.sources.next()?;
                if self.visited.insert(source.clone()) {
                    self.stack
                        .push(Neighbours::new(self.accessor, &source, self.expansion));
                    return Some(source);
                }
                continue;
            };

            let should_trace = &mut self.should_trace;
            let visited = &mut self.visited;
            let discovered = top.by_ref().find_map(|(edge, neighbour, direction)| {
                (should_trace.should_trace(&edge, &neighbour, direction)
                    && visited.insert(neighbour.clone()))
                .then_some(neighbour)
            });

            match discovered {
                Some(node) => {
                    self.stack
                        .push(Neighbours::new(self.accessor, &node, self.expansion));
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
