use crate::accessor::{Direction, GraphAccessor};

/// Which edges of a node are expanded during a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expansion {
    pub incoming: bool,
    pub outgoing: bool,
}

impl Expansion {
    pub const FORWARD: Expansion = Expansion {
        incoming: false,
        outgoing: true,
    };
    pub const BACKWARD: Expansion = Expansion {
        incoming: true,
        outgoing: false,
    };
    pub const BOTH: Expansion = Expansion {
        incoming: true,
        outgoing: true,
    };
}

/// Lazily walks the neighbours of a single node: first across its in-edges,
/// then across its out-edges, as selected by an [`Expansion`].
///
/// Yields `(edge, neighbour, direction)`. The accessor is asked for each edge
/// list only once the previous one is exhausted.
pub struct Neighbours<'a, A: GraphAccessor> {
    accessor: &'a A,
    node: A::Node,
    open: Option<(A::Edges<'a>, Direction)>,
    pending: Expansion,
}

impl<'a, A: GraphAccessor> Neighbours<'a, A> {
    pub fn new(accessor: &'a A, node: &A::Node, expansion: Expansion) -> Self {
        Neighbours {
            accessor,
            node: node.clone(),
            open: None,
            pending: expansion,
        }
    }
}

impl<A: GraphAccessor> Iterator for Neighbours<'_, A> {
    type Item = (A::Edge, A::Node, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((edges, direction)) = &mut self.open {
                if let Some(edge) = edges.next() {
                    let neighbour = self.accessor.far_end(&edge, *direction);
                    return Some((edge, neighbour, *direction));
                }
                self.open = None;
            }

            let direction = if self.pending.incoming {
                self.pending.incoming = false;
                Direction::Backward
            } else if self.pending.outgoing {
                self.pending.outgoing = false;
                Direction::Forward
            } else {
                return None;
            };
            self.open = Some((self.accessor.edges_towards(&self.node, direction), direction));
        }
    }
}
