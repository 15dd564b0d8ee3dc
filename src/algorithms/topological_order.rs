//! # Topological order over arbitrary dependency relations
//!
//! [`topological_order`] emits items so that every item comes after all the
//! dependencies reachable from it. It is not tied to graph accessors: the
//! dependency relation is any function from an item to the items it depends
//! on, which makes it usable for build steps, module imports, and the like.
//!
//! The walk is the same explicit-stack depth-first search the tracer uses, run
//! in post-order: an item is emitted when its dependency iterator is exhausted.
//! A dependency that has been entered but not emitted yet sits on the current
//! branch, so reaching it again closes a cycle and the order fails with
//! [`TopoError::CycleDetected`].
//!
//! Dependency iterators are only held while their item is on the stack.
//! Dropping the order, or hitting an error, drops every open one.

use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::AHashSet;
use thiserror::Error;

pub mod stream;

pub use stream::{topological_order_stream, TopologicalOrderStream};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopoError<T> {
    #[error("dependency cycle detected at {0:?}")]
    CycleDetected(T),
    #[error("{0:?} was about to be emitted twice")]
    YieldedTwice(T),
}

impl<T> TopoError<T> {
    /// The item at which the order failed.
    pub fn item(&self) -> &T {
        match self {
            TopoError::CycleDetected(item) | TopoError::YieldedTwice(item) => item,
        }
    }
}

pub(crate) struct Frame<T, D> {
    pub(crate) item: T,
    pub(crate) dependencies: D,
}

/// Bookkeeping shared by the blocking and the asynchronous order.
pub(crate) struct TopoState<T> {
    visited: AHashSet<T>,
    yielded: AHashSet<T>,
}

impl<T: Clone + Eq + Hash> TopoState<T> {
    pub(crate) fn new() -> Self {
        TopoState {
            visited: AHashSet::new(),
            yielded: AHashSet::new(),
        }
    }

    /// Marks `item` as entered; `false` if it already was.
    pub(crate) fn enter(&mut self, item: &T) -> bool {
        self.visited.insert(item.clone())
    }

    /// Classifies a dependency of the item on top of the stack: `true` when it
    /// needs its own frame, `false` when it has already been emitted.
    pub(crate) fn dependency(&mut self, dependency: &T) -> Result<bool, TopoError<T>> {
        if self.enter(dependency) {
            Ok(true)
        } else if self.yielded.contains(dependency) {
            Ok(false)
        } else {
            tracing::debug!(emitted = self.yielded.len(), "dependency cycle detected");
            Err(TopoError::CycleDetected(dependency.clone()))
        }
    }

    pub(crate) fn emit(&mut self, item: T) -> Result<T, TopoError<T>> {
        if self.yielded.insert(item.clone()) {
            Ok(item)
        } else {
            tracing::debug!(emitted = self.yielded.len(), "item emitted twice");
            Err(TopoError::YieldedTwice(item))
        }
    }
}

/// Orders `sources` and everything they depend on, dependencies first.
///
/// Sources are visited in the given order and dependencies in the order the
/// function returns them, which makes the result deterministic. Each
/// item is emitted once; an item whose dependency chain leads back to itself
/// ends the order with [`TopoError::CycleDetected`].
pub fn topological_order<I, F, D>(sources: I, dependencies: F) -> TopologicalOrder<I::IntoIter, F, D>
where
    I: IntoIterator<Item = D::Item>,
    F: FnMut(&D::Item) -> D,
    D: IntoIterator,
    D::Item: Clone + Eq + Hash,
{
    tracing::trace!("starting topological order");
    TopologicalOrder {
        sources: sources.into_iter(),
        dependencies,
        state: TopoState::new(),
        stack: Vec::new(),
        done: false,
    }
}

/// Method form of [`topological_order`] and [`topological_order_stream`].
pub trait TopologicalOrderExt: IntoIterator + Sized
where
    Self::Item: Clone + Eq + Hash,
{
    fn topological_order<F, D>(self, dependencies: F) -> TopologicalOrder<Self::IntoIter, F, D>
    where
        F: FnMut(&Self::Item) -> D,
        D: IntoIterator<Item = Self::Item>,
    {
        topological_order(self, dependencies)
    }

    fn topological_order_stream<F, S>(
        self,
        dependencies: F,
    ) -> TopologicalOrderStream<Self::IntoIter, F, S>
    where
        F: FnMut(&Self::Item) -> S,
        S: futures::Stream<Item = Self::Item>,
    {
        topological_order_stream(self, dependencies)
    }
}

impl<I: IntoIterator> TopologicalOrderExt for I where I::Item: Clone + Eq + Hash {}

/// Lazy topological order, see [`topological_order`].
pub struct TopologicalOrder<I, F, D: IntoIterator> {
    sources: I,
    dependencies: F,
    state: TopoState<D::Item>,
    stack: Vec<Frame<D::Item, D::IntoIter>>,
    done: bool,
}

impl<I, F, D: IntoIterator> TopologicalOrder<I, F, D> {
    /// Items entered but not emitted yet, i.e. the current dependency chain.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn fail(&mut self, error: TopoError<D::Item>) -> TopoError<D::Item> {
        self.stack.clear();
        self.done = true;
        error
    }
}

impl<I, F, D> Iterator for TopologicalOrder<I, F, D>
where
    I: Iterator<Item = D::Item>,
    F: FnMut(&D::Item) -> D,
    D: IntoIterator,
    D::Item: Clone + Eq + Hash,
{
    type Item = Result<D::Item, TopoError<D::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                let Some(source) = self.sources.next() else {
                    self.done = true;
                    return None;
                };
                if self.state.enter(&source) {
                    let dependencies = (self.dependencies)(&source).into_iter();
                    self.stack.push(Frame {
                        item: source,
                        dependencies,
                    });
                }
                continue;
            };

            match frame.dependencies.next() {
                Some(dependency) => match self.state.dependency(&dependency) {
                    Ok(true) => {
                        let dependencies = (self.dependencies)(&dependency).into_iter();
                        self.stack.push(Frame {
                            item: dependency,
                            dependencies,
                        });
                    }
                    Ok(false) => {}
                    Err(error) => return Some(Err(self.fail(error))),
                },
                None => {
                    if let Some(Frame { item, dependencies }) = self.stack.pop() {
                        drop(dependencies);
                        return Some(match self.state.emit(item) {
                            Ok(item) => Ok(item),
                            Err(error) => Err(self.fail(error)),
                        });
                    }
                }
            }
        }
    }
}

impl<I, F, D> FusedIterator for TopologicalOrder<I, F, D>
where
    I: Iterator<Item = D::Item>,
    F: FnMut(&D::Item) -> D,
    D: IntoIterator,
    D::Item: Clone + Eq + Hash,
{
}
