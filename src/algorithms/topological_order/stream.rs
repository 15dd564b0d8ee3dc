//! Asynchronous topological order.
//!
//! Same walk as [`topological_order`](super::topological_order), but the
//! dependencies of an item arrive as a [`Stream`]. Each open dependency stream
//! is boxed and pinned on the heap for as long as its item sits on the stack,
//! so the order itself never needs to be pinned.

use std::hash::Hash;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::FusedStream;
use futures::Stream;

use super::{Frame, TopoError, TopoState};

/// Orders `sources` and everything they depend on, dependencies first, where
/// `dependencies` yields a stream per item.
///
/// Results and errors match the blocking order for the same relation.
/// Dropping the returned stream drops every open dependency stream.
pub fn topological_order_stream<I, F, S>(
    sources: I,
    dependencies: F,
) -> TopologicalOrderStream<I::IntoIter, F, S>
where
    I: IntoIterator<Item = S::Item>,
    F: FnMut(&S::Item) -> S,
    S: Stream,
    S::Item: Clone + Eq + Hash,
{
    tracing::trace!("starting asynchronous topological order");
    TopologicalOrderStream {
        sources: sources.into_iter(),
        dependencies,
        state: TopoState::new(),
        stack: Vec::new(),
        done: false,
    }
}

pub struct TopologicalOrderStream<I, F, S: Stream> {
    sources: I,
    dependencies: F,
    state: TopoState<S::Item>,
    stack: Vec<Frame<S::Item, Pin<Box<S>>>>,
    done: bool,
}

// Dependency streams are pinned in their own boxes; nothing else is pinned.
impl<I, F, S: Stream> Unpin for TopologicalOrderStream<I, F, S> {}

impl<I, F, S: Stream> TopologicalOrderStream<I, F, S> {
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn fail(&mut self, error: TopoError<S::Item>) -> TopoError<S::Item> {
        self.stack.clear();
        self.done = true;
        error
    }
}

impl<I, F, S> Stream for TopologicalOrderStream<I, F, S>
where
    I: Iterator<Item = S::Item>,
    F: FnMut(&S::Item) -> S,
    S: Stream,
    S::Item: Clone + Eq + Hash,
{
    type Item = Result<S::Item, TopoError<S::Item>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            let Some(frame) = this.stack.last_mut() else {
                let Some(source) = this.sources.next() else {
                    this.done = true;
                    return Poll::Ready(None);
                };
                if this.state.enter(&source) {
                    let dependencies = Box::pin((this.dependencies)(&source));
                    this.stack.push(Frame {
                        item: source,
                        dependencies,
                    });
                }
                continue;
            };

            match futures::ready!(frame.dependencies.as_mut().poll_next(cx)) {
                Some(dependency) => match this.state.dependency(&dependency) {
                    Ok(true) => {
                        let dependencies = Box::pin((this.dependencies)(&dependency));
                        this.stack.push(Frame {
                            item: dependency,
                            dependencies,
                        });
                    }
                    Ok(false) => {}
                    Err(error) => return Poll::Ready(Some(Err(this.fail(error)))),
                },
                None => {
                    if let Some(Frame { item, dependencies }) = this.stack.pop() {
                        drop(dependencies);
                        return Poll::Ready(Some(match this.state.emit(item) {
                            Ok(item) => Ok(item),
                            Err(error) => Err(this.fail(error)),
                        }));
                    }
                }
            }
        }
    }
}

impl<I, F, S> FusedStream for TopologicalOrderStream<I, F, S>
where
    I: Iterator<Item = S::Item>,
    F: FnMut(&S::Item) -> S,
    S: Stream,
    S::Item: Clone + Eq + Hash,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
