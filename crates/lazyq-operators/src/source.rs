//! Sequence sources: buffers, generators, single-pass iterators and
//! externally owned resources.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use lazyq_core::error::QueryResult;
use lazyq_core::lease::{Lease, LeaseTracker};

use crate::metrics::emit_span;
use crate::seq::{out_of_range, Seq};
use crate::traits::{BoxCursor, Cursor, IndexedSource};

/// Shared, immutable element buffer. Backs `from_vec` and group contents.
pub(crate) struct Buffer<T> {
    pub(crate) items: Rc<Vec<T>>,
}

impl<T: Clone> IndexedSource<T> for Buffer<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }
}

pub(crate) struct BufferCursor<T> {
    items: Rc<Vec<T>>,
    pos: usize,
}

impl<T> BufferCursor<T> {
    pub(crate) fn new(items: Rc<Vec<T>>) -> Self {
        Self { items, pos: 0 }
    }
}

impl<T: Clone> Cursor for BufferCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        let item = self.items.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        Ok(item)
    }

    fn remaining_hint(&self) -> usize {
        self.items.len().saturating_sub(self.pos)
    }
}

/// Cursor over any `std` iterator.
pub(crate) struct IterCursor<I> {
    iter: I,
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    fn pull(&mut self) -> QueryResult<Option<I::Item>> {
        Ok(self.iter.next())
    }

    fn remaining_hint(&self) -> usize {
        self.iter.size_hint().0
    }
}

pub(crate) struct EmptyCursor<T>(PhantomData<T>);

impl<T> Cursor for EmptyCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        Ok(None)
    }
}

pub(crate) fn empty_cursor<T: 'static>() -> BoxCursor<T> {
    Box::new(EmptyCursor(PhantomData))
}

/// An iteration resource owned outside the engine, e.g. a native iterator
/// handle. The wrapping cursor calls `close` exactly once.
pub trait Resource {
    type Item;

    fn fetch(&mut self) -> QueryResult<Option<Self::Item>>;

    fn close(&mut self);

    /// Whether remaining elements must be consumed before `close` when the
    /// cursor is abandoned early.
    fn drain_on_close(&self) -> bool {
        false
    }
}

/// Cursor that owns an open resource plus its lease.
pub struct ResourceCursor<R: Resource> {
    resource: Option<R>,
    lease: Option<Lease>,
}

impl<R: Resource> ResourceCursor<R> {
    fn finish(&mut self, abandoned: bool) {
        let Some(mut resource) = self.resource.take() else {
            return;
        };
        if abandoned && resource.drain_on_close() {
            let mut drained = 0usize;
            while let Ok(Some(_)) = resource.fetch() {
                drained += 1;
            }
            emit_span("resource_drain", &[("drained", drained.to_string())]);
        }
        resource.close();
        if let Some(lease) = self.lease.take() {
            emit_span("resource_release", &[("tag", lease.tag().to_string())]);
            lease.release();
        }
    }
}

impl<R: Resource> Cursor for ResourceCursor<R> {
    type Item = R::Item;

    fn pull(&mut self) -> QueryResult<Option<R::Item>> {
        let Some(resource) = self.resource.as_mut() else {
            return Ok(None);
        };
        match resource.fetch() {
            Ok(Some(item)) => Ok(Some(item)),
            Ok(None) => {
                self.finish(false);
                Ok(None)
            }
            Err(e) => {
                self.finish(false);
                Err(e)
            }
        }
    }
}

impl<R: Resource> Drop for ResourceCursor<R> {
    fn drop(&mut self) {
        self.finish(true);
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// Re-iterable sequence over an owned buffer, with O(1) indexed access.
    pub fn from_vec(items: Vec<T>) -> Self {
        let items = Rc::new(items);
        let index = Rc::new(Buffer {
            items: Rc::clone(&items),
        });
        Seq::from_cursor_fn(move || Box::new(BufferCursor::new(Rc::clone(&items))))
            .with_index(index)
    }

    /// `count` copies of `value`.
    pub fn repeat(value: T, count: usize) -> Self {
        Seq::from_fn(move || std::iter::repeat(value.clone()).take(count))
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Seq<T> {
    fn from(items: Vec<T>) -> Self {
        Seq::from_vec(items)
    }
}

impl<T: 'static> Seq<T> {
    pub fn empty() -> Self {
        Seq::from_cursor_fn(empty_cursor::<T>)
    }

    /// Re-iterable generator: `make` is invoked once per traversal.
    pub fn from_fn<I, F>(make: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = T> + 'static,
    {
        Seq::from_cursor_fn(move || Box::new(IterCursor { iter: make() }))
    }

    /// Single-pass source. The first traversal consumes `iter`; any later
    /// traversal yields nothing.
    pub fn once<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        let slot = Rc::new(RefCell::new(Some(iter)));
        Seq::from_cursor_fn(move || match slot.borrow_mut().take() {
            Some(iter) => Box::new(IterCursor { iter }) as BoxCursor<T>,
            None => empty_cursor(),
        })
    }

    /// Wrap an externally owned resource. Each traversal opens a fresh
    /// resource and holds a lease from `tracker` until the resource is closed.
    pub fn from_resource<R, F>(tracker: LeaseTracker, open: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: Resource<Item = T> + 'static,
    {
        Seq::from_cursor_fn(move || {
            let resource = open();
            let lease = tracker.acquire("resource");
            Box::new(ResourceCursor {
                resource: Some(resource),
                lease: Some(lease),
            })
        })
    }
}

impl Seq<i32> {
    /// `count` consecutive integers starting at `start`. Fails eagerly when
    /// the last value would not fit in `i32`.
    pub fn range(start: i32, count: usize) -> QueryResult<Self> {
        let too_long = || out_of_range(isize::try_from(count).unwrap_or(isize::MAX), None);
        if count > 0 {
            let last = i64::try_from(count)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|span| i64::from(start).checked_add(span))
                .ok_or_else(too_long)?;
            if last > i64::from(i32::MAX) {
                return Err(too_long());
            }
        }
        Ok(Seq::from_fn(move || {
            (0..count).map(move |offset| (i64::from(start) + offset as i64) as i32)
        }))
    }
}
