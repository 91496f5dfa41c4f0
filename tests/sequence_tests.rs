//! Deferred execution, core transforms and sequence sources

use std::cell::Cell;
use std::rc::Rc;

use lazyq::prelude::*;
use pretty_assertions::assert_eq;

/// Re-iterable source that counts every element it hands out.
fn counted(items: Vec<i32>, pulls: &Rc<Cell<usize>>) -> Seq<i32> {
    let pulls = Rc::clone(pulls);
    Seq::from_fn(move || {
        let pulls = Rc::clone(&pulls);
        items
            .clone()
            .into_iter()
            .inspect(move |_| pulls.set(pulls.get() + 1))
    })
}

#[test]
fn test_operators_defer_until_pull() {
    let pulls = Rc::new(Cell::new(0));
    let query = counted(vec![1, 2, 3, 4], &pulls)
        .filter(|x| x % 2 == 0)
        .select(|x| x * 10);
    assert_eq!(pulls.get(), 0);

    assert_eq!(query.to_list().unwrap(), vec![20, 40]);
    assert_eq!(pulls.get(), 4);
}

#[test]
fn test_each_traversal_reevaluates_source() {
    let pulls = Rc::new(Cell::new(0));
    let query = counted(vec![1, 2, 3], &pulls).select(|x| x + 1);

    let first = query.to_list().unwrap();
    let second = query.to_list().unwrap();
    assert_eq!(first, second);
    assert_eq!(pulls.get(), 6);
}

#[test]
fn test_single_pass_source_yields_once() {
    let seq = Seq::once(vec![1, 2, 3].into_iter());
    assert_eq!(seq.to_list().unwrap(), vec![1, 2, 3]);
    assert_eq!(seq.to_list().unwrap(), Vec::<i32>::new());
}

#[test]
fn test_indexed_filter_and_select() {
    let seq = Seq::from_vec(vec![10, 20, 30, 40]);
    let even_positions = seq.filter_indexed(|_, i| i % 2 == 0).to_list().unwrap();
    assert_eq!(even_positions, vec![10, 30]);

    let shifted = seq.select_indexed(|x, i| x + i as i32).to_list().unwrap();
    assert_eq!(shifted, vec![10, 21, 32, 43]);
}

#[test]
fn test_try_select_fails_on_offending_element() {
    let query = Seq::from_vec(vec![1, 2, 0, 4]).try_select(|x| {
        if x == 0 {
            Err(QueryError::source_error("division by zero"))
        } else {
            Ok(10 / x)
        }
    });

    let results: Vec<_> = query.iter().collect();
    assert_eq!(results.len(), 3, "iteration stops after the first error");
    assert_eq!(results[0], Ok(10));
    assert_eq!(results[1], Ok(5));
    let err = results[2].clone().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Source);
}

#[test]
fn test_take_never_pulls_past_count() {
    let pulls = Rc::new(Cell::new(0));
    let taken = counted((1..=10).collect(), &pulls).take(3).to_list().unwrap();
    assert_eq!(taken, vec![1, 2, 3]);
    assert_eq!(pulls.get(), 3);
}

#[test]
fn test_skip_and_while_forms() {
    let seq = Seq::from_vec(vec![1, 2, 5, 1, 6]);
    assert_eq!(seq.skip(2).to_list().unwrap(), vec![5, 1, 6]);
    assert_eq!(seq.skip(10).to_list().unwrap(), Vec::<i32>::new());
    assert_eq!(seq.skip_while(|x| *x < 3).to_list().unwrap(), vec![5, 1, 6]);
    assert_eq!(seq.take_while(|x| *x < 3).to_list().unwrap(), vec![1, 2]);
}

#[test]
fn test_select_many_flattens_in_order() {
    let flat: Vec<i32> = Seq::from_vec(vec![1, 2, 3])
        .select_many(|n| vec![n; n as usize])
        .to_list()
        .unwrap();
    assert_eq!(flat, vec![1, 2, 2, 3, 3, 3]);
}

#[test]
fn test_concat_zip_and_default_if_empty() {
    let left = Seq::from_vec(vec![1, 2]);
    let right = Seq::from_vec(vec![3]);
    assert_eq!(left.concat(&right).to_list().unwrap(), vec![1, 2, 3]);

    let names = Seq::from_vec(vec!["a", "b"]);
    let pairs = Seq::from_vec(vec![1, 2, 3])
        .zip(&names, |n, s| (n, s))
        .to_list()
        .unwrap();
    assert_eq!(pairs, vec![(1, "a"), (2, "b")]);

    assert_eq!(
        Seq::<i32>::empty().default_if_empty(7).to_list().unwrap(),
        vec![7]
    );
    assert_eq!(left.default_if_empty(7).to_list().unwrap(), vec![1, 2]);
}

#[test]
fn test_range_and_repeat() {
    assert_eq!(Seq::range(5, 3).unwrap().to_list().unwrap(), vec![5, 6, 7]);
    assert_eq!(Seq::range(i32::MAX, 1).unwrap().to_list().unwrap(), vec![i32::MAX]);
    let err = Seq::range(i32::MAX, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);

    assert_eq!(Seq::repeat('x', 3).to_list().unwrap(), vec!['x', 'x', 'x']);
}

#[test]
fn test_range_rejects_counts_past_i32() {
    for (start, count) in [(1, i64::MAX as usize), (0, usize::MAX), (i32::MIN, usize::MAX)] {
        let err = Seq::range(start, count).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    assert!(Seq::range(i32::MAX, 0).unwrap().to_list().unwrap().is_empty());
    assert_eq!(
        Seq::range(i32::MIN, 2).unwrap().to_list().unwrap(),
        vec![i32::MIN, i32::MIN + 1]
    );
    assert_eq!(Seq::range(-2, 3).unwrap().to_list().unwrap(), vec![-2, -1, 0]);
}

#[test]
fn test_iterator_view() {
    let seq = Seq::from_vec(vec![1, 2, 3]);
    let mut total = 0;
    for item in &seq {
        total += item.unwrap();
    }
    assert_eq!(total, 6);
}

struct Numbers {
    next: u32,
    limit: u32,
    fail_at: Option<u32>,
    drain: bool,
    produced: Rc<Cell<u32>>,
    closed: Rc<Cell<u32>>,
}

impl Resource for Numbers {
    type Item = u32;

    fn fetch(&mut self) -> QueryResult<Option<u32>> {
        if self.fail_at == Some(self.next) {
            return Err(QueryError::source_error("handle lost"));
        }
        if self.next >= self.limit {
            return Ok(None);
        }
        self.next += 1;
        self.produced.set(self.produced.get() + 1);
        Ok(Some(self.next))
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }

    fn drain_on_close(&self) -> bool {
        self.drain
    }
}

struct Probe {
    tracker: LeaseTracker,
    produced: Rc<Cell<u32>>,
    closed: Rc<Cell<u32>>,
}

impl Probe {
    fn new() -> Self {
        Self {
            tracker: LeaseTracker::new(),
            produced: Rc::new(Cell::new(0)),
            closed: Rc::new(Cell::new(0)),
        }
    }

    fn seq(&self, limit: u32, fail_at: Option<u32>, drain: bool) -> Seq<u32> {
        let produced = Rc::clone(&self.produced);
        let closed = Rc::clone(&self.closed);
        Seq::from_resource(self.tracker.clone(), move || Numbers {
            next: 0,
            limit,
            fail_at,
            drain,
            produced: Rc::clone(&produced),
            closed: Rc::clone(&closed),
        })
    }
}

#[test]
fn test_resource_released_once_on_exhaustion() {
    let probe = Probe::new();
    let seq = probe.seq(5, None, false);
    assert_eq!(probe.tracker.acquired(), 0);

    assert_eq!(seq.to_list().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(probe.tracker.acquired(), 1);
    assert_eq!(probe.tracker.released(), 1);
    assert_eq!(probe.closed.get(), 1);
}

#[test]
fn test_resource_released_once_when_abandoned() {
    let probe = Probe::new();
    let first_two = probe.seq(5, None, false).take(2).to_list().unwrap();
    assert_eq!(first_two, vec![1, 2]);
    assert_eq!(probe.tracker.outstanding(), 0);
    assert_eq!(probe.tracker.released(), 1);
    assert_eq!(probe.closed.get(), 1);
    assert_eq!(probe.produced.get(), 2);
}

#[test]
fn test_resource_drained_before_close_when_required() {
    let probe = Probe::new();
    let first = probe.seq(5, None, true).first().unwrap();
    assert_eq!(first, 1);
    assert_eq!(probe.produced.get(), 5);
    assert_eq!(probe.closed.get(), 1);
    assert_eq!(probe.tracker.released(), 1);
}

#[test]
fn test_resource_released_after_failure() {
    let probe = Probe::new();
    let err = probe.seq(5, Some(2), false).to_list().unwrap_err();
    assert_eq!(err, QueryError::Source("handle lost".into()));
    assert_eq!(probe.tracker.outstanding(), 0);
    assert_eq!(probe.closed.get(), 1);
}

#[test]
fn test_each_resource_traversal_takes_its_own_lease() {
    let probe = Probe::new();
    let seq = probe.seq(3, None, false);
    let a = seq.count().unwrap();
    let b = seq.count().unwrap();
    assert_eq!((a, b), (3, 3));
    assert_eq!(probe.tracker.acquired(), 2);
    assert_eq!(probe.tracker.released(), 2);
}
