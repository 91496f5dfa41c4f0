//! Ordering engine tests: stability, multi-key chains and comparer failures

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use lazyq::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: &'static str,
    age: u32,
    city: &'static str,
}

fn people() -> Seq<Person> {
    Seq::from_vec(vec![
        Person { name: "dana", age: 31, city: "oslo" },
        Person { name: "eli", age: 25, city: "rome" },
        Person { name: "fay", age: 31, city: "lima" },
        Person { name: "gus", age: 25, city: "oslo" },
        Person { name: "hal", age: 40, city: "rome" },
    ])
}

fn names(seq: &Seq<Person>) -> Vec<&'static str> {
    seq.select(|p| p.name).to_list().unwrap()
}

#[test]
fn test_order_by_is_stable() {
    let sorted = people().order_by(|p| p.age);
    assert_eq!(names(&sorted), vec!["eli", "gus", "dana", "fay", "hal"]);
}

#[test]
fn test_descending_keeps_stability() {
    let sorted = people().order_by_descending(|p| p.age);
    assert_eq!(names(&sorted), vec!["hal", "dana", "fay", "eli", "gus"]);
}

#[test]
fn test_then_by_breaks_ties() {
    let sorted = people().order_by(|p| p.age).then_by(|p| p.city);
    assert_eq!(names(&sorted), vec!["gus", "eli", "fay", "dana", "hal"]);

    let sorted = people()
        .order_by(|p| p.city)
        .then_by_descending(|p| p.age);
    assert_eq!(names(&sorted), vec!["fay", "dana", "gus", "hal", "eli"]);
    assert_eq!(sorted.depth(), 2);
}

#[test]
fn test_extending_chain_leaves_original_untouched() {
    let by_age = people().order_by(|p| p.age);
    let by_age_then_city = by_age.then_by(|p| p.city);
    assert_eq!(names(&by_age), vec!["eli", "gus", "dana", "fay", "hal"]);
    assert_eq!(
        names(&by_age_then_city),
        vec!["gus", "eli", "fay", "dana", "hal"]
    );
}

#[test]
fn test_none_first_and_nan_lowest() {
    let sorted = Seq::from_vec(vec![Some(2), None, Some(1)])
        .order()
        .to_list()
        .unwrap();
    assert_eq!(sorted, vec![None, Some(1), Some(2)]);

    let sorted = Seq::from_vec(vec![3.0, f64::NAN, -1.0, f64::NAN])
        .order_by(|x| *x)
        .to_list()
        .unwrap();
    assert!(sorted[0].is_nan() && sorted[1].is_nan());
    assert_eq!(sorted[2..], [-1.0, 3.0]);
}

#[derive(Debug, Clone, PartialEq)]
struct Opaque(u8);

impl PartialOrd for Opaque {
    fn partial_cmp(&self, _other: &Self) -> Option<Ordering> {
        None
    }
}

#[test]
fn test_comparer_failure_surfaces_on_first_pull() {
    let sorted = Seq::from_vec(vec![Opaque(1), Opaque(2)]).order_by(|o| o.clone());
    let err = sorted.to_list().unwrap_err();
    assert_eq!(err, QueryError::NotComparable);
    assert_eq!(err.kind(), ErrorKind::Argument);

    let single = Seq::from_vec(vec![Opaque(1)]).order_by(|o| o.clone());
    assert_eq!(single.to_list().unwrap(), vec![Opaque(1)]);
}

#[test]
fn test_custom_comparer() {
    let ci: CmpRef<String> = Rc::new(CaseInsensitive);
    let sorted = Seq::from_vec(vec!["b", "C", "a"])
        .order_by_with(|s| s.to_string(), Some(ci.clone()))
        .to_list()
        .unwrap();
    assert_eq!(sorted, vec!["a", "b", "C"]);

    let by_len = comparer_from_fn(|a: &usize, b: &usize| b.cmp(a));
    let sorted = Seq::from_vec(vec!["aa", "b", "ccc"])
        .order_by_with(|s| s.len(), Some(by_len))
        .to_list()
        .unwrap();
    assert_eq!(sorted, vec!["ccc", "aa", "b"]);

    let sorted = Seq::from_vec(vec!["b", "C", "a"])
        .order_by_descending_with(|s| s.to_string(), Some(ci))
        .to_list()
        .unwrap();
    assert_eq!(sorted, vec!["C", "b", "a"]);
}

#[derive(Debug, Clone)]
struct Version {
    major: u32,
    minor: u32,
}

#[derive(Debug, Clone)]
struct Release {
    name: &'static str,
    version: Version,
    channel: u8,
}

fn release(name: &'static str, major: u32, minor: u32, channel: u8) -> Release {
    Release {
        name,
        version: Version { major, minor },
        channel,
    }
}

#[test]
fn test_sort_unordered_key_type_through_explicit_comparer() {
    let by_version = comparer_from_fn(|a: &Version, b: &Version| {
        (a.major, a.minor).cmp(&(b.major, b.minor))
    });
    let releases = Seq::from_vec(vec![
        release("c", 2, 0, 1),
        release("a", 1, 4, 2),
        release("b", 1, 10, 1),
        release("d", 1, 4, 1),
    ]);

    let sorted = releases
        .order_by_using(|r| r.version.clone(), by_version.clone(), SortDirection::Ascending)
        .select(|r| r.name)
        .to_list()
        .unwrap();
    assert_eq!(sorted, vec!["a", "d", "b", "c"]);

    let chained = releases
        .order_by_using(|r| r.version.clone(), by_version, SortDirection::Descending)
        .then_by_using(
            |r| r.channel,
            comparer_from_fn(|a: &u8, b: &u8| a.cmp(b)),
            SortDirection::Ascending,
        );
    assert_eq!(chained.depth(), 2);
    assert_eq!(
        chained.select(|r| r.name).to_list().unwrap(),
        vec!["c", "b", "d", "a"]
    );
}

#[test]
fn test_sort_deferred_and_repeatable() {
    let pulls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulls);
    let source = Seq::from_fn(move || {
        let counter = Rc::clone(&counter);
        vec![3, 1, 2]
            .into_iter()
            .inspect(move |_| counter.set(counter.get() + 1))
    });

    let sorted = source.order_by(|x| *x);
    assert_eq!(pulls.get(), 0);

    let first = sorted.to_list().unwrap();
    let second = sorted.to_list().unwrap();
    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(first, second);
    assert_eq!(pulls.get(), 6);
}

#[test]
fn test_reverse() {
    let seq = Seq::from_vec(vec![1, 2, 3]);
    assert_eq!(seq.reverse().to_list().unwrap(), vec![3, 2, 1]);
    assert_eq!(seq.order_descending().first().unwrap(), 3);
}

proptest! {
    #[test]
    fn prop_order_by_matches_std_stable_sort(keys in proptest::collection::vec(0u8..6, 0..120)) {
        let tagged: Vec<(u8, usize)> = keys.iter().copied().zip(0..).collect();
        let mut expected = tagged.clone();
        expected.sort_by_key(|(k, _)| *k);

        let actual = Seq::from_vec(tagged.clone()).order_by(|(k, _)| *k).to_list().unwrap();
        prop_assert_eq!(actual, expected);

        let mut expected_desc = tagged.clone();
        expected_desc.sort_by(|a, b| b.0.cmp(&a.0));
        let actual_desc = Seq::from_vec(tagged)
            .order_by_descending(|(k, _)| *k)
            .to_list()
            .unwrap();
        prop_assert_eq!(actual_desc, expected_desc);
    }

    #[test]
    fn prop_two_key_chain_matches_tuple_sort(pairs in proptest::collection::vec((0u8..4, 0u8..4), 0..80)) {
        let mut expected = pairs.clone();
        expected.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let actual = Seq::from_vec(pairs)
            .order_by(|p| p.0)
            .then_by_descending(|p| p.1)
            .to_list()
            .unwrap();
        prop_assert_eq!(actual, expected);
    }
}
