//! Join engine tests

use std::cell::Cell;
use std::rc::Rc;

use lazyq::prelude::*;
use lazyq_core::hash::stable_hash;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Customer {
    id: u32,
    name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
struct Order {
    customer: u32,
    item: &'static str,
}

fn customers() -> Seq<Customer> {
    Seq::from_vec(vec![
        Customer { id: 1, name: "ada" },
        Customer { id: 2, name: "bob" },
        Customer { id: 3, name: "cy" },
    ])
}

fn orders() -> Seq<Order> {
    Seq::from_vec(vec![
        Order { customer: 2, item: "lamp" },
        Order { customer: 1, item: "desk" },
        Order { customer: 2, item: "rug" },
        Order { customer: 9, item: "sofa" },
    ])
}

#[test]
fn test_join_outer_order_then_inner_order() {
    let rows = customers()
        .join(
            &orders(),
            |c| c.id,
            |o| o.customer,
            |c, o| (c.name, o.item),
            None,
        )
        .to_list()
        .unwrap();

    assert_eq!(rows, vec![("ada", "desk"), ("bob", "lamp"), ("bob", "rug")]);
}

#[test]
fn test_join_does_not_read_inner_for_empty_outer() {
    let pulls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulls);
    let inner = Seq::from_fn(move || {
        let counter = Rc::clone(&counter);
        (0..5).inspect(move |_| counter.set(counter.get() + 1))
    });

    let rows = Seq::<i32>::empty()
        .join(&inner, |x| *x, |y| *y, |x, y| x + y, None)
        .to_list()
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(pulls.get(), 0);
}

#[test]
fn test_join_with_custom_equality() {
    let ci: EqRef<String> = Rc::new(CaseInsensitive);
    let left = Seq::from_vec(vec!["Alpha", "beta"]);
    let right = Seq::from_vec(vec!["ALPHA", "BETA", "alpha"]);
    let rows = left
        .join(
            &right,
            |l| l.to_string(),
            |r| r.to_string(),
            |l, r| format!("{l}={r}"),
            Some(ci),
        )
        .to_list()
        .unwrap();
    assert_eq!(rows, vec!["Alpha=ALPHA", "Alpha=alpha", "beta=BETA"]);
}

#[test]
fn test_join_matches_null_keys_through_comparer() {
    let left = Seq::from_vec(vec![(None, 'x'), (Some(1), 'y')]);
    let right = Seq::from_vec(vec![(None, 10), (Some(1), 20), (None, 30)]);
    let rows = left
        .join(&right, |l| l.0, |r| r.0, |l, r| (l.1, r.1), None)
        .to_list()
        .unwrap();
    assert_eq!(rows, vec![('x', 10), ('x', 30), ('y', 20)]);
}

fn blank_is_missing() -> EqRef<Option<String>> {
    equality_from_fns(
        |a: &Option<String>, b: &Option<String>| {
            a.as_deref().unwrap_or("") == b.as_deref().unwrap_or("")
        },
        |k: &Option<String>| stable_hash(k.as_deref().unwrap_or("")),
    )
}

#[test]
fn test_join_treats_missing_and_blank_keys_alike() {
    let tags = |v: Vec<(Option<&str>, u8)>| {
        Seq::from_vec(
            v.into_iter()
                .map(|(k, n)| (k.map(str::to_string), n))
                .collect::<Vec<_>>(),
        )
    };
    let left = tags(vec![(None, 1), (Some("x"), 2), (Some(""), 3)]);
    let right = tags(vec![(Some(""), 10), (Some("x"), 20), (None, 30)]);

    let rows = left
        .join(
            &right,
            |l| l.0.clone(),
            |r| r.0.clone(),
            |l, r| (l.1, r.1),
            Some(blank_is_missing()),
        )
        .to_list()
        .unwrap();
    assert_eq!(rows, vec![(1, 10), (1, 30), (2, 20), (3, 10), (3, 30)]);

    let strict = left
        .join(&right, |l| l.0.clone(), |r| r.0.clone(), |l, r| (l.1, r.1), None)
        .to_list()
        .unwrap();
    assert_eq!(strict, vec![(1, 30), (2, 20), (3, 10)]);
}

#[test]
fn test_join_float_keys_through_explicit_comparer() {
    let bitwise = equality_from_fns(
        |a: &f64, b: &f64| a.to_bits() == b.to_bits(),
        |k: &f64| stable_hash(&k.to_bits()),
    );
    let prices = Seq::from_vec(vec![(0.5, "pen"), (2.25, "cup"), (9.0, "hat")]);
    let offers = Seq::from_vec(vec![(2.25, "shop a"), (0.5, "shop b"), (2.25, "shop c")]);

    let rows = prices
        .join_using(&offers, |p| p.0, |o| o.0, |p, o| (p.1, o.1), bitwise.clone())
        .to_list()
        .unwrap();
    assert_eq!(
        rows,
        vec![("pen", "shop b"), ("cup", "shop a"), ("cup", "shop c")]
    );

    let counts = prices
        .group_join_using(
            &offers,
            |p| p.0,
            |o| o.0,
            |p, matches| (p.1, matches.count().unwrap()),
            bitwise,
        )
        .to_list()
        .unwrap();
    assert_eq!(counts, vec![("pen", 1), ("cup", 2), ("hat", 0)]);
}

#[test]
fn test_group_join_emits_every_outer_element() {
    let rows = customers()
        .group_join(
            &orders(),
            |c| c.id,
            |o| o.customer,
            |c, matches| (c.name, matches.select(|o| o.item).to_list().unwrap()),
            None,
        )
        .to_list()
        .unwrap();

    assert_eq!(
        rows,
        vec![
            ("ada", vec!["desk"]),
            ("bob", vec!["lamp", "rug"]),
            ("cy", vec![]),
        ]
    );
}

fn failing_inner() -> Seq<u32> {
    Seq::from_vec(vec![1, 0, 2]).try_select(|x| {
        if x == 0 {
            Err(QueryError::source_error("bad inner row"))
        } else {
            Ok(x)
        }
    })
}

#[test]
fn test_join_ends_after_inner_build_failure() {
    let joined = Seq::from_vec(vec![1u32, 2, 1]).join(
        &failing_inner(),
        |x| *x,
        |y| *y,
        |x, y| x + y,
        None,
    );
    let mut cursor = joined.cursor();
    assert_eq!(cursor.pull().unwrap_err().kind(), ErrorKind::Source);
    assert_eq!(cursor.pull(), Ok(None));
    assert_eq!(cursor.pull(), Ok(None));
}

#[test]
fn test_group_join_ends_after_inner_build_failure() {
    let joined = Seq::from_vec(vec![1u32, 2]).group_join(
        &failing_inner(),
        |x| *x,
        |y| *y,
        |x, matches| (x, matches.count().unwrap()),
        None,
    );
    let mut cursor = joined.cursor();
    assert!(cursor.pull().is_err());
    assert_eq!(cursor.pull(), Ok(None));
}

#[test]
fn test_join_is_re_iterable() {
    let joined = customers().join(&orders(), |c| c.id, |o| o.customer, |c, _| c.id, None);
    assert_eq!(joined.to_list().unwrap(), joined.to_list().unwrap());
    assert_eq!(joined.count().unwrap(), 3);
}

proptest! {
    #[test]
    fn prop_join_row_count_matches_pairwise_count(
        outer in proptest::collection::vec(0u8..10, 0..40),
        inner in proptest::collection::vec(0u8..10, 0..40),
    ) {
        let expected: usize = outer
            .iter()
            .map(|o| inner.iter().filter(|i| *i == o).count())
            .sum();

        let rows = Seq::from_vec(outer.clone())
            .join(&Seq::from_vec(inner.clone()), |o| *o, |i| *i, |o, i| (*o, *i), None)
            .to_list()
            .unwrap();

        prop_assert_eq!(rows.len(), expected);
        prop_assert!(rows.iter().all(|(o, i)| o == i));
    }
}
