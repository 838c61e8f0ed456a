use optimistic_list::{
    query::{simulate, QueryOption, ResolvedQuery},
    Item, OptimisticListError, QueryError,
};
use serde_json::{json, Value};

fn people() -> Vec<Item> {
    vec![
        Item::new("p1", json!({ "name": "carol", "age": 41 })),
        Item::new("p2", json!({ "name": "Alice", "age": 29 })),
        Item::new("p3", json!({ "name": "bob", "age": 35 })),
        Item::new("p4", json!({ "age": 18 })),
        Item::new("p5", json!({ "name": "Dave", "age": 29 })),
    ]
}

fn keys(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.key.as_str()).collect()
}

fn run(query: Value) -> Vec<String> {
    let resolved: ResolvedQuery = serde_json::from_value(query).unwrap();
    simulate(&people(), &resolved)
        .unwrap()
        .into_iter()
        .map(|i| i.key)
        .collect()
}

#[test]
fn order_by_child_puts_missing_field_first() {
    assert_eq!(
        run(json!({ "orderByChild": "name" })),
        vec!["p4", "p2", "p3", "p1", "p5"]
    );
}

#[test]
fn order_by_child_is_stable_for_ties() {
    assert_eq!(
        run(json!({ "orderByChild": "age" })),
        vec!["p4", "p2", "p5", "p3", "p1"]
    );
}

#[test]
fn order_by_key_then_limit_to_last() {
    assert_eq!(
        run(json!({ "orderByKey": true, "limitToLast": 2 })),
        vec!["p4", "p5"]
    );
}

#[test]
fn start_and_end_compose() {
    // ages ordered: 18 29 29 35 41
    assert_eq!(
        run(json!({ "orderByChild": "age", "startAt": 29, "endAt": 29 })),
        vec!["p3", "p1"]
    );
}

#[test]
fn start_at_then_limit_to_first() {
    assert_eq!(
        run(json!({ "orderByChild": "age", "startAt": 29, "limitToFirst": 2 })),
        vec!["p2", "p5"]
    );
}

#[test]
fn equal_to_trims_forward_at_each_mismatch() {
    // ages ordered: 18 29 29 35 41; the walk trims at index 1, then at
    // index 2 of the shortened list, and runs out of items
    assert_eq!(
        run(json!({ "orderByChild": "age", "equalTo": 18, "limitToFirst": 3 })),
        vec!["p3", "p1"]
    );
}

#[test]
fn bound_pinned_to_key() {
    let pinned = json!({ "orderByChild": "age", "startAt": { "value": 29, "key": "p5" } });
    assert_eq!(run(pinned), vec!["p5", "p3", "p1"]);
}

#[test]
fn order_by_key_bound_ignores_pin() {
    let q = json!({ "orderByKey": true, "startAt": { "value": "p3", "key": "other" } });
    assert_eq!(run(q), vec!["p3", "p4", "p5"]);
}

#[test]
fn bound_without_ordering_matches_nothing() {
    assert_eq!(run(json!({ "startAt": 29 })), vec!["p1", "p2", "p3", "p4", "p5"]);
}

#[test]
fn null_limit_counts_as_unset() {
    assert_eq!(run(json!({ "limitToFirst": null, "limitToLast": 1 })), vec!["p5"]);
}

#[test]
fn equal_to_conflict_is_reported_before_limits_apply() {
    let q = ResolvedQuery::new()
        .with(QueryOption::OrderByChild, json!("age"))
        .with(QueryOption::EqualTo, json!(29))
        .with(QueryOption::StartAt, json!(18));
    assert!(matches!(
        simulate(&people(), &q),
        Err(OptimisticListError::Query(QueryError::EqualToWithRange))
    ));
}

#[test]
fn fractional_limit_is_invalid() {
    let q = ResolvedQuery::new().with(QueryOption::LimitToLast, json!(1.5));
    match simulate(&people(), &q) {
        Err(OptimisticListError::Query(QueryError::InvalidLimit { option, value })) => {
            assert_eq!(option, "limitToLast");
            assert_eq!(value, json!(1.5));
        }
        other => panic!("expected invalid limit, got {other:?}"),
    }
}

#[test]
fn empty_mirror_stays_empty() {
    let q = ResolvedQuery::new()
        .with(QueryOption::OrderByValue, json!(true))
        .with(QueryOption::LimitToFirst, json!(3));
    assert!(keys(&simulate(&[], &q).unwrap()).is_empty());
}
