//! End-to-end flows through `OptimisticList`.

use optimistic_list::{
    query::{QueryOption, QuerySpec},
    reactive::ReplaySubject,
    snapshot_from_json,
};
use serde_json::{json, Value};

use super::support::{harness, item, keys, observe};

#[test]
fn queued_insert_then_snapshot_then_dynamic_option() {
    let limit: ReplaySubject<Value> = ReplaySubject::new();
    let spec = QuerySpec::new()
        .with(QueryOption::OrderByChild, json!("name"))
        .with(QueryOption::LimitToFirst, limit.clone());
    let h = harness(|o| o.query(spec));
    let observed = observe(&h.list);

    // Unloaded: the insert queues and nothing is published.
    let pending = h.list.insert(json!({ "name": "y" }));
    assert_eq!(h.list.pending_len(), 1);
    assert_eq!(observed.count(), 0);

    // Empty authoritative snapshot: the queue drains and the raw mirror is
    // published because the query is not ready yet.
    h.list.receive_snapshot(None);
    assert_eq!(observed.count(), 1);
    let published = h.list.value().unwrap();
    assert_eq!(published, vec![item(&pending.key, json!({ "name": "y" }))]);
    assert_eq!(
        published[0].to_json(),
        json!({ "name": "y", "$key": pending.key })
    );

    // Another write while the query is pending still shows the raw mirror.
    h.list.insert(json!({ "name": "x" }));
    assert_eq!(observed.count(), 2);
    assert_eq!(observed.last_keys(), vec!["k1", "k2"]);

    // The pending option arrives: one pass with the query applied.
    limit.next(json!(1));
    assert!(h.list.is_query_ready());
    assert_eq!(observed.count(), 3);
    assert_eq!(observed.last_keys(), vec!["k2"]);
}

#[test]
fn order_by_child_is_case_insensitive() {
    let spec = QuerySpec::from_json(&json!({ "orderByChild": "n" }));
    let h = harness(|o| o.query(spec));

    h.list.receive_snapshot(Some(vec![
        item("1", json!({ "n": "Bob" })),
        item("2", json!({ "n": "alice" })),
    ]));

    let names: Vec<Value> = h
        .list
        .value()
        .unwrap()
        .iter()
        .map(|i| i.value["n"].clone())
        .collect();
    assert_eq!(names, vec![json!("alice"), json!("Bob")]);
}

#[test]
fn limit_to_first_takes_leading_items() {
    let five: Vec<_> = (1..=5).map(|n| item(&format!("i{n}"), json!(n))).collect();

    let h = harness(|o| o.query(QuerySpec::from_json(&json!({ "limitToFirst": 2 }))));
    h.list.receive_snapshot(Some(five.clone()));
    assert_eq!(keys(&h.list.value().unwrap()), vec!["i1", "i2"]);

    let h = harness(|o| o.query(QuerySpec::from_json(&json!({ "limitToFirst": 10 }))));
    h.list.receive_snapshot(Some(five.clone()));
    assert_eq!(h.list.value().unwrap(), five);
}

#[test]
fn range_query_over_child_values() {
    let spec = QuerySpec::from_json(&json!({
        "orderByChild": "score",
        "startAt": 20,
        "limitToFirst": 2
    }));
    let h = harness(|o| o.query(spec));

    let snapshot = snapshot_from_json(&json!([
        { "$key": "a", "score": 30 },
        { "$key": "b", "score": 10 },
        { "$key": "c", "score": 20 },
        { "$key": "d", "score": 40 }
    ]));
    h.list.receive_snapshot(snapshot);

    assert_eq!(keys(&h.list.value().unwrap()), vec!["c", "a"]);
}

#[test]
fn primitive_children_order_by_value() {
    let spec = QuerySpec::from_json(&json!({ "orderByValue": true, "limitToLast": 2 }));
    let h = harness(|o| o.query(spec));

    h.list
        .receive_snapshot(snapshot_from_json(&json!({ "a": 3, "b": 1, "c": 2 })));
    h.list.update("d", json!(0));

    assert_eq!(keys(&h.list.value().unwrap()), vec!["c", "a"]);
}

#[test]
fn dynamic_limit_changes_republish() {
    let limit: ReplaySubject<Value> = ReplaySubject::with_value(json!(1));
    let spec = QuerySpec::new()
        .with(QueryOption::OrderByKey, json!(true))
        .with(QueryOption::LimitToFirst, limit.clone());
    let h = harness(|o| o.query(spec));
    assert!(h.list.is_query_ready());

    let observed = observe(&h.list);
    h.list.receive_snapshot(Some(vec![
        item("c", json!(3)),
        item("a", json!(1)),
        item("b", json!(2)),
    ]));
    assert_eq!(observed.last_keys(), vec!["a"]);

    limit.next(json!(3));
    assert_eq!(observed.last_keys(), vec!["a", "b", "c"]);
    assert_eq!(observed.count(), 2);
}
