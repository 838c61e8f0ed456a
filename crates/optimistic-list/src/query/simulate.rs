//! Query simulation — derive what the server-side query would return from
//! the local mirror, without an index.
//!
//! Works on a copy of the mirror. Steps, in order:
//!
//! 1. Order (`orderByChild` / `orderByKey` / `orderByValue`; stable sort).
//! 2. `equalTo` — exclusive with `startAt` / `endAt`.
//! 3. Otherwise `startAt`, then `endAt`.
//! 4. `limitToFirst` / `limitToLast` — exclusive with each other.
//!
//! The bound operators reproduce the remote client's local emulation
//! exactly, including its slicing rules:
//!
//! - `equalTo` walks forward over the original length and, at each index
//!   whose item does not match, drops everything before that index. The
//!   list shrinks while the walk continues, so later indices refer to the
//!   shortened list.
//! - `startAt` keeps the list from the first matching item onward.
//! - `endAt` finds the last matching item and keeps only what follows it.

use crate::error::{QueryError, Result};
use crate::types::{Item, KEY_FIELD, VALUE_FIELD};

use super::operators::{compare_items, matches_bound};
use super::types::{OrderBy, QueryBound, QueryOption, ResolvedQuery};

/// Run `query` over `mirror` and return the presented sequence.
pub fn simulate(mirror: &[Item], query: &ResolvedQuery) -> Result<Vec<Item>> {
    let mut items = mirror.to_vec();

    let order_field = query.order_by().and_then(|order| match order {
        OrderBy::Child(child) => Some(child),
        OrderBy::Key => Some(KEY_FIELD.to_string()),
        OrderBy::Value => Some(VALUE_FIELD.to_string()),
        OrderBy::Priority => None,
    });
    if let Some(field) = &order_field {
        order_by(&mut items, field);
    }
    let field = order_field.as_deref();

    let first = query.limit(QueryOption::LimitToFirst)?;
    let last = query.limit(QueryOption::LimitToLast)?;
    if first.is_some() && last.is_some() {
        return Err(QueryError::LimitFirstWithLast.into());
    }

    if let Some(bound) = query.bound(QueryOption::EqualTo) {
        if query.contains(QueryOption::StartAt) || query.contains(QueryOption::EndAt) {
            return Err(QueryError::EqualToWithRange.into());
        }
        equal_to(&mut items, field, &bound);
    } else {
        if let Some(bound) = query.bound(QueryOption::StartAt) {
            start_at(&mut items, field, &bound);
        }
        if let Some(bound) = query.bound(QueryOption::EndAt) {
            end_at(&mut items, field, &bound);
        }
    }

    if let Some(n) = first {
        limit_to_first(&mut items, n);
    }
    if let Some(n) = last {
        limit_to_last(&mut items, n);
    }

    Ok(items)
}

/// Stable sort on `field`; strings compare case-insensitively.
pub fn order_by(items: &mut [Item], field: &str) {
    items.sort_by(|a, b| compare_items(a, b, field));
}

pub fn equal_to(items: &mut Vec<Item>, field: Option<&str>, bound: &QueryBound) {
    let scan_len = items.len();
    let mut index = 0;
    while index < scan_len && index < items.len() {
        if !matches_bound(&items[index], field, bound) {
            items.drain(..index);
        }
        index += 1;
    }
}

pub fn start_at(items: &mut Vec<Item>, field: Option<&str>, bound: &QueryBound) {
    if let Some(pos) = items.iter().position(|item| matches_bound(item, field, bound)) {
        items.drain(..pos);
    }
}

pub fn end_at(items: &mut Vec<Item>, field: Option<&str>, bound: &QueryBound) {
    if let Some(pos) = items.iter().rposition(|item| matches_bound(item, field, bound)) {
        items.drain(..=pos);
    }
}

pub fn limit_to_first(items: &mut Vec<Item>, limit: usize) {
    if limit < items.len() {
        items.truncate(limit);
    }
}

pub fn limit_to_last(items: &mut Vec<Item>, limit: usize) {
    if limit < items.len() {
        items.drain(..items.len() - limit);
    }
}

// ============================================================================
// Tests
// ============================================================================
