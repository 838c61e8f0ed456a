//! QueryResolver — turns a declared [`QuerySpec`] into a [`ResolvedQuery`].
//!
//! Static options are copied at construction. Dynamic options are handed
//! back to the owner, which subscribes to them and feeds every value into
//! [`QueryResolver::update`]. The query becomes ready the first time every
//! declared option has a value; that transition happens once; later values
//! only replace what was resolved.

use std::collections::BTreeSet;

use serde_json::Value;
use tokio::sync::watch;

use crate::reactive::ReplaySubject;

use super::types::{QueryOption, QueryParam, QuerySpec, ResolvedQuery};

/// What an option update did to readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveEvent {
    /// Some declared options still have no value.
    Pending,
    /// This update completed the query.
    BecameReady,
    /// The query was already ready; a value changed.
    Updated,
}

/// Read side of the one-shot readiness signal.
#[derive(Debug, Clone)]
pub struct QueryReadiness {
    rx: watch::Receiver<bool>,
}

impl QueryReadiness {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the query is ready. Returns `false` if the resolver was
    /// dropped first.
    pub async fn wait(mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

pub struct QueryResolver {
    expected: BTreeSet<QueryOption>,
    resolved: ResolvedQuery,
    ready_tx: watch::Sender<bool>,
}

impl QueryResolver {
    /// Copy static options and return the dynamic ones for the caller to
    /// subscribe to.
    pub fn new(spec: &QuerySpec) -> (Self, Vec<(QueryOption, ReplaySubject<Value>)>) {
        let (ready_tx, _) = watch::channel(false);
        let mut resolver = Self {
            expected: spec.options().collect(),
            resolved: ResolvedQuery::new(),
            ready_tx,
        };

        let mut dynamic = Vec::new();
        for (option, param) in spec.iter() {
            match param {
                QueryParam::Static(value) => resolver.resolved.insert(option, value.clone()),
                QueryParam::Dynamic(subject) => dynamic.push((option, subject.clone())),
            }
        }
        resolver.check_ready();
        (resolver, dynamic)
    }

    /// Record a value for `option`.
    pub fn update(&mut self, option: QueryOption, value: Value) -> ResolveEvent {
        self.resolved.insert(option, value);
        if self.is_ready() {
            return ResolveEvent::Updated;
        }
        if self.check_ready() {
            ResolveEvent::BecameReady
        } else {
            ResolveEvent::Pending
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    pub fn resolved(&self) -> &ResolvedQuery {
        &self.resolved
    }

    pub fn readiness(&self) -> QueryReadiness {
        QueryReadiness {
            rx: self.ready_tx.subscribe(),
        }
    }

    /// Options declared but not yet resolved.
    pub fn missing(&self) -> Vec<QueryOption> {
        self.expected
            .iter()
            .copied()
            .filter(|opt| !self.resolved.contains(*opt))
            .collect()
    }

    fn check_ready(&mut self) -> bool {
        if self.is_ready() {
            return false;
        }
        if self.expected.iter().all(|opt| self.resolved.contains(*opt)) {
            self.ready_tx.send_replace(true);
            tracing::debug!(options = self.expected.len(), "query is ready");
            return true;
        }
        false
    }
}
