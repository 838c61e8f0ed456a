//! OptimisticList — a remote list mirrored locally, with writes applied to
//! the mirror before the remote store acknowledges them.
//!
//! # Flow
//!
//! Every write is emulated against the mirror, issued to the
//! [`ListReference`], and handed to the offline recorder. Until the first
//! snapshot arrives the emulation is queued; the first snapshot replays
//! the queue and publishes once. After that every write, snapshot and
//! query-option change runs one pass: simulate the query over the mirror
//! and publish the result.
//!
//! # Threading model
//!
//! `OptimisticList` is `Send + Sync`. Mirror and resolver state sit behind
//! one `parking_lot::Mutex`, which is released before anything is
//! published, so observers may call back into the list.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    error::Result,
    mirror::{MirrorState, Recorded},
    query::{simulate, QueryOption, QueryReadiness, QueryResolver, ResolveEvent, ResolvedQuery},
    reactive::{ErrorFn, ReplaySubject, Unsubscribe},
    remote::{
        EntityKind, ListReference, OfflineMethod, OfflineWrite, OfflineWriteRecorder, WriteAck,
    },
    types::{Item, Snapshot, WriteMethod},
};

use super::options::{OptimisticListOptions, PendingWrite};

// ============================================================================
// Shared state
// ============================================================================

struct ListState {
    mirror: MirrorState,
    /// `None` when no query was declared.
    resolver: Option<QueryResolver>,
}

struct ListInner {
    reference: Arc<dyn ListReference>,
    recorder: Option<Arc<dyn OfflineWriteRecorder>>,
    path: String,
    state: Mutex<ListState>,
    output: ReplaySubject<Vec<Item>>,
}

impl ListInner {
    /// Queue or apply one mutation; applied mutations run a pass.
    fn emulate(&self, method: WriteMethod, value: &Value, key: Option<&str>) {
        let recorded = self.state.lock().mirror.record(method, value, key);
        match recorded {
            Recorded::Queued => {
                tracing::debug!(
                    path = %self.path,
                    ?method,
                    key = ?key,
                    "mirror not loaded; operation queued"
                );
            }
            Recorded::Applied => self.publish(),
            Recorded::Skipped => {}
        }
    }

    fn receive_snapshot(&self, snapshot: Snapshot) {
        let outcome = self.state.lock().mirror.load(snapshot);
        if outcome.first_load && outcome.replayed > 0 {
            tracing::debug!(
                path = %self.path,
                replayed = outcome.replayed,
                "replayed queued operations onto first snapshot"
            );
        }
        self.publish();
    }

    fn on_query_param(&self, option: QueryOption, value: Value) {
        let event = {
            let mut st = self.state.lock();
            match st.resolver.as_mut() {
                Some(resolver) => resolver.update(option, value),
                None => return,
            }
        };
        match event {
            ResolveEvent::Pending => {}
            ResolveEvent::BecameReady | ResolveEvent::Updated => self.publish(),
        }
    }

    /// The presented list, or `None` while the mirror is unloaded. The raw
    /// mirror is presented until the query is ready.
    fn present(&self) -> Option<Result<Vec<Item>>> {
        let st = self.state.lock();
        let items = st.mirror.items()?;
        Some(match &st.resolver {
            Some(resolver) if resolver.is_ready() => simulate(items, resolver.resolved()),
            _ => Ok(items.to_vec()),
        })
    }

    /// Publish the presented list. A failed simulation is reported to error
    /// observers and leaves the previously published value in place.
    fn publish(&self) {
        match self.present() {
            None => {}
            Some(Ok(items)) => {
                tracing::trace!(path = %self.path, len = items.len(), "publishing list");
                self.output.next(items);
            }
            Some(Err(e)) => {
                tracing::warn!(path = %self.path, error = %e, "query simulation failed");
                self.output.error(&e);
            }
        }
    }

    fn record_offline(
        &self,
        ack: &WriteAck,
        kind: EntityKind,
        path: String,
        method: OfflineMethod,
        args: Vec<Value>,
    ) {
        if let Some(recorder) = &self.recorder {
            recorder.record(OfflineWrite {
                ack: ack.clone(),
                kind,
                path,
                method,
                args,
            });
        }
    }
}

// ============================================================================
// OptimisticList
// ============================================================================

pub struct OptimisticList {
    inner: Arc<ListInner>,
    /// Subscriptions to upstream sources, released on drop.
    upstream: Mutex<Vec<Unsubscribe>>,
}

impl OptimisticList {
    pub fn new(options: OptimisticListOptions) -> Self {
        let (resolver, dynamic) = match &options.query {
            Some(spec) => {
                let (resolver, dynamic) = QueryResolver::new(spec);
                (Some(resolver), dynamic)
            }
            None => (None, Vec::new()),
        };

        let inner = Arc::new(ListInner {
            path: options.reference.path(),
            reference: options.reference,
            recorder: options.recorder,
            state: Mutex::new(ListState {
                mirror: MirrorState::new(),
                resolver,
            }),
            output: ReplaySubject::new(),
        });

        let list = Self {
            inner,
            upstream: Mutex::new(Vec::new()),
        };

        // Subjects replay on subscribe, so an option that already has a
        // value resolves here.
        for (option, subject) in dynamic {
            let weak: Weak<ListInner> = Arc::downgrade(&list.inner);
            let unsub = subject.subscribe(
                move |value: &Value| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_query_param(option, value.clone());
                    }
                },
                None,
            );
            list.upstream.lock().push(unsub);
        }

        list
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Add a new child under a freshly generated key.
    pub fn insert(&self, value: Value) -> PendingWrite {
        let key = self.inner.reference.generate_key();
        self.inner.emulate(WriteMethod::Insert, &value, Some(&key));

        let ack = self.inner.reference.set(&key, value.clone());
        self.inner.record_offline(
            &ack,
            EntityKind::Object,
            format!("{}/{}", self.inner.path, key),
            OfflineMethod::Set,
            vec![value],
        );
        PendingWrite { key, ack }
    }

    /// Update the child at `key`; an unknown key is added.
    pub fn update(&self, key: &str, value: Value) -> WriteAck {
        self.inner.emulate(WriteMethod::Update, &value, Some(key));

        let ack = self.inner.reference.update(key, value.clone());
        self.inner.record_offline(
            &ack,
            EntityKind::List,
            self.inner.path.clone(),
            OfflineMethod::Update,
            vec![Value::String(key.to_string()), value],
        );
        ack
    }

    /// Remove the child at `key`, or every child when `key` is `None`.
    pub fn delete(&self, key: Option<&str>) -> WriteAck {
        self.inner.emulate(WriteMethod::Delete, &Value::Null, key);

        let ack = self.inner.reference.remove(key);
        let arg = key.map_or(Value::Null, |k| Value::String(k.to_string()));
        self.inner.record_offline(
            &ack,
            EntityKind::List,
            self.inner.path.clone(),
            OfflineMethod::Remove,
            vec![arg],
        );
        ack
    }

    // -----------------------------------------------------------------------
    // Upstream
    // -----------------------------------------------------------------------

    /// Install an authoritative snapshot of the remote list.
    pub fn receive_snapshot(&self, snapshot: Snapshot) {
        self.inner.receive_snapshot(snapshot);
    }

    /// Follow a snapshot source until this list is dropped.
    pub fn attach_snapshots(&self, source: &ReplaySubject<Snapshot>) {
        let weak = Arc::downgrade(&self.inner);
        let unsub = source.subscribe(
            move |snapshot: &Snapshot| {
                if let Some(inner) = weak.upgrade() {
                    inner.receive_snapshot(snapshot.clone());
                }
            },
            None,
        );
        self.upstream.lock().push(unsub);
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Observe the presented list. The latest value, if any, is delivered
    /// before this returns.
    pub fn subscribe(
        &self,
        on_next: impl Fn(&Vec<Item>) + Send + Sync + 'static,
        on_error: Option<Arc<ErrorFn>>,
    ) -> Unsubscribe {
        self.inner.output.subscribe(on_next, on_error)
    }

    /// The most recently published list.
    pub fn value(&self) -> Option<Vec<Item>> {
        self.inner.output.value()
    }

    /// The mirror as stored, before query simulation.
    pub fn mirror(&self) -> Option<Vec<Item>> {
        self.inner.state.lock().mirror.items().map(<[Item]>::to_vec)
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.lock().mirror.is_loaded()
    }

    /// Operations waiting for the first snapshot.
    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().mirror.pending_len()
    }

    /// False when no query was declared.
    pub fn is_query_ready(&self) -> bool {
        self.inner
            .state
            .lock()
            .resolver
            .as_ref()
            .is_some_and(QueryResolver::is_ready)
    }

    pub fn resolved_query(&self) -> Option<ResolvedQuery> {
        self.inner
            .state
            .lock()
            .resolver
            .as_ref()
            .map(|r| r.resolved().clone())
    }

    pub fn readiness(&self) -> Option<QueryReadiness> {
        self.inner.state.lock().resolver.as_ref().map(QueryResolver::readiness)
    }

    /// Re-run the query over the current mirror without publishing.
    pub fn evaluate(&self) -> Option<Result<Vec<Item>>> {
        self.inner.present()
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    pub fn observer_count(&self) -> usize {
        self.inner.output.observer_count()
    }
}

impl Drop for OptimisticList {
    fn drop(&mut self) {
        for unsub in self.upstream.get_mut().drain(..) {
            unsub();
        }
    }
}
