//! ReplaySubject<T> — a single-slot replay broadcast.
//!
//! Holds the most recent value and hands it to every new observer at
//! subscription time, then forwards each later value as it is published.
//!
//! All methods take `&self`; observer state lives behind a
//! `parking_lot::Mutex` that is never held while callbacks run, so an
//! observer may subscribe, unsubscribe or publish from inside a callback.
//! Snapshot-on-publish semantics:
//!   - An observer removed *during* a publish is still called in that round.
//!   - An observer added *during* a publish only sees the replayed value.
//!
//! Panics inside an observer are caught so one faulty observer cannot stop
//! delivery to the rest.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::OptimisticListError;

/// Identifier of a registered observer.
pub type ListenerId = u64;

/// An owned one-shot closure that removes a subscription when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Callback receiving each published value.
pub type NextFn<T> = dyn Fn(&T) + Send + Sync;

/// Callback receiving failed passes.
pub type ErrorFn = dyn Fn(&OptimisticListError) + Send + Sync;

struct Observer<T> {
    id: ListenerId,
    on_next: Arc<NextFn<T>>,
    on_error: Option<Arc<ErrorFn>>,
}

struct SubjectState<T> {
    latest: Option<T>,
    observers: Vec<Observer<T>>,
    next_id: ListenerId,
}

/// Cheaply cloneable handle; clones share the same slot and observers.
pub struct ReplaySubject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for ReplaySubject<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                latest: None,
                observers: Vec::new(),
                next_id: 1,
            })),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ReplaySubject<T> {
    /// An empty subject with nothing to replay.
    pub fn new() -> Self {
        Self::default()
    }

    /// A subject already holding `value`.
    pub fn with_value(value: T) -> Self {
        let subject = Self::new();
        subject.state.lock().latest = Some(value);
        subject
    }

    /// Register an observer.
    ///
    /// If a value is held it is delivered to `on_next` before this returns.
    pub fn subscribe(
        &self,
        on_next: impl Fn(&T) + Send + Sync + 'static,
        on_error: Option<Arc<ErrorFn>>,
    ) -> Unsubscribe {
        let on_next: Arc<NextFn<T>> = Arc::new(on_next);
        let (id, replay) = {
            let mut st = self.state.lock();
            let id = st.next_id;
            st.next_id += 1;
            st.observers.push(Observer {
                id,
                on_next: Arc::clone(&on_next),
                on_error,
            });
            (id, st.latest.clone())
        };

        if let Some(value) = replay {
            let _ = catch_unwind(AssertUnwindSafe(|| on_next(&value)));
        }

        let state = Arc::clone(&self.state);
        Box::new(move || {
            state.lock().observers.retain(|o| o.id != id);
        })
    }

    /// Store `value` as the latest and deliver it to every observer.
    pub fn next(&self, value: T) {
        let snapshot: Vec<Arc<NextFn<T>>> = {
            let mut st = self.state.lock();
            st.latest = Some(value.clone());
            st.observers.iter().map(|o| Arc::clone(&o.on_next)).collect()
        };
        for cb in snapshot {
            let _ = catch_unwind(AssertUnwindSafe(|| cb(&value)));
        }
    }

    /// Deliver a failure to observers that registered an error callback.
    ///
    /// The held value is left untouched.
    pub fn error(&self, err: &OptimisticListError) {
        let snapshot: Vec<Arc<ErrorFn>> = {
            let st = self.state.lock();
            st.observers
                .iter()
                .filter_map(|o| o.on_error.as_ref().map(Arc::clone))
                .collect()
        };
        for cb in snapshot {
            let _ = catch_unwind(AssertUnwindSafe(|| cb(err)));
        }
    }

    /// The most recently published value.
    pub fn value(&self) -> Option<T> {
        self.state.lock().latest.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }
}
