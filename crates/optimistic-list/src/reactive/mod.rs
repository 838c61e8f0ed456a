//! Reactive layer — synchronous replay broadcast.
//!
//! [`ReplaySubject`] publishes the presented list to observers and is also
//! the shape a dynamic query option takes: anything that can be subscribed
//! to and replays its latest value.

pub mod replay;

pub use replay::{ErrorFn, ListenerId, NextFn, ReplaySubject, Unsubscribe};
