//! Optimistic local mirror of a remote ordered list.
//!
//! Writes are applied to an in-memory mirror before the remote store
//! acknowledges them, and the remote query (ordering, bounds, limits) is
//! emulated over that mirror so observers see the speculative result
//! immediately.

pub mod error;
pub mod types;

pub mod list;
pub mod mirror;
pub mod query;
pub mod reactive;
pub mod remote;

pub use error::{OptimisticListError, QueryError, RemoteErrorKind, RemoteWriteError, Result};
pub use list::{OptimisticList, OptimisticListOptions, PendingWrite};
pub use types::{snapshot_from_json, Item, PendingOperation, Snapshot, WriteMethod};
