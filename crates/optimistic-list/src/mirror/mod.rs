//! Mirror store — the in-memory copy of the remote list.
//!
//! - [`emulate`] — applies a single insert/update/delete to a list of items.
//! - [`state`] — [`MirrorState`], the unloaded/loaded lifecycle with its
//!   pre-load mutation queue.

pub mod emulate;
pub mod state;

pub use emulate::{apply_operation, apply_pending};
pub use state::{LoadOutcome, MirrorState, Recorded};
