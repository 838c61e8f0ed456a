//! The enclosing observable that wires mirror, query emulation and the
//! remote collaborators together.

pub mod observable;
pub mod options;

pub use observable::OptimisticList;
pub use options::{OptimisticListOptions, PendingWrite};
