//! Query emulation — options, resolution of dynamic options, and local
//! simulation of the remote query over the mirror.
//!
//! # Modules
//!
//! - [`types`] — [`QueryOption`], [`QuerySpec`], [`ResolvedQuery`].
//! - [`operators`] — value comparison and bound matching.
//! - [`resolver`] — [`QueryResolver`] and its readiness signal.
//! - [`simulate`] — [`simulate`](simulate::simulate) over a mirror snapshot.

pub mod operators;
pub mod resolver;
pub mod simulate;
pub mod types;

pub use resolver::{QueryReadiness, QueryResolver, ResolveEvent};
pub use simulate::simulate;
pub use types::{OrderBy, QueryBound, QueryOption, QueryParam, QuerySpec, ResolvedQuery};
