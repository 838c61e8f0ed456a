//! MirrorState — the mirror and its pre-load mutation queue.
//!
//! The mirror is either unloaded, holding speculative operations in
//! submission order, or loaded, holding the ordered items. The first
//! snapshot moves it from one to the other and replays the queue; the
//! queue does not exist afterwards.

use serde_json::Value;

use crate::types::{Item, PendingOperation, WriteMethod};

use super::emulate::{apply_operation, apply_pending};

/// Outcome of [`MirrorState::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The mirror is unloaded; the operation waits for the first snapshot.
    Queued,
    /// The operation was applied to the loaded mirror.
    Applied,
    /// The operation could not be applied (keyless insert/update).
    Skipped,
}

/// Outcome of [`MirrorState::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// True when this snapshot was the first one.
    pub first_load: bool,
    /// Number of queued operations replayed on top of the snapshot.
    pub replayed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MirrorState {
    Unloaded { queue: Vec<PendingOperation> },
    Loaded { items: Vec<Item> },
}

impl Default for MirrorState {
    fn default() -> Self {
        Self::Unloaded { queue: Vec::new() }
    }
}

impl MirrorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Current items, or `None` while unloaded.
    pub fn items(&self) -> Option<&[Item]> {
        match self {
            Self::Loaded { items } => Some(items),
            Self::Unloaded { .. } => None,
        }
    }

    /// Number of operations waiting for the first snapshot.
    pub fn pending_len(&self) -> usize {
        match self {
            Self::Unloaded { queue } => queue.len(),
            Self::Loaded { .. } => 0,
        }
    }

    /// Queue a copy of the operation while unloaded, otherwise apply it.
    pub fn record(&mut self, method: WriteMethod, value: &Value, key: Option<&str>) -> Recorded {
        match self {
            Self::Unloaded { queue } => {
                queue.push(PendingOperation::new(method, value, key));
                Recorded::Queued
            }
            Self::Loaded { items } => {
                if apply_operation(items, method, value.clone(), key) {
                    Recorded::Applied
                } else {
                    Recorded::Skipped
                }
            }
        }
    }

    /// Install an authoritative snapshot.
    ///
    /// A `None` snapshot means the remote collection is empty. On the first
    /// load every queued operation is replayed in order on top of the
    /// snapshot. Later snapshots replace the items outright.
    pub fn load(&mut self, snapshot: Option<Vec<Item>>) -> LoadOutcome {
        let mut items = Vec::new();
        for item in snapshot.unwrap_or_default() {
            apply_operation(&mut items, WriteMethod::Insert, item.value, Some(&item.key));
        }

        let previous = std::mem::replace(self, Self::Loaded { items: Vec::new() });
        let outcome = match previous {
            Self::Unloaded { queue } => {
                let replayed = queue.len();
                for op in queue {
                    apply_pending(&mut items, op);
                }
                LoadOutcome {
                    first_load: true,
                    replayed,
                }
            }
            Self::Loaded { .. } => LoadOutcome {
                first_load: false,
                replayed: 0,
            },
        };
        *self = Self::Loaded { items };
        outcome
    }
}
