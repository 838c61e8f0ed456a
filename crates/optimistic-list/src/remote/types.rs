//! Contracts for the collaborators around the mirror: the remote list it
//! writes to, and the recorder that keeps unacknowledged writes for retry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::error::{RemoteWriteError, Result};

// ============================================================================
// WriteAck — settles when the remote store acknowledges a write
// ============================================================================

type AckState = Option<std::result::Result<(), RemoteWriteError>>;

/// Cloneable acknowledgement of a remote write.
///
/// Every clone observes the same outcome, so one acknowledgement can be
/// returned to the caller and handed to the offline recorder.
#[derive(Clone)]
pub struct WriteAck {
    rx: watch::Receiver<AckState>,
}

/// Completes the paired [`WriteAck`]. Dropping it unsettled rejects the
/// acknowledgement with [`RemoteErrorKind::Dropped`](crate::error::RemoteErrorKind::Dropped).
pub struct AckSender {
    tx: watch::Sender<AckState>,
}

impl WriteAck {
    pub fn channel() -> (AckSender, WriteAck) {
        let (tx, rx) = watch::channel(None);
        (AckSender { tx }, WriteAck { rx })
    }

    /// An acknowledgement that has already succeeded.
    pub fn resolved() -> Self {
        let (tx, ack) = Self::channel();
        tx.resolve();
        ack
    }

    /// An acknowledgement that has already failed.
    pub fn rejected(err: RemoteWriteError) -> Self {
        let (tx, ack) = Self::channel();
        tx.reject(err);
        ack
    }

    pub fn is_settled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// The outcome, if settled.
    pub fn try_result(&self) -> Option<Result<()>> {
        let state: AckState = (*self.rx.borrow()).clone();
        state.map(|outcome| outcome.map_err(Into::into))
    }

    /// Wait for the remote store to settle the write.
    pub async fn settled(mut self) -> Result<()> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(state) => match (*state).clone() {
                Some(outcome) => outcome.map_err(Into::into),
                None => Err(RemoteWriteError::dropped().into()),
            },
            Err(_) => Err(RemoteWriteError::dropped().into()),
        }
    }
}

impl fmt::Debug for WriteAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteAck")
            .field("state", &*self.rx.borrow())
            .finish()
    }
}

impl AckSender {
    pub fn resolve(self) {
        self.tx.send_replace(Some(Ok(())));
    }

    pub fn reject(self, err: RemoteWriteError) {
        self.tx.send_replace(Some(Err(err)));
    }

    pub fn settle(self, outcome: std::result::Result<(), RemoteWriteError>) {
        self.tx.send_replace(Some(outcome));
    }
}

// ============================================================================
// ListReference — remote write issuance
// ============================================================================

/// The remote list the mirror speculates about.
///
/// Each write method starts the remote write and returns at once; the
/// returned [`WriteAck`] settles when the remote store answers.
pub trait ListReference: Send + Sync {
    /// Location of the list, e.g. `/rooms/lobby/messages`.
    fn path(&self) -> String;

    /// Allocate the key for a new child, as a remote push would.
    fn generate_key(&self) -> String;

    /// Write `value` at `<path>/<key>`.
    fn set(&self, key: &str, value: Value) -> WriteAck;

    /// Update the child at `key`.
    fn update(&self, key: &str, value: Value) -> WriteAck;

    /// Remove one child, or the whole list when `key` is `None`.
    fn remove(&self, key: Option<&str>) -> WriteAck;
}

// ============================================================================
// Offline durability
// ============================================================================

/// Whether a recorded write targets a single child or the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Object,
    List,
}

/// Remote operation a recorded write replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineMethod {
    Set,
    Update,
    Remove,
}

/// A write the recorder keeps until `ack` settles.
#[derive(Debug, Clone)]
pub struct OfflineWrite {
    pub ack: WriteAck,
    pub kind: EntityKind,
    pub path: String,
    pub method: OfflineMethod,
    pub args: Vec<Value>,
}

/// Keeps pending writes so they can be retried after a disconnect.
///
/// Fire-and-forget: the list never waits on or inspects the outcome.
pub trait OfflineWriteRecorder: Send + Sync {
    fn record(&self, write: OfflineWrite);
}
