//! SpawnedReference — drives an async remote writer behind the synchronous
//! [`ListReference`] contract.
//!
//! Each write is spawned onto a tokio runtime and its outcome settles the
//! returned [`WriteAck`]. Without a runtime the write is rejected
//! immediately rather than panicking.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;

use crate::error::{RemoteErrorKind, RemoteWriteError};

use super::types::{ListReference, WriteAck};

/// User-implemented async client for the remote list.
#[async_trait]
pub trait RemoteWriter: Send + Sync + 'static {
    fn path(&self) -> String;

    fn generate_key(&self) -> String;

    async fn set(&self, key: String, value: Value) -> Result<(), RemoteWriteError>;

    async fn update(&self, key: String, value: Value) -> Result<(), RemoteWriteError>;

    async fn remove(&self, key: Option<String>) -> Result<(), RemoteWriteError>;
}

pub struct SpawnedReference<W: RemoteWriter> {
    writer: Arc<W>,
    handle: Option<Handle>,
}

impl<W: RemoteWriter> SpawnedReference<W> {
    /// Wrap `writer`, capturing the current runtime if there is one.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(writer),
            handle: Handle::try_current().ok(),
        }
    }

    pub fn with_handle(writer: W, handle: Handle) -> Self {
        Self {
            writer: Arc::new(writer),
            handle: Some(handle),
        }
    }

    fn spawn<F>(&self, op: &'static str, write: F) -> WriteAck
    where
        F: Future<Output = Result<(), RemoteWriteError>> + Send + 'static,
    {
        let Some(handle) = self.handle.clone().or_else(|| Handle::try_current().ok()) else {
            return WriteAck::rejected(RemoteWriteError::with_kind(
                "no async runtime available for remote write",
                RemoteErrorKind::Transport,
            ));
        };

        let (tx, ack) = WriteAck::channel();
        handle.spawn(async move {
            let outcome = write.await;
            if let Err(e) = &outcome {
                tracing::warn!(op, error = %e, kind = ?e.kind, "remote write failed");
            }
            tx.settle(outcome);
        });
        ack
    }
}

impl<W: RemoteWriter> ListReference for SpawnedReference<W> {
    fn path(&self) -> String {
        self.writer.path()
    }

    fn generate_key(&self) -> String {
        self.writer.generate_key()
    }

    fn set(&self, key: &str, value: Value) -> WriteAck {
        let writer = Arc::clone(&self.writer);
        let key = key.to_string();
        self.spawn("set", async move { writer.set(key, value).await })
    }

    fn update(&self, key: &str, value: Value) -> WriteAck {
        let writer = Arc::clone(&self.writer);
        let key = key.to_string();
        self.spawn("update", async move { writer.update(key, value).await })
    }

    fn remove(&self, key: Option<&str>) -> WriteAck {
        let writer = Arc::clone(&self.writer);
        let key = key.map(str::to_string);
        self.spawn("remove", async move { writer.remove(key).await })
    }
}
