use std::sync::Arc;

use crate::query::QuerySpec;
use crate::remote::{ListReference, OfflineWriteRecorder, WriteAck};

/// Configuration for [`OptimisticList`](super::OptimisticList).
pub struct OptimisticListOptions {
    /// Remote list that writes are issued against.
    pub reference: Arc<dyn ListReference>,
    /// Records unacknowledged writes for retry (`None` = not recorded).
    pub recorder: Option<Arc<dyn OfflineWriteRecorder>>,
    /// Query to emulate locally (`None` = publish the raw mirror).
    pub query: Option<QuerySpec>,
}

impl OptimisticListOptions {
    pub fn new(reference: Arc<dyn ListReference>) -> Self {
        Self {
            reference,
            recorder: None,
            query: None,
        }
    }

    pub fn recorder(mut self, recorder: Arc<dyn OfflineWriteRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn query(mut self, query: QuerySpec) -> Self {
        self.query = Some(query);
        self
    }
}

/// Result of an insert: the key assigned to the new child and its
/// acknowledgement.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub key: String,
    pub ack: WriteAck,
}
