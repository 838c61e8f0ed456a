pub mod spawn;
pub mod types;

pub use spawn::{RemoteWriter, SpawnedReference};
pub use types::{
    AckSender, EntityKind, ListReference, OfflineMethod, OfflineWrite, OfflineWriteRecorder,
    WriteAck,
};
