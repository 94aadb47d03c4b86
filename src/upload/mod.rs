mod errors;
mod record;
mod scheduler;
mod tracker;
mod tracker_worker;
pub mod types;

pub use errors::{Result, UploadError};
pub use record::{demo_documents, UploadedFile};
pub use tracker::{FilteredEventReceiver, UploadTracker, UploadTrackerHandle};
pub use tracker_worker::StatusTimings;
pub use types::{
    DocumentCategory,
    FileAction,
    FileDescriptor,
    UploadEvent,
    UploadId,
    UploadStatus,
};
