pub mod appointment;
pub mod config;
pub mod upload;

// 重新导出核心类型
pub use upload::{
    DocumentCategory,
    FileDescriptor,
    UploadError,
    UploadEvent,
    UploadId,
    UploadStatus,
    UploadTracker,
    UploadTrackerHandle,
    UploadedFile,
};

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests;
