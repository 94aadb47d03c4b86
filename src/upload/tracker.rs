use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::config::UploadConfig;
use super::errors::{Result, UploadError};
use super::record::{demo_documents, UploadedFile};
use super::tracker_worker::UploadTrackerWorker;
use super::types::{DocumentCategory, FileDescriptor, TrackerCommand, UploadEvent, UploadId};

/// Cheap, cloneable front door to the tracker worker.
#[derive(Clone)]
pub struct UploadTracker {
    command_tx: mpsc::Sender<TrackerCommand>,
    event_tx: broadcast::Sender<UploadEvent>,
}

/// 追踪器句柄 - 包含追踪器和后台任务
pub struct UploadTrackerHandle {
    pub tracker: UploadTracker,
    pub worker_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl UploadTrackerHandle {
    /// Stops the worker and every pending transition timer.
    ///
    /// Other clones of the tracker keep working as values but their calls
    /// fail with [`UploadError::TrackerShutdown`] afterwards. Commands still
    /// queued when the worker stops fail the same way.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.tracker);
        self.cancellation_token.cancel();
        self.worker_handle.await
            .map_err(|err| UploadError::internal(format!("Worker panic: {}", err)))
    }
}

impl UploadTracker {
    /// Spawns the worker on the current tokio runtime.
    pub fn new(config: &UploadConfig) -> UploadTrackerHandle {
        // Validated configs never hit the floor; hand-built ones might
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let cancellation_token = CancellationToken::new();

        let seed = if config.seed_demo_documents {
            demo_documents()
        } else {
            Vec::new()
        };

        let worker_handle = tokio::spawn(UploadTrackerWorker::run(
            config.timings(),
            seed,
            command_rx,
            event_tx.clone(),
            cancellation_token.clone(),
        ));

        let tracker = Self {
            command_tx,
            event_tx,
        };

        UploadTrackerHandle {
            tracker,
            worker_handle,
            cancellation_token,
        }
    }

    /// Records every descriptor as `Uploading` and schedules its two deferred
    /// transitions. Returns once the records exist; ids follow input order.
    pub async fn submit(
        &self,
        files: Vec<FileDescriptor>,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<UploadId>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(TrackerCommand::Submit {
            files,
            category,
            reply: reply_tx,
        })
        .await?;

        reply_rx
            .await
            .map_err(|_| UploadError::TrackerShutdown)?
    }

    /// Same as [`submit`](Self::submit) but takes the category as picked in a
    /// form. An empty or blank label means no category was chosen.
    pub async fn submit_labeled(
        &self,
        files: Vec<FileDescriptor>,
        category: Option<&str>,
    ) -> Result<Vec<UploadId>> {
        let category = match category.map(str::trim) {
            Some(label) if !label.is_empty() => Some(label.parse::<DocumentCategory>()?),
            _ => None,
        };

        self.submit(files, category).await
    }

    /// Removes a record. Returns `false` if it was already gone.
    pub async fn remove(&self, upload_id: UploadId) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(TrackerCommand::Remove {
            upload_id,
            reply: reply_tx,
        })
        .await?;

        reply_rx
            .await
            .map_err(|_| UploadError::TrackerShutdown)
    }

    pub async fn get_file(&self, upload_id: UploadId) -> Result<Option<UploadedFile>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(TrackerCommand::GetFile {
            upload_id,
            reply: reply_tx,
        })
        .await?;

        reply_rx
            .await
            .map_err(|_| UploadError::TrackerShutdown)
    }

    /// Snapshot of all records in insertion order.
    pub async fn list_files(&self) -> Result<Vec<UploadedFile>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(TrackerCommand::ListFiles { reply: reply_tx }).await?;

        reply_rx
            .await
            .map_err(|_| UploadError::TrackerShutdown)
    }

    pub async fn file_count(&self) -> Result<usize> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(TrackerCommand::Count { reply: reply_tx }).await?;

        reply_rx
            .await
            .map_err(|_| UploadError::TrackerShutdown)
    }

    /// 订阅事件
    ///
    /// 注意：接收速度跟不上时会丢失事件（lagged error）
    pub fn subscribe_events(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    pub fn subscribe_filtered<F>(&self, filter: F) -> FilteredEventReceiver<F>
    where
        F: Fn(&UploadEvent) -> bool,
    {
        FilteredEventReceiver {
            receiver: self.event_tx.subscribe(),
            filter,
        }
    }

    async fn send(&self, command: TrackerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| UploadError::TrackerShutdown)
    }
}

/// 过滤的事件接收器
pub struct FilteredEventReceiver<F> {
    receiver: broadcast::Receiver<UploadEvent>,
    filter: F,
}

impl<F> FilteredEventReceiver<F>
where
    F: Fn(&UploadEvent) -> bool,
{
    pub async fn recv(&mut self) -> Result<UploadEvent, broadcast::error::RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if (self.filter)(&event) {
                return Ok(event);
            }
        }
    }
}
