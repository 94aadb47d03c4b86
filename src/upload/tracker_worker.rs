use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use super::errors::{Result, UploadError};
use super::record::UploadedFile;
use super::scheduler::TransitionScheduler;
use super::types::{
    DocumentCategory,
    FileDescriptor,
    TrackerCommand,
    Transition,
    UploadEvent,
    UploadId,
    UploadStatus,
};

/// Delays measured from the submission instant.
#[derive(Debug, Clone, Copy)]
pub struct StatusTimings {
    pub processing_after: Duration,
    pub processed_after: Duration,
}

/// Sole owner of the record list. Everything that changes a record goes
/// through this loop, one message at a time.
pub struct UploadTrackerWorker {
    files: Vec<UploadedFile>,
    timings: StatusTimings,
    scheduler: TransitionScheduler,
    event_tx: broadcast::Sender<UploadEvent>,
}

impl UploadTrackerWorker {
    pub(crate) async fn run(
        timings: StatusTimings,
        seed: Vec<UploadedFile>,
        mut command_rx: mpsc::Receiver<TrackerCommand>,
        event_tx: broadcast::Sender<UploadEvent>,
        cancellation_token: CancellationToken,
    ) {
        let (transition_tx, mut transition_rx) = mpsc::unbounded_channel();
        let mut worker = Self {
            files: seed,
            timings,
            scheduler: TransitionScheduler::new(transition_tx, cancellation_token.clone()),
            event_tx,
        };

        tracing::debug!(seeded = worker.files.len(), "Upload tracker started");

        // 主事件循环
        loop {
            tokio::select! {
                // Shutdown wins over queued work
                biased;

                _ = cancellation_token.cancelled() => break,
                command = command_rx.recv() => match command {
                    Some(command) => worker.handle_command(command),
                    None => break,
                },
                Some(transition) = transition_rx.recv() => {
                    worker.apply_transition(transition);
                }
            }
        }

        // 停止所有未触发的定时器
        cancellation_token.cancel();
        tracing::debug!(remaining = worker.files.len(), "Upload tracker stopped");
    }

    fn handle_command(&mut self, command: TrackerCommand) {
        match command {
            TrackerCommand::Submit { files, category, reply } => {
                let result = self.submit(files, category);
                let _ = reply.send(result);
            }
            TrackerCommand::Remove { upload_id, reply } => {
                let removed = self.remove(upload_id);
                let _ = reply.send(removed);
            }
            TrackerCommand::GetFile { upload_id, reply } => {
                let file = self.files
                    .iter()
                    .find(|file| file.id == upload_id)
                    .cloned();
                let _ = reply.send(file);
            }
            TrackerCommand::ListFiles { reply } => {
                let _ = reply.send(self.files.clone());
            }
            TrackerCommand::Count { reply } => {
                let _ = reply.send(self.files.len());
            }
        }
    }

    fn submit(&mut self, files: Vec<FileDescriptor>, category: Option<DocumentCategory>) -> Result<Vec<UploadId>> {
        if files.is_empty() {
            return Err(UploadError::EmptyBatch);
        }

        let submitted_at = Instant::now();
        let mut upload_ids = Vec::with_capacity(files.len());

        for descriptor in files {
            let file = UploadedFile::intake(descriptor, category);
            let upload_id = file.id;

            tracing::info!(
                %upload_id,
                name = %file.name,
                category = %file.category,
                size = %file.display_size(),
                "File submitted"
            );

            let _ = self.event_tx.send(UploadEvent::Submitted {
                upload_id,
                name: file.name.clone(),
                category: file.category,
            });
            self.files.push(file);

            self.scheduler.schedule(
                upload_id,
                UploadStatus::Processing,
                submitted_at,
                self.timings.processing_after,
            );
            self.scheduler.schedule(
                upload_id,
                UploadStatus::Processed,
                submitted_at,
                self.timings.processed_after,
            );

            upload_ids.push(upload_id);
        }

        Ok(upload_ids)
    }

    fn remove(&mut self, upload_id: UploadId) -> bool {
        let Some(index) = self.files.iter().position(|file| file.id == upload_id) else {
            return false;
        };

        let file = self.files.remove(index);
        tracing::info!(%upload_id, name = %file.name, status = %file.status, "File removed");
        let _ = self.event_tx.send(UploadEvent::Removed { upload_id });

        true
    }

    fn apply_transition(&mut self, transition: Transition) {
        let Transition { upload_id, target } = transition;

        // 记录已被删除时直接丢弃
        let Some(file) = self.files.iter_mut().find(|file| file.id == upload_id) else {
            tracing::debug!(%upload_id, %target, "Dropping transition for removed file");
            return;
        };

        let old_status = file.status;
        if !old_status.can_advance_to(target) {
            tracing::debug!(%upload_id, %old_status, %target, "Dropping non-forward transition");
            return;
        }

        file.status = target;
        tracing::info!(%upload_id, %old_status, new_status = %target, "File status changed");

        let _ = self.event_tx.send(UploadEvent::StatusChanged {
            upload_id,
            old_status,
            new_status: target,
        });
    }
}
