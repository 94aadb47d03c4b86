use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use super::types::{Transition, UploadId, UploadStatus};

/// Spawns one timer task per deferred transition.
///
/// A timer only knows the record id. When it fires it sends a [`Transition`]
/// back to the tracker worker, which decides whether the record still exists.
/// Removing a record never cancels its timers; shutting the tracker down does.
#[derive(Clone)]
pub struct TransitionScheduler {
    transition_tx: mpsc::UnboundedSender<Transition>,
    cancellation_token: CancellationToken,
}

impl TransitionScheduler {
    pub fn new(
        transition_tx: mpsc::UnboundedSender<Transition>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            transition_tx,
            cancellation_token,
        }
    }

    /// Fires `target` for `upload_id` once `delay` has passed since `from`.
    /// A deadline the clock cannot represent is never reached, so no timer
    /// is spawned for it.
    pub fn schedule(&self, upload_id: UploadId, target: UploadStatus, from: Instant, delay: Duration) {
        let Some(deadline) = from.checked_add(delay) else {
            tracing::warn!(%upload_id, %target, ?delay, "Transition delay out of range, not scheduled");
            return;
        };

        let transition_tx = self.transition_tx.clone();
        let cancellation_token = self.cancellation_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    // Worker gone means nobody is left to observe the record
                    let _ = transition_tx.send(Transition { upload_id, target });
                }
                _ = cancellation_token.cancelled() => {
                    tracing::trace!(%upload_id, %target, "Transition timer cancelled");
                }
            }
        });
    }
}
