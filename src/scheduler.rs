//! # Ephemeral Message Scheduler
//!
//! Deletes messages after a delay. Every schedule is an independent tokio
//! task: it sleeps, then makes exactly one pass over its message ids. A
//! failed deletion is logged and the pass continues with the next id.

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};
use tracing::{debug, info, warn};

use crate::transport::MessageDeleter;

/// Lifetime of lists, confirmations and the greeting pair
pub const REPLY_DELETE_AFTER: Duration = Duration::from_secs(300);
/// Lifetime of short failure notices
pub const NOTICE_DELETE_AFTER: Duration = Duration::from_secs(30);

/// Delays applied by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionDelays {
    pub reply: Duration,
    pub notice: Duration,
}

impl Default for DeletionDelays {
    fn default() -> Self {
        Self {
            reply: REPLY_DELETE_AFTER,
            notice: NOTICE_DELETE_AFTER,
        }
    }
}

/// One pending deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDeletion {
    pub chat_id: ChatId,
    pub message_ids: Vec<MessageId>,
    pub delay: Duration,
}

/// Summary of a completed deletion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: usize,
    pub skipped: usize,
}

impl ScheduledDeletion {
    /// Wait for the delay, then delete every message in order
    pub async fn run(self, deleter: &dyn MessageDeleter) -> DeletionReport {
        tokio::time::sleep(self.delay).await;
        self.delete_all(deleter).await
    }

    async fn delete_all(&self, deleter: &dyn MessageDeleter) -> DeletionReport {
        let mut report = DeletionReport::default();

        for &message_id in &self.message_ids {
            let outcome = deleter.delete_message(self.chat_id, message_id).await;
            if outcome.is_deleted() {
                report.deleted += 1;
            } else {
                report.skipped += 1;
                warn!(
                    chat_id = %self.chat_id,
                    message_id = message_id.0,
                    outcome = ?outcome,
                    "Scheduled deletion skipped message"
                );
            }
        }

        debug!(
            chat_id = %self.chat_id,
            deleted = report.deleted,
            skipped = report.skipped,
            "Scheduled deletion pass finished"
        );
        report
    }
}

/// Fire-and-forget deletion timers
///
/// There is no cancellation: once scheduled, a deletion always attempts to
/// run, even if the messages were removed by other means in the meantime.
#[derive(Clone)]
pub struct DeletionScheduler {
    deleter: Arc<dyn MessageDeleter>,
}

impl DeletionScheduler {
    pub fn new(deleter: Arc<dyn MessageDeleter>) -> Self {
        Self { deleter }
    }

    /// Delete `message_ids` in `chat_id` once `delay` has elapsed
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, chat_id: ChatId, message_ids: Vec<MessageId>, delay: Duration) {
        if message_ids.is_empty() {
            return;
        }

        info!(
            chat_id = %chat_id,
            messages = message_ids.len(),
            delay_secs = delay.as_secs(),
            "Scheduling message deletion"
        );

        let deletion = ScheduledDeletion {
            chat_id,
            message_ids,
            delay,
        };
        let deleter = Arc::clone(&self.deleter);
        tokio::spawn(async move {
            deletion.run(deleter.as_ref()).await;
        });
    }
}
