//! Messaging transport seam.
//!
//! The dispatcher and scheduler only talk to the chat platform through these
//! traits. `bot::TelegramTransport` implements them over teloxide; tests use
//! in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};

/// Result of a best-effort deletion
///
/// A message that is already gone, or that the bot may not delete, is an
/// expected outcome and not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Skipped(String),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

#[async_trait]
pub trait MessageDeleter: Send + Sync {
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> DeleteOutcome;
}

#[async_trait]
pub trait ChatTransport: MessageDeleter {
    /// Handle used to fetch the bytes of an incoming image
    type ImageRef: Send + Sync;
    /// Handle used to answer a callback query
    type CallbackRef: Send + Sync;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId>;

    /// Send `text` with a single inline "copy all" button labeled `button_label`
    async fn send_with_copy_control(
        &self,
        chat_id: ChatId,
        text: &str,
        button_label: &str,
    ) -> Result<MessageId>;

    /// Answer a callback query without showing anything
    async fn acknowledge(&self, callback: &Self::CallbackRef) -> Result<()>;

    /// Answer a callback query with a modal alert
    async fn show_alert(&self, callback: &Self::CallbackRef, text: &str) -> Result<()>;

    async fn download_image(&self, image: &Self::ImageRef) -> Result<Vec<u8>>;
}
