//! teloxide implementation of the transport traits

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, FileId, MessageId};
use tracing::debug;

use super::ui_builder::create_copy_keyboard;
use crate::transport::{ChatTransport, DeleteOutcome, MessageDeleter};

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    http: reqwest::Client,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessageDeleter for TelegramTransport {
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> DeleteOutcome {
        match self.bot.delete_message(chat_id, message_id).await {
            Ok(_) => DeleteOutcome::Deleted,
            Err(e) => DeleteOutcome::Skipped(e.to_string()),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    type ImageRef = FileId;
    type CallbackRef = CallbackQuery;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId> {
        let message = self.bot.send_message(chat_id, text).await?;
        Ok(message.id)
    }

    async fn send_with_copy_control(
        &self,
        chat_id: ChatId,
        text: &str,
        button_label: &str,
    ) -> Result<MessageId> {
        let message = self
            .bot
            .send_message(chat_id, text)
            .reply_markup(create_copy_keyboard(button_label))
            .await?;
        Ok(message.id)
    }

    async fn acknowledge(&self, callback: &CallbackQuery) -> Result<()> {
        self.bot.answer_callback_query(callback.id.clone()).await?;
        Ok(())
    }

    async fn show_alert(&self, callback: &CallbackQuery, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(callback.id.clone())
            .text(text)
            .show_alert(true)
            .await?;
        Ok(())
    }

    async fn download_image(&self, image: &FileId) -> Result<Vec<u8>> {
        let file = self.bot.get_file(image.clone()).await?;
        let url = format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot.token(),
            file.path
        );

        // The file URL embeds the bot token, keep it out of error messages
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| anyhow!("failed to download photo from Telegram: {}", e.without_url()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow!("failed to read photo body: {}", e.without_url()))?;

        debug!(file_size = bytes.len(), "Photo downloaded");
        Ok(bytes.to_vec())
    }
}
