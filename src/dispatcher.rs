//! # Inbound Dispatcher
//!
//! Decides what the bot does with each incoming unit of work. Platform
//! access goes through [`ChatTransport`] and OCR through [`TextRecognizer`],
//! so the same decisions run against Telegram in production and against
//! in-memory fakes in tests.

use anyhow::Result;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};
use tracing::{debug, error, info, warn};

use crate::localization::LocalizationManager;
use crate::ocr::TextRecognizer;
use crate::scheduler::{DeletionDelays, DeletionScheduler};
use crate::text_processing::{parse_displayed_numbers, PhoneNumberExtractor};
use crate::transport::ChatTransport;

/// One incoming unit of work
pub enum Inbound<T: ChatTransport> {
    /// `/start`
    Greeting {
        chat_id: ChatId,
        message_id: MessageId,
        language: Option<String>,
    },
    /// A photo to scan
    ImageReceived {
        chat_id: ChatId,
        message_id: MessageId,
        image: T::ImageRef,
        language: Option<String>,
    },
    /// Free text, not a command
    TextReceived {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        language: Option<String>,
    },
    /// The "copy all" button was pressed
    CopyActionRequested {
        callback: T::CallbackRef,
        chat_id: Option<ChatId>,
        /// Text of the message the button is attached to, if still accessible
        body: Option<String>,
        language: Option<String>,
    },
    /// `/health`
    HealthCheckRequested {
        chat_id: ChatId,
        language: Option<String>,
    },
}

pub struct InboundDispatcher<T: ChatTransport, R: TextRecognizer> {
    transport: Arc<T>,
    recognizer: Arc<R>,
    localization: Arc<LocalizationManager>,
    extractor: PhoneNumberExtractor,
    scheduler: DeletionScheduler,
    delays: DeletionDelays,
}

impl<T, R> InboundDispatcher<T, R>
where
    T: ChatTransport + 'static,
    R: TextRecognizer,
{
    pub fn new(
        transport: Arc<T>,
        recognizer: Arc<R>,
        localization: Arc<LocalizationManager>,
        delays: DeletionDelays,
    ) -> Self {
        let scheduler = DeletionScheduler::new(transport.clone());
        Self {
            transport,
            recognizer,
            localization,
            extractor: PhoneNumberExtractor::new(),
            scheduler,
            delays,
        }
    }

    pub async fn handle(&self, inbound: Inbound<T>) -> Result<()> {
        match inbound {
            Inbound::Greeting {
                chat_id,
                message_id,
                language,
            } => self.greet(chat_id, message_id, language.as_deref()).await,
            Inbound::ImageReceived {
                chat_id,
                message_id,
                image,
                language,
            } => {
                self.handle_image(chat_id, message_id, &image, language.as_deref())
                    .await;
                Ok(())
            }
            Inbound::TextReceived {
                chat_id,
                message_id,
                text,
                language,
            } => {
                self.handle_text(chat_id, message_id, &text, language.as_deref())
                    .await
            }
            Inbound::CopyActionRequested {
                callback,
                chat_id,
                body,
                language,
            } => {
                self.handle_copy_action(&callback, chat_id, body.as_deref(), language.as_deref())
                    .await
            }
            Inbound::HealthCheckRequested { chat_id, language } => {
                let text = self.localization.text("health-ok", language.as_deref());
                self.transport.send_text(chat_id, &text).await?;
                Ok(())
            }
        }
    }

    async fn greet(&self, chat_id: ChatId, request_id: MessageId, language: Option<&str>) -> Result<()> {
        let text = format!(
            "{}\n\n{}",
            self.localization.text("start-instructions", language),
            self.localization.text("start-copy-hint", language)
        );
        let reply_id = self.transport.send_text(chat_id, &text).await?;
        self.scheduler
            .schedule(chat_id, vec![reply_id, request_id], self.delays.reply);
        Ok(())
    }

    /// Image path; never fails, every error ends in the failure notice
    async fn handle_image(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        image: &T::ImageRef,
        language: Option<&str>,
    ) {
        if let Err(e) = self.process_image(chat_id, message_id, image, language).await {
            error!(chat_id = %chat_id, error = %e, "Image processing failed");
            if let Err(notice_error) = self.send_failure_notice(chat_id, language).await {
                debug!(chat_id = %chat_id, error = %notice_error, "Could not send failure notice");
            }
        }
    }

    async fn process_image(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        image: &T::ImageRef,
        language: Option<&str>,
    ) -> Result<()> {
        self.delete_now(chat_id, message_id).await;

        let bytes = self.transport.download_image(image).await?;
        debug!(chat_id = %chat_id, image_bytes = bytes.len(), "Image downloaded");

        let text = match self.recognizer.recognize(bytes).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(chat_id = %chat_id, "OCR returned no text");
                return self.send_failure_notice(chat_id, language).await;
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "OCR failed");
                return self.send_failure_notice(chat_id, language).await;
            }
        };

        let numbers = self.extractor.extract(&text);
        if numbers.is_empty() {
            info!(chat_id = %chat_id, "No phone numbers found in image");
            return self.send_failure_notice(chat_id, language).await;
        }

        self.send_number_list(chat_id, &numbers, language).await
    }

    async fn handle_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        language: Option<&str>,
    ) -> Result<()> {
        let numbers = self.extractor.extract(text);
        self.delete_now(chat_id, message_id).await;

        if numbers.is_empty() {
            debug!(chat_id = %chat_id, "No phone numbers in text message");
            return Ok(());
        }
        self.send_number_list(chat_id, &numbers, language).await
    }

    async fn handle_copy_action(
        &self,
        callback: &T::CallbackRef,
        chat_id: Option<ChatId>,
        body: Option<&str>,
        language: Option<&str>,
    ) -> Result<()> {
        let numbers = body.map(parse_displayed_numbers).unwrap_or_default();

        let chat_id = match chat_id {
            Some(chat_id) if !numbers.is_empty() => chat_id,
            _ => {
                debug!("Copy action on a message without numbers");
                let alert = self.localization.text("copy-failed", language);
                return self.transport.show_alert(callback, &alert).await;
            }
        };

        self.transport.acknowledge(callback).await?;

        let text = format!(
            "{}\n\n{}",
            self.localization.text_with_args(
                "copy-confirmed",
                language,
                &[("count", numbers.len().to_string())]
            ),
            self.localization.text("copy-paste-hint", language)
        );
        let confirmation_id = self.transport.send_text(chat_id, &text).await?;
        info!(chat_id = %chat_id, numbers = numbers.len(), "Copy action confirmed");

        self.scheduler
            .schedule(chat_id, vec![confirmation_id], self.delays.reply);
        Ok(())
    }

    async fn send_number_list(
        &self,
        chat_id: ChatId,
        numbers: &[String],
        language: Option<&str>,
    ) -> Result<()> {
        let text = format_number_list(numbers);
        let label = self.localization.text("copy-all-button", language);
        let reply_id = self
            .transport
            .send_with_copy_control(chat_id, &text, &label)
            .await?;

        info!(chat_id = %chat_id, numbers_found = numbers.len(), "Sent phone number list");
        self.scheduler
            .schedule(chat_id, vec![reply_id], self.delays.reply);
        Ok(())
    }

    async fn send_failure_notice(&self, chat_id: ChatId, language: Option<&str>) -> Result<()> {
        let text = self.localization.text("failure-notice", language);
        let notice_id = self.transport.send_text(chat_id, &text).await?;
        self.scheduler
            .schedule(chat_id, vec![notice_id], self.delays.notice);
        Ok(())
    }

    /// Best-effort immediate deletion of a user's message
    async fn delete_now(&self, chat_id: ChatId, message_id: MessageId) {
        let outcome = self.transport.delete_message(chat_id, message_id).await;
        if !outcome.is_deleted() {
            debug!(
                chat_id = %chat_id,
                message_id = message_id.0,
                outcome = ?outcome,
                "Could not delete incoming message"
            );
        }
    }
}

/// One number per line, as shown to the user and re-read by the copy action
pub fn format_number_list(numbers: &[String]) -> String {
    numbers.join("\n")
}
