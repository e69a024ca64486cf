//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::{BotDispatcher, Command};
use crate::dispatcher::Inbound;

fn language_code(msg: &Message) -> Option<String> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.clone())
}

pub async fn command_handler(
    msg: Message,
    cmd: Command,
    dispatcher: Arc<BotDispatcher>,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command");

    let inbound = match cmd {
        Command::Start => Inbound::Greeting {
            chat_id: msg.chat.id,
            message_id: msg.id,
            language: language_code(&msg),
        },
        Command::Health => Inbound::HealthCheckRequested {
            chat_id: msg.chat.id,
            language: language_code(&msg),
        },
    };
    dispatcher.handle(inbound).await
}

pub async fn photo_handler(msg: Message, dispatcher: Arc<BotDispatcher>) -> Result<()> {
    // Telegram lists the sizes smallest first
    let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) else {
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, "Received photo message from user");

    dispatcher
        .handle(Inbound::ImageReceived {
            chat_id: msg.chat.id,
            message_id: msg.id,
            image: largest_photo.file.id.clone(),
            language: language_code(&msg),
        })
        .await
}

pub async fn text_handler(msg: Message, dispatcher: Arc<BotDispatcher>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    dispatcher
        .handle(Inbound::TextReceived {
            chat_id: msg.chat.id,
            message_id: msg.id,
            text: text.to_string(),
            language: language_code(&msg),
        })
        .await
}
