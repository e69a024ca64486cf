//! Callback Handler module for the "copy all" inline button

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::BotDispatcher;
use crate::dispatcher::Inbound;

pub async fn callback_handler(q: CallbackQuery, dispatcher: Arc<BotDispatcher>) -> Result<()> {
    debug!(user_id = %q.from.id, "Received copy callback from user");

    let chat_id = q.message.as_ref().map(|message| message.chat().id);
    let body = q
        .message
        .as_ref()
        .and_then(|message| message.regular_message())
        .and_then(|message| message.text())
        .map(str::to_string);
    let language = q.from.language_code.clone();

    dispatcher
        .handle(Inbound::CopyActionRequested {
            callback: q,
            chat_id,
            body,
            language,
        })
        .await
}
