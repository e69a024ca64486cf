//! Bot module for handling Telegram interactions
//!
//! This module adapts teloxide updates to the inbound dispatcher:
//! - `message_handler`: commands, photos and free text
//! - `callback_handler`: the "copy all" inline button
//! - `ui_builder`: inline keyboards
//! - `telegram_transport`: the transport traits over the Bot API

pub mod callback_handler;
pub mod message_handler;
pub mod telegram_transport;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::dispatcher::InboundDispatcher;
use crate::ocr::TesseractRecognizer;

pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, photo_handler, text_handler};
pub use telegram_transport::TelegramTransport;
pub use ui_builder::{create_copy_keyboard, COPY_ALL_CALLBACK};

/// The dispatcher wired to Telegram and Tesseract
pub type BotDispatcher = InboundDispatcher<TelegramTransport, TesseractRecognizer>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show how to use the bot")]
    Start,
    #[command(description = "check that the bot is running")]
    Health,
}

/// Routing for every update the bot reacts to; anything else is ignored
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(photo_handler))
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(|text| !text.starts_with('/')))
                .endpoint(text_handler),
        );

    let callbacks = Update::filter_callback_query()
        .filter(|q: CallbackQuery| q.data.as_deref() == Some(COPY_ALL_CALLBACK))
        .endpoint(callback_handler);

    dptree::entry().branch(messages).branch(callbacks)
}
