use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use number_scanner::bot::{self, BotDispatcher, Command, TelegramTransport};
use number_scanner::config::{Config, LogFormat};
use number_scanner::localization::LocalizationManager;
use number_scanner::ocr::TesseractRecognizer;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Polish Number Scanner Bot");
    info!(
        default_language = %config.default_language,
        ocr_languages = %config.ocr.languages,
        "Configuration loaded"
    );

    let bot = Bot::new(&config.bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let localization = Arc::new(LocalizationManager::new(&config.default_language)?);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let recognizer = Arc::new(TesseractRecognizer::new(config.ocr.clone()));
    let dispatcher: Arc<BotDispatcher> = Arc::new(BotDispatcher::new(
        transport,
        recognizer,
        localization,
        config.delays,
    ));

    info!("Bot initialized, starting dispatcher");

    let listener = Polling::builder(bot.clone())
        .drop_pending_updates()
        .build();

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|update| async move {
            tracing::trace!(update_id = ?update.id, "Ignoring unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling update"))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Error from the update listener"),
        )
        .await;

    Ok(())
}
