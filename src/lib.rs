//! # Polish Number Scanner Bot
//!
//! A Telegram bot that reads Polish phone numbers from screenshots (via OCR)
//! or typed text, replies with a deduplicated `+48` list and a "copy all"
//! button, and deletes its own and the user's messages after a delay.

pub mod bot;
pub mod circuit_breaker;
pub mod config;
pub mod dispatcher;
pub mod instance_manager;
pub mod localization;
pub mod number_patterns;
pub mod ocr;
pub mod ocr_config;
pub mod ocr_errors;
pub mod preprocessing;
pub mod scheduler;
pub mod text_processing;
pub mod transport;
