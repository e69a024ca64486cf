//! UI Builder module for creating keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback data carried by the "copy all" button
pub const COPY_ALL_CALLBACK: &str = "copy_all";

/// Single-button keyboard attached to every number list
pub fn create_copy_keyboard(button_label: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        button_label.to_string(),
        COPY_ALL_CALLBACK.to_string(),
    )]])
}
