//! Chat delivery: the gateway trait and its teloxide implementation.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use tracing::warn;

/// Failure to deliver a message to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    pub chat_id: i64,
    pub reason: String,
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to send to chat {}: {}", self.chat_id, self.reason)
    }
}

impl std::error::Error for DeliveryError {}

/// Outbound side of the messenger.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;

    /// Send text with a reply keyboard, one button per row.
    async fn send_menu(&self, chat_id: i64, text: &str, buttons: &[&str]) -> Result<(), DeliveryError>;
}

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn menu_keyboard(buttons: &[&str]) -> KeyboardMarkup {
    let rows = buttons
        .iter()
        .map(|label| vec![KeyboardButton::new(*label)])
        .collect::<Vec<_>>();
    KeyboardMarkup::new(rows).resize_keyboard()
}

#[async_trait]
impl ChatGateway for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!("Failed to send to {}: {e}", chat_id);
                DeliveryError { chat_id, reason: e.to_string() }
            })
    }

    async fn send_menu(&self, chat_id: i64, text: &str, buttons: &[&str]) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(menu_keyboard(buttons))
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!("Failed to send menu to {}: {e}", chat_id);
                DeliveryError { chat_id, reason: e.to_string() }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texts::MENU_BUTTONS;

    #[test]
    fn test_menu_keyboard_one_button_per_row() {
        let keyboard = menu_keyboard(&MENU_BUTTONS);
        assert_eq!(keyboard.keyboard.len(), 4);
        assert!(keyboard.keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(keyboard.keyboard[0][0].text, MENU_BUTTONS[0]);
        assert!(keyboard.resize_keyboard);
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError { chat_id: 42, reason: "Forbidden: bot was blocked".into() };
        assert_eq!(err.to_string(), "failed to send to chat 42: Forbidden: bot was blocked");
    }
}
