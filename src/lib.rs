//! Telegram bot relaying jokes from an HTTP endpoint, with periodic autosend.

pub mod autosend;
pub mod config;
pub mod handlers;
pub mod joke;
pub mod period;
pub mod telegram;
pub mod texts;

#[cfg(test)]
mod testing;

pub use autosend::{Autosend, AutosendControl, LoopExit};
pub use config::Config;
pub use handlers::{Incoming, JokeBot};
pub use joke::{JokeFetcher, JokeSource};
pub use telegram::{ChatGateway, TelegramClient};
