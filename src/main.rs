use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use anekdot::config::{self, Config};
use anekdot::{AutosendControl, Incoming, JokeBot, JokeFetcher, TelegramClient};

fn init_logging(log_file: &Path) -> std::io::Result<WorkerGuard> {
    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::DEBUG.into()),
                ),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let log_file = config::log_file(|name| std::env::var(name).ok());
    let _guard = match init_logging(&log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", log_file.display());
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("🚀 Starting anekdot bot...");
    info!("Jokes from {}", config.endpoint);
    info!("Logging to {}", config.log_file.display());

    let bot = Bot::new(&config.telegram_token);
    let jokes = Arc::new(JokeFetcher::new(config.endpoint.clone()));
    let gateway = Arc::new(TelegramClient::new(bot.clone()));
    let state = Arc::new(JokeBot::new(Arc::new(AutosendControl::default()), jokes, gateway));

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    ExitCode::SUCCESS
}

async fn handle_message(msg: Message, state: Arc<JokeBot>) -> ResponseResult<()> {
    let incoming = telegram_to_incoming(&msg);
    if let Err(e) = state.handle(&incoming).await {
        warn!("Handler failed in chat {}: {e}", incoming.chat_id);
    }
    Ok(())
}

fn telegram_to_incoming(msg: &Message) -> Incoming {
    let first_name = msg
        .chat
        .first_name()
        .or_else(|| msg.from.as_ref().map(|u| u.first_name.as_str()))
        .unwrap_or("unknown")
        .to_string();

    Incoming {
        chat_id: msg.chat.id.0,
        first_name,
        text: msg.text().map(str::to_string),
    }
}
