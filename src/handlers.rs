//! Command routing.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::autosend::{Autosend, AutosendControl};
use crate::joke::{FetchError, JokeSource};
use crate::period::{self, ConversationState, Conversations, PeriodStep, SECONDS_PER_MINUTE};
use crate::telegram::{ChatGateway, DeliveryError};
use crate::texts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Anekdot,
    Nonstop,
    Stop,
    Docs,
    Period,
}

impl Command {
    /// Match a slash command or one of the keyboard labels.
    ///
    /// Commands are case-sensitive; a `@botname` suffix and anything after
    /// the first word are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            texts::JOKE_BUTTON => return Some(Command::Anekdot),
            texts::START_NONSTOP_BUTTON => return Some(Command::Nonstop),
            texts::STOP_NONSTOP_BUTTON => return Some(Command::Stop),
            texts::DOCUMENTATION_BUTTON => return Some(Command::Docs),
            _ => {}
        }

        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Command::Start),
            "anekdot" => Some(Command::Anekdot),
            "nonstop" => Some(Command::Nonstop),
            "stop" => Some(Command::Stop),
            "docs" => Some(Command::Docs),
            "period" => Some(Command::Period),
            _ => None,
        }
    }
}

/// An inbound chat message, stripped down to what the handlers need.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: i64,
    pub first_name: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandlerError {
    Fetch(FetchError),
    Delivery(DeliveryError),
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::Fetch(e) => write!(f, "{e}"),
            HandlerError::Delivery(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<FetchError> for HandlerError {
    fn from(e: FetchError) -> Self {
        HandlerError::Fetch(e)
    }
}

impl From<DeliveryError> for HandlerError {
    fn from(e: DeliveryError) -> Self {
        HandlerError::Delivery(e)
    }
}

pub struct JokeBot {
    jokes: Arc<dyn JokeSource>,
    gateway: Arc<dyn ChatGateway>,
    autosend: Autosend,
    conversations: Conversations,
}

impl JokeBot {
    pub fn new(control: Arc<AutosendControl>, jokes: Arc<dyn JokeSource>, gateway: Arc<dyn ChatGateway>) -> Self {
        let autosend = Autosend::new(control, jokes.clone(), gateway.clone());
        Self {
            jokes,
            gateway,
            autosend,
            conversations: Conversations::default(),
        }
    }

    pub fn control(&self) -> &Arc<AutosendControl> {
        self.autosend.control()
    }

    /// Handle one inbound message.
    ///
    /// A chat waiting for a period consumes the message whatever it says.
    /// Errors are returned after being logged; the caller keeps dispatching.
    pub async fn handle(&self, msg: &Incoming) -> Result<(), HandlerError> {
        if self.conversations.state(msg.chat_id).await == ConversationState::AwaitingPeriod {
            return self.period_reply(msg).await;
        }

        let Some(command) = msg.text.as_deref().and_then(Command::parse) else {
            return Ok(());
        };
        debug!("Chat {}: {:?}", msg.chat_id, command);

        match command {
            Command::Start => self.start(msg).await,
            Command::Anekdot => self.send_joke(msg.chat_id).await,
            Command::Nonstop => self.nonstop(msg.chat_id).await,
            Command::Stop => self.stop(msg.chat_id).await,
            Command::Docs => Ok(self.gateway.send_text(msg.chat_id, texts::DOCUMENTATION).await?),
            Command::Period => self.ask_for_period(msg.chat_id).await,
        }
    }

    async fn start(&self, msg: &Incoming) -> Result<(), HandlerError> {
        let greeting = texts::greeting(&msg.first_name);
        self.gateway
            .send_menu(msg.chat_id, &greeting, &texts::MENU_BUTTONS)
            .await?;
        Ok(())
    }

    async fn send_joke(&self, chat_id: i64) -> Result<(), HandlerError> {
        let joke = self.jokes.fetch_joke().await.inspect_err(|e| {
            error!("Failed to fetch joke for chat {}: {e}", chat_id);
        })?;
        self.gateway.send_text(chat_id, &joke).await.inspect_err(|e| {
            error!("Failed to send joke {joke:?}: {e}");
        })?;
        Ok(())
    }

    async fn nonstop(&self, chat_id: i64) -> Result<(), HandlerError> {
        let confirmed = self.gateway.send_text(chat_id, texts::NONSTOP_TEXT).await;
        self.autosend.start(chat_id);
        confirmed?;
        Ok(())
    }

    async fn stop(&self, chat_id: i64) -> Result<(), HandlerError> {
        self.autosend.stop();
        self.gateway
            .send_text(chat_id, texts::STOP_TEXT)
            .await
            .inspect_err(|e| error!("Failed to confirm autosend stop: {e}"))?;
        debug!("{}", texts::STOP_TEXT);
        Ok(())
    }

    async fn ask_for_period(&self, chat_id: i64) -> Result<(), HandlerError> {
        let minutes = self.control().period_secs() / SECONDS_PER_MINUTE;
        self.gateway
            .send_text(chat_id, &texts::ask_for_period(minutes))
            .await?;
        self.conversations
            .set(chat_id, ConversationState::AwaitingPeriod)
            .await;
        Ok(())
    }

    async fn period_reply(&self, msg: &Incoming) -> Result<(), HandlerError> {
        let step = period::apply_period_reply(self.control(), msg.text.as_deref());
        self.conversations.set(msg.chat_id, step.next_state()).await;

        let reply = match &step {
            PeriodStep::Set { minutes } => texts::period_set(*minutes),
            PeriodStep::Reset => texts::SUCCESS.to_string(),
            PeriodStep::Retry(e) => {
                info!("Rejected period input in chat {}: {e}", msg.chat_id);
                texts::period_error(e)
            }
        };
        self.gateway.send_text(msg.chat_id, &reply).await?;
        Ok(())
    }
}
