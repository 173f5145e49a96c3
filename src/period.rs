//! Two-step period configuration.
//!
//! `/period` puts the chat into [`ConversationState::AwaitingPeriod`]; the next
//! message from that chat is consumed as the new period in minutes. Invalid
//! input keeps the chat waiting, `/exit` restores the default.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::Mutex;
use tracing::info;

use crate::autosend::AutosendControl;

/// Leaves the prompt and restores the default period.
pub const EXIT_TOKEN: &str = "/exit";
pub const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingPeriod,
}

/// The reply did not hold a number of minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputParseError {
    pub input: Option<String>,
}

impl fmt::Display for InputParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.input {
            Some(text) => write!(f, "could not convert string to float: {text:?}"),
            None => write!(f, "message has no text"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeriodInput {
    Exit,
    Minutes(f64),
}

/// Interpret a reply to the period prompt. No range checks: zero, negative
/// and non-finite values are all accepted.
pub fn parse_period_input(text: Option<&str>) -> Result<PeriodInput, InputParseError> {
    let Some(text) = text else {
        return Err(InputParseError { input: None });
    };
    if text == EXIT_TOKEN {
        return Ok(PeriodInput::Exit);
    }
    text.trim()
        .parse::<f64>()
        .map(PeriodInput::Minutes)
        .map_err(|_| InputParseError { input: Some(text.to_string()) })
}

/// Result of feeding one reply to an awaiting conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodStep {
    /// Period set to `minutes * 60` seconds.
    Set { minutes: f64 },
    /// Period restored to the default.
    Reset,
    /// Input rejected; keep waiting.
    Retry(InputParseError),
}

impl PeriodStep {
    pub fn next_state(&self) -> ConversationState {
        match self {
            PeriodStep::Set { .. } | PeriodStep::Reset => ConversationState::Idle,
            PeriodStep::Retry(_) => ConversationState::AwaitingPeriod,
        }
    }
}

/// Apply a reply to the shared period.
pub fn apply_period_reply(control: &AutosendControl, text: Option<&str>) -> PeriodStep {
    match parse_period_input(text) {
        Ok(PeriodInput::Exit) => {
            control.reset_period();
            info!("Period reset to default ({} s)", control.period_secs());
            PeriodStep::Reset
        }
        Ok(PeriodInput::Minutes(minutes)) => {
            control.set_period_secs(minutes * SECONDS_PER_MINUTE);
            info!("Period set to {} min", minutes);
            PeriodStep::Set { minutes }
        }
        Err(e) => PeriodStep::Retry(e),
    }
}

/// Per-chat conversation state.
#[derive(Default)]
pub struct Conversations {
    states: Mutex<HashMap<i64, ConversationState>>,
}

impl Conversations {
    pub async fn state(&self, chat_id: i64) -> ConversationState {
        self.states.lock().await.get(&chat_id).copied().unwrap_or_default()
    }

    pub async fn set(&self, chat_id: i64, state: ConversationState) {
        let mut states = self.states.lock().await;
        match state {
            ConversationState::Idle => {
                states.remove(&chat_id);
            }
            other => {
                states.insert(chat_id, other);
            }
        }
    }
}
