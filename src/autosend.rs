//! Periodic joke delivery.
//!
//! Every activation spawns its own task bound to one chat, but all tasks
//! share a single [`AutosendControl`]: one period and one stop signal for
//! the whole process. Stopping from any chat stops every running loop, and
//! re-enabling clears the signal for all of them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::joke::{FetchError, JokeSource};
use crate::telegram::{ChatGateway, DeliveryError};

/// Seconds between deliveries until someone changes it.
pub const DEFAULT_PERIOD_SECS: f64 = 5.0;

/// Process-wide autosend settings: the period and the stop signal.
///
/// Each field is an independent atomic. Concurrent writers race with
/// last-writer-wins semantics and there is no atomicity across the two.
pub struct AutosendControl {
    /// `f64` seconds stored as raw bits.
    period_bits: AtomicU64,
    stopped: AtomicBool,
}

impl Default for AutosendControl {
    fn default() -> Self {
        Self {
            period_bits: AtomicU64::new(DEFAULT_PERIOD_SECS.to_bits()),
            stopped: AtomicBool::new(false),
        }
    }
}

impl AutosendControl {
    pub fn period_secs(&self) -> f64 {
        f64::from_bits(self.period_bits.load(Ordering::SeqCst))
    }

    pub fn set_period_secs(&self, secs: f64) {
        self.period_bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    pub fn reset_period(&self) {
        self.set_period_secs(DEFAULT_PERIOD_SECS);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Raise the stop signal for every running loop.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn clear_stop(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// Why a single iteration failed.
#[derive(Debug, Clone, PartialEq)]
pub enum AutosendError {
    Fetch(FetchError),
    Delivery(DeliveryError),
    /// The period cannot be slept: negative, NaN or infinite.
    InvalidPeriod(f64),
}

impl std::fmt::Display for AutosendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutosendError::Fetch(e) => write!(f, "{e}"),
            AutosendError::Delivery(e) => write!(f, "{e}"),
            AutosendError::InvalidPeriod(secs) => write!(f, "invalid period: {secs} seconds"),
        }
    }
}

impl std::error::Error for AutosendError {}

/// How a loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopExit {
    /// The stop signal was observed between iterations.
    Stopped { delivered: usize },
    /// An iteration failed; the loop does not retry.
    Failed { delivered: usize, error: AutosendError },
}

/// Fetch one joke and deliver it to `chat_id`.
pub async fn send_joke(
    jokes: &dyn JokeSource,
    gateway: &dyn ChatGateway,
    chat_id: i64,
) -> Result<(), AutosendError> {
    let joke = jokes.fetch_joke().await.map_err(AutosendError::Fetch)?;
    gateway
        .send_text(chat_id, &joke)
        .await
        .map_err(AutosendError::Delivery)
}

/// The period as a sleepable duration.
fn period_duration(secs: f64) -> Result<Duration, AutosendError> {
    Duration::try_from_secs_f64(secs).map_err(|_| AutosendError::InvalidPeriod(secs))
}

/// Starts autosend loops.
#[derive(Clone)]
pub struct Autosend {
    control: Arc<AutosendControl>,
    jokes: Arc<dyn JokeSource>,
    gateway: Arc<dyn ChatGateway>,
}

impl Autosend {
    pub fn new(control: Arc<AutosendControl>, jokes: Arc<dyn JokeSource>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self { control, jokes, gateway }
    }

    pub fn control(&self) -> &Arc<AutosendControl> {
        &self.control
    }

    /// Clear the stop signal and spawn a loop delivering to `chat_id`.
    pub fn start(&self, chat_id: i64) -> JoinHandle<LoopExit> {
        self.control.clear_stop();
        let this = self.clone();
        info!("Autosend started for chat {}", chat_id);
        tokio::spawn(async move { this.run(chat_id).await })
    }

    /// Raise the shared stop signal.
    pub fn stop(&self) {
        self.control.stop();
    }

    async fn run(self, chat_id: i64) -> LoopExit {
        let mut delivered = 0;
        while !self.control.is_stopped() {
            if let Err(error) = self.iteration(chat_id, &mut delivered).await {
                error!("Autosend for chat {} terminated: {error}", chat_id);
                return LoopExit::Failed { delivered, error };
            }
        }
        debug!("Autosend for chat {} stopped after {} jokes", chat_id, delivered);
        LoopExit::Stopped { delivered }
    }

    async fn iteration(&self, chat_id: i64, delivered: &mut usize) -> Result<(), AutosendError> {
        send_joke(self.jokes.as_ref(), self.gateway.as_ref(), chat_id).await?;
        *delivered += 1;
        let period = period_duration(self.control.period_secs())?;
        tokio::time::sleep(period).await;
        Ok(())
    }
}
