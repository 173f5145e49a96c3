//! In-memory gateway and joke source for unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::joke::{FetchError, JokeSource};
use crate::telegram::{ChatGateway, DeliveryError};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub buttons: Option<Vec<String>>,
}

#[derive(Default)]
pub struct FakeGateway {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<i64>>,
    notify: Notify,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to `chat_id` fails from now on.
    pub fn fail_chat(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent().last().map(|m| m.text.clone())
    }

    /// Wait until at least `count` messages have been delivered overall.
    pub async fn wait_for_messages(&self, count: usize) {
        self.wait_until(|sent| sent.len() >= count).await;
    }

    /// Wait until at least `count` messages have been delivered to `chat_id`.
    pub async fn wait_for_chat(&self, chat_id: i64, count: usize) {
        self.wait_until(|sent| sent.iter().filter(|m| m.chat_id == chat_id).count() >= count)
            .await;
    }

    async fn wait_until(&self, done: impl Fn(&[SentMessage]) -> bool) {
        loop {
            let notified = self.notify.notified();
            if done(&self.sent.lock().unwrap()) {
                return;
            }
            notified.await;
        }
    }

    fn record(&self, chat_id: i64, text: &str, buttons: Option<&[&str]>) -> Result<(), DeliveryError> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(DeliveryError { chat_id, reason: "Forbidden: bot was blocked by the user".into() });
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            buttons: buttons.map(|b| b.iter().map(|s| s.to_string()).collect()),
        });
        self.notify.notify_waiters();
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.record(chat_id, text, None)
    }

    async fn send_menu(&self, chat_id: i64, text: &str, buttons: &[&str]) -> Result<(), DeliveryError> {
        self.record(chat_id, text, Some(buttons))
    }
}

/// Returns "joke 1", "joke 2", ... unless a failure is queued.
#[derive(Default)]
pub struct FakeJokes {
    calls: AtomicUsize,
    failures: Mutex<VecDeque<FetchError>>,
}

impl FakeJokes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: FetchError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JokeSource for FakeJokes {
    async fn fetch_joke(&self) -> Result<String, FetchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(format!("joke {n}"))
    }
}
