//! End-to-end command handling against a mock joke endpoint.
//!
//! Run with: cargo test --test bot_flow

use std::sync::{Arc, Mutex};

use anekdot::handlers::HandlerError;
use anekdot::joke::FetchError;
use anekdot::telegram::DeliveryError;
use anekdot::{AutosendControl, ChatGateway, Incoming, JokeBot, JokeFetcher, texts};
use async_trait::async_trait;
use reqwest::Url;

#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingGateway {
    fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, _buttons: &[&str]) -> Result<(), DeliveryError> {
        self.send_text(chat_id, text).await
    }
}

fn message(text: &str) -> Incoming {
    Incoming {
        chat_id: 1001,
        first_name: "Петя".to_string(),
        text: Some(text.to_string()),
    }
}

#[tokio::test]
async fn joke_from_endpoint_reaches_chat() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/joke")
        .with_status(200)
        .with_body("{\"content\":\"Заходит как-то улитка в бар...\"}")
        .create_async()
        .await;

    let gateway = Arc::new(RecordingGateway::default());
    let fetcher = Arc::new(JokeFetcher::new(Url::parse(&format!("{}/joke", server.url())).unwrap()));
    let bot = JokeBot::new(Arc::new(AutosendControl::default()), fetcher, gateway.clone());

    bot.handle(&message("/anekdot")).await.unwrap();

    assert_eq!(gateway.texts(), vec!["Заходит как-то улитка в бар..."]);
}

#[tokio::test]
async fn endpoint_failure_is_a_fetch_error_and_bot_keeps_working() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/joke")
        .with_status(500)
        .create_async()
        .await;

    let gateway = Arc::new(RecordingGateway::default());
    let fetcher = Arc::new(JokeFetcher::new(Url::parse(&format!("{}/joke", server.url())).unwrap()));
    let bot = JokeBot::new(Arc::new(AutosendControl::default()), fetcher, gateway.clone());

    let err = bot.handle(&message(texts::JOKE_BUTTON)).await.unwrap_err();
    assert_eq!(err, HandlerError::Fetch(FetchError::Status(500)));

    bot.handle(&message("/docs")).await.unwrap();
    bot.handle(&message("/period")).await.unwrap();
    bot.handle(&message("0.5")).await.unwrap();

    assert_eq!(bot.control().period_secs(), 30.0);
    assert_eq!(gateway.texts().first().map(String::as_str), Some(texts::DOCUMENTATION));
}
