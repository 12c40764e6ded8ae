//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use slotbot_api::{AppState, build_app};
use slotbot_core::config::AppConfig;
use slotbot_core::result::AppResult;
use slotbot_core::traits::{ManualClock, OutboundChannel};
use slotbot_database::{MemoryDatabase, Stores};
use slotbot_entity::chat::{Badges, ChatEvent};
use slotbot_realtime::BroadcastHub;
use slotbot_service::Services;
use slotbot_worker::ReplyStats;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Services behind the router
    pub services: Services,
    /// In-memory backing store
    pub db: MemoryDatabase,
    /// Controllable clock
    pub clock: Arc<ManualClock>,
}

/// Fixed starting instant for every test.
pub fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T20:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Configuration with in-memory stores and no feed.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = "memory".to_string();
    config.chat.feed_enabled = false;
    config
}

impl TestApp {
    /// Create a new test application with default settings
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test application from `config`
    pub async fn with_config(config: AppConfig) -> Self {
        let db = MemoryDatabase::new();
        let clock = Arc::new(ManualClock::new(start_time()));
        let services = Services::build(
            &config,
            Stores::memory(db.clone()),
            BroadcastHub::new(32),
            clock.clone(),
            None,
        )
        .await
        .expect("Failed to build services");

        let state = AppState::new(
            Arc::new(config),
            services.clone(),
            Arc::new(ReplyStats::default()),
        );

        Self {
            router: build_app(state),
            services,
            db,
            clock,
        }
    }

    /// Run a chat message through the admission engine
    pub async fn chat(&self, user: &str, content: &str) -> Option<String> {
        self.services
            .engine
            .handle(&chat_event(user, content, Badges::default()))
            .await
            .expect("Command failed")
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Build a chat event
pub fn chat_event(user: &str, content: &str, badges: Badges) -> ChatEvent {
    ChatEvent {
        user: user.to_string(),
        content: content.to_string(),
        badges,
        timestamp: Utc::now(),
    }
}

/// Outbound channel that records every send and tracks overlap.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl RecordingChannel {
    /// A channel whose sends take `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Texts sent so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Highest number of concurrent sends observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wait until `n` replies were sent or two seconds pass.
    pub async fn wait_for(&self, n: usize) -> Vec<String> {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl OutboundChannel for RecordingChannel {
    async fn send(&self, text: &str) -> AppResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sent.lock().unwrap().push(text.to_string());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
