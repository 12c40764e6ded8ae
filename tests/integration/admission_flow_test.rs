//! Chat messages through ingest, admission and the reply runner.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use slotbot_core::config::ReplyConfig;
use slotbot_entity::chat::{Badges, ChatEvent};
use slotbot_entity::slot::{SlotFilter, SlotStatus};
use slotbot_service::{ChatIngest, SlotUpdate};
use slotbot_worker::{ReplyQueue, ReplyRunner};

use crate::helpers::{RecordingChannel, TestApp, chat_event, test_config};

/// A running ingest and reply runner wired to a recording channel.
struct Pipeline {
    events: mpsc::Sender<ChatEvent>,
    channel: Arc<RecordingChannel>,
    cancel: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Pipeline {
    fn start(app: &TestApp, send_delay: Duration) -> Self {
        let channel = Arc::new(RecordingChannel::with_delay(send_delay));
        let (cancel, cancel_rx) = watch::channel(false);
        let (replies, reply_rx) = ReplyQueue::new(64);
        let runner = ReplyRunner::new(channel.clone(), &ReplyConfig::default());
        let (events, events_rx) = mpsc::channel(64);
        let ingest = ChatIngest::new(Arc::clone(&app.services.engine), replies);

        let tasks = vec![
            tokio::spawn(runner.run(reply_rx, cancel_rx.clone())),
            tokio::spawn(ingest.run(events_rx, cancel_rx)),
        ];
        Self {
            events,
            channel,
            cancel,
            tasks,
        }
    }

    async fn say(&self, user: &str, content: &str, badges: Badges) {
        self.events
            .send(chat_event(user, content, badges))
            .await
            .unwrap();
    }

    /// Send one message and wait for the reply it produces.
    async fn ask(&self, user: &str, content: &str, badges: Badges) -> String {
        let before = self.channel.sent().len();
        self.say(user, content, badges).await;
        let sent = self.channel.wait_for(before + 1).await;
        sent.get(before).cloned().unwrap_or_default()
    }

    async fn stop(self) {
        self.cancel.send(true).unwrap();
        for task in self.tasks {
            tokio::time::timeout(Duration::from_secs(2), task)
                .await
                .unwrap()
                .unwrap();
        }
    }
}

fn subscriber() -> Badges {
    Badges {
        subscriber: true,
        ..Badges::default()
    }
}

async fn limited_app() -> TestApp {
    let mut config = test_config();
    config.settings.enabled = true;
    config.settings.follower_limit = 1;
    config.settings.subscriber_limit = 2;
    config.settings.out_cooldown_minutes = 5.0;
    TestApp::with_config(config).await
}

#[tokio::test]
async fn test_replies_follow_arrival_order_one_at_a_time() {
    let app = TestApp::new().await;
    let pipeline = Pipeline::start(&app, Duration::from_millis(20));

    let users = ["ann", "ben", "cat", "dan", "eve"];
    for (i, user) in users.iter().enumerate() {
        pipeline.say(user, &format!("!slot Game {i}"), Badges::default()).await;
        pipeline.say(user, "gl everyone", Badges::default()).await;
    }

    let sent = pipeline.channel.wait_for(users.len()).await;
    let expected: Vec<String> = users
        .iter()
        .enumerate()
        .map(|(i, user)| format!("your slot 'Game {i}' has been added to the list {user}!"))
        .collect();
    assert_eq!(sent, expected);
    assert_eq!(pipeline.channel.max_in_flight(), 1);

    pipeline.stop().await;
}

#[tokio::test]
async fn test_tier_limits_through_chat() {
    let app = limited_app().await;
    let pipeline = Pipeline::start(&app, Duration::ZERO);

    assert_eq!(
        pipeline.ask("viewer", "!slot A", Badges::default()).await,
        "your slot 'A' has been added to the list viewer!"
    );
    assert_eq!(
        pipeline.ask("viewer", "!slot B", Badges::default()).await,
        "viewer slot limit of 1 reached for this session."
    );

    assert!(pipeline.ask("sub", "!slot C", subscriber()).await.starts_with("your slot"));
    assert!(pipeline.ask("sub", "!slot D", subscriber()).await.starts_with("your slot"));
    assert_eq!(
        pipeline.ask("sub", "!slot E", subscriber()).await,
        "sub slot limit of 2 reached for this session."
    );

    let stored = app.services.slots.list(&SlotFilter::default()).await.unwrap();
    assert_eq!(stored.len(), 3);

    pipeline.stop().await;
}

#[tokio::test]
async fn test_duplicate_and_cooldown_through_chat() {
    let app = limited_app().await;
    let pipeline = Pipeline::start(&app, Duration::ZERO);

    pipeline.ask("sub", "!slot Wanted", subscriber()).await;
    assert_eq!(
        pipeline.ask("other", "!slot Wanted", Badges::default()).await,
        "other this slot has already been called."
    );

    let slot = app.services.slots.list(&SlotFilter::default()).await.unwrap()[0].clone();
    app.services
        .slots
        .update(
            slot.id,
            SlotUpdate {
                status: Some(SlotStatus::Out),
                ..SlotUpdate::default()
            },
        )
        .await
        .unwrap();

    app.clock.advance(ChronoDuration::minutes(1));
    assert_eq!(
        pipeline.ask("other", "!slot Wanted", Badges::default()).await,
        "other 'Wanted' is on cooldown for another 4 minutes."
    );

    app.clock.advance(ChronoDuration::minutes(5));
    assert_eq!(
        pipeline.ask("other", "!slot Wanted", Badges::default()).await,
        "your slot 'Wanted' has been added to the list other!"
    );

    pipeline.stop().await;
}

#[tokio::test]
async fn test_timeout_and_myslots_through_chat() {
    let app = limited_app().await;
    let pipeline = Pipeline::start(&app, Duration::ZERO);

    assert_eq!(
        pipeline.ask("viewer", "!myslots", Badges::default()).await,
        "viewer - Slots in queue: none; IN: none; OUT: none"
    );
    assert!(app.services.sessions.peek().await.unwrap().is_none());

    app.services.timeouts.add("viewer", 3.0).await.unwrap();
    assert_eq!(
        pipeline.ask("viewer", "!slot A", Badges::default()).await,
        "viewer you are timed out for another 3 minutes."
    );

    app.clock.advance(ChronoDuration::minutes(3));
    pipeline.ask("viewer", "!slot A", Badges::default()).await;
    assert_eq!(
        pipeline.ask("viewer", "!myslots", Badges::default()).await,
        "viewer - Slots in queue: A; IN: none; OUT: none"
    );

    pipeline.stop().await;
}
