//! Dashboard API tests driven through the router.

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use slotbot_core::events::EventKind;

use crate::helpers::{TestApp, test_config};

async fn first_slot_id(app: &TestApp) -> String {
    let resp = app.request("GET", "/api/slots", None).await;
    resp.body["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let resp = app.request("GET", "/api/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["data"]["status"], "ok");
    assert_eq!(resp.body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_sessions_listed_after_first_slot() {
    let app = TestApp::new().await;
    let empty = app.request("GET", "/api/sessions", None).await;
    assert_eq!(empty.body["data"], json!([]));

    app.chat("alice", "!slot Gates of Olympus").await;
    let resp = app.request("GET", "/api/sessions", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(resp.body["data"][0]["label"], "2024-05-01 20:00");
}

#[tokio::test]
async fn test_list_slots_with_filters() {
    let app = TestApp::new().await;
    app.chat("alice", "!slot A").await;
    app.chat("bob", "!slot B").await;

    let all = app.request("GET", "/api/slots", None).await;
    assert_eq!(all.body["data"].as_array().unwrap().len(), 2);

    let bob = app.request("GET", "/api/slots?user=bob", None).await;
    assert_eq!(bob.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(bob.body["data"][0]["message"], "B");

    let unset = app.request("GET", "/api/slots?status=unset", None).await;
    assert_eq!(unset.body["data"].as_array().unwrap().len(), 2);
    let played = app.request("GET", "/api/slots?status=IN", None).await;
    assert_eq!(played.body["data"], json!([]));

    let dated = app
        .request("GET", "/api/slots?start_date=2024-05-02", None)
        .await;
    assert_eq!(dated.body["data"], json!([]));

    let bad = app.request("GET", "/api/slots?status=MAYBE", None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.body["success"], false);
    assert_eq!(bad.body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_patch_slot_validation() {
    let app = TestApp::new().await;
    app.chat("alice", "!slot A").await;
    let id = first_slot_id(&app).await;
    let path = format!("/api/slots/{id}");

    let bad_status = app
        .request("PATCH", &path, Some(json!({"status": "MAYBE"})))
        .await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_status.body["error"]["message"], "Invalid status");

    let bad_payout = app
        .request("PATCH", &path, Some(json!({"payout": "lots"})))
        .await;
    assert_eq!(bad_payout.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_payout.body["error"]["message"], "Invalid payout amount");

    let nothing = app.request("PATCH", &path, Some(json!({}))).await;
    assert_eq!(nothing.status, StatusCode::BAD_REQUEST);
    assert_eq!(nothing.body["error"]["message"], "Nothing to update");

    let blank = app
        .request("PATCH", &path, Some(json!({"message": "  "})))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request(
            "PATCH",
            "/api/slots/00000000-0000-0000-0000-000000000000",
            Some(json!({"status": "IN"})),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app
        .request("PATCH", "/api/slots/not-an-id", Some(json!({"status": "IN"})))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_out_starts_cooldown_and_publishes() {
    let app = TestApp::new().await;
    app.chat("alice", "!slot X").await;
    let id = first_slot_id(&app).await;
    let mut observer = app.services.hub.register();

    let resp = app
        .request(
            "PATCH",
            &format!("/api/slots/{id}"),
            Some(json!({"status": "OUT", "payout": 125.5})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let event = observer.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::Update);
    assert_eq!(event.payload["id"], id.as_str());
    assert_eq!(event.payload["status"], "OUT");
    assert_eq!(event.payload["payout"], 125.5);
    assert_eq!(event.payload["out_count"], 1);
    assert!(event.payload["cooldown_expires_at"].is_string());

    let refused = app.chat("bob", "!slot X").await.unwrap();
    assert!(refused.contains("cooldown"), "{refused}");
}

#[tokio::test]
async fn test_delete_slot() {
    let app = TestApp::new().await;
    app.chat("alice", "!slot A").await;
    let id = first_slot_id(&app).await;
    let mut observer = app.services.hub.register();

    let resp = app
        .request("DELETE", &format!("/api/slots/{id}"), None)
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let event = observer.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::Delete);
    assert_eq!(event.payload, json!({"id": id}));

    let again = app
        .request("DELETE", &format!("/api/slots/{id}"), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_roundtrip_affects_admission() {
    let app = TestApp::new().await;
    let resp = app.request("GET", "/api/settings", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["enabled"], false);

    let mut observer = app.services.hub.register();
    let updated = app
        .request(
            "PATCH",
            "/api/settings",
            Some(json!({"enabled": true, "follower_limit": 1})),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["enabled"], true);
    assert_eq!(updated.body["data"]["follower_limit"], 1);
    let event = observer.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::Settings);

    app.chat("viewer", "!slot A").await;
    let refused = app.chat("viewer", "!slot B").await.unwrap();
    assert!(refused.contains("limit of 1"), "{refused}");

    let negative = app
        .request("PATCH", "/api/settings", Some(json!({"vip_limit": -1})))
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
    let empty = app.request("PATCH", "/api/settings", Some(json!({}))).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    let endless = app
        .request(
            "PATCH",
            "/api/settings",
            Some(json!({"out_cooldown_minutes": 1e15})),
        )
        .await;
    assert_eq!(endless.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeouts_lifecycle() {
    let app = TestApp::new().await;
    let mut observer = app.services.hub.register();

    let created = app
        .request(
            "POST",
            "/api/timeouts",
            Some(json!({"user": "spammer", "duration": 10})),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(observer.recv().await.unwrap().kind, EventKind::TimeoutAdd);

    let refused = app.chat("spammer", "!slot A").await.unwrap();
    assert_eq!(refused, "spammer you are timed out for another 10 minutes.");

    let listed = app.request("GET", "/api/timeouts", None).await;
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 1);

    let removed = app
        .request("DELETE", &format!("/api/timeouts/{id}"), None)
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
    let event = observer.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::TimeoutRemove);
    assert_eq!(event.payload["id"], id.as_str());

    let accepted = app.chat("spammer", "!slot A").await.unwrap();
    assert!(accepted.starts_with("your slot"));

    let invalid = app
        .request(
            "POST",
            "/api/timeouts",
            Some(json!({"user": "spammer", "duration": 0})),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let endless = app
        .request(
            "POST",
            "/api/timeouts",
            Some(json!({"user": "spammer", "duration": 1e15})),
        )
        .await;
    assert_eq!(endless.status, StatusCode::BAD_REQUEST);
    assert_eq!(endless.body["error"]["message"], "Duration is too long");

    let gone = app
        .request("DELETE", &format!("/api/timeouts/{id}"), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_timeouts_not_listed() {
    let app = TestApp::new().await;
    app.request(
        "POST",
        "/api/timeouts",
        Some(json!({"user": "spammer", "duration": 1})),
    )
    .await;
    app.clock.advance(Duration::minutes(2));
    let listed = app.request("GET", "/api/timeouts", None).await;
    assert_eq!(listed.body["data"], json!([]));
}

#[tokio::test]
async fn test_leaderboard_endpoint() {
    let app = TestApp::new().await;
    for (user, text) in [("alice", "A"), ("alice", "B"), ("bob", "C")] {
        app.chat(user, &format!("!slot {text}")).await;
    }
    let slots = app.request("GET", "/api/slots", None).await;
    for slot in slots.body["data"].as_array().unwrap() {
        let id = slot["id"].as_str().unwrap();
        app.request(
            "PATCH",
            &format!("/api/slots/{id}"),
            Some(json!({"status": "IN"})),
        )
        .await;
    }

    let resp = app
        .request("GET", "/api/leaderboard?period=weekly", None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["period"], "weekly");
    assert_eq!(
        resp.body["data"]["entries"],
        json!([{"user": "alice", "count": 2}, {"user": "bob", "count": 1}])
    );

    let again = app
        .request("GET", "/api/leaderboard?period=weekly", None)
        .await;
    assert_eq!(again.body, resp.body);

    let bad = app
        .request("GET", "/api/leaderboard?period=yearly", None)
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_event_stream_content_type() {
    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .uri("/events")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );
}

#[tokio::test]
async fn test_seeded_settings_come_from_config() {
    let mut config = test_config();
    config.settings.enabled = true;
    config.settings.moderator_limit = 9;
    let app = TestApp::with_config(config).await;
    let resp = app.request("GET", "/api/settings", None).await;
    assert_eq!(resp.body["data"]["enabled"], true);
    assert_eq!(resp.body["data"]["moderator_limit"], 9);
}
