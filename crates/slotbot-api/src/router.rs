//! Route definitions for the SlotBot dashboard API.
//!
//! Resource routes are mounted under `/api`; the event stream lives at
//! `/events`.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(session_routes())
        .merge(slot_routes())
        .merge(settings_routes())
        .merge(timeout_routes())
        .merge(leaderboard_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .route("/events", get(handlers::events::stream_events))
        .with_state(state)
}

fn session_routes() -> Router<AppState> {
    Router::new().route("/sessions", get(handlers::sessions::list_sessions))
}

fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/slots", get(handlers::slots::list_slots))
        .route(
            "/slots/{id}",
            axum::routing::patch(handlers::slots::update_slot).delete(handlers::slots::delete_slot),
        )
}

fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/settings",
        get(handlers::settings::get_settings).patch(handlers::settings::update_settings),
    )
}

fn timeout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/timeouts",
            get(handlers::timeouts::list_timeouts).post(handlers::timeouts::create_timeout),
        )
        .route("/timeouts/{id}", axum::routing::delete(handlers::timeouts::delete_timeout))
}

fn leaderboard_routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(handlers::leaderboard::get_leaderboard))
}
