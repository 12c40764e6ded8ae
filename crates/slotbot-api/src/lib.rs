//! # slotbot-api
//!
//! HTTP surface for the SlotBot dashboard built on Axum: slot, session,
//! settings, timeout and leaderboard routes, the `/events` SSE stream, and
//! the server wiring that starts the chat pipeline alongside them.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
