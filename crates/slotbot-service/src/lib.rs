//! # slotbot-service
//!
//! Business logic for SlotBot. The admission engine turns chat commands into
//! slot writes and reply text; the operator services back the dashboard and
//! CLI. Every service receives its dependencies at construction time as
//! `Arc` handles.

pub mod admission;
pub mod context;
pub mod ingest;
pub mod session;
pub mod settings;
pub mod slot;
pub mod timeout;

pub use admission::{AdmissionEngine, Decision, Rejection};
pub use context::Services;
pub use ingest::ChatIngest;
pub use session::SessionManager;
pub use settings::{SettingsCache, SettingsService};
pub use slot::{LeaderboardService, SlotService, SlotUpdate};
pub use timeout::TimeoutService;
