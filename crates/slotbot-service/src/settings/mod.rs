//! Settings snapshot cache and write path.

pub mod cache;
pub mod service;

pub use cache::SettingsCache;
pub use service::SettingsService;
