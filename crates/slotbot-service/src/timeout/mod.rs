//! Timeout registry.

pub mod service;

pub use service::TimeoutService;
