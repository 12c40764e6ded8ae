//! Timeout domain entities.

pub mod model;

pub use model::{NewTimeout, Timeout};
