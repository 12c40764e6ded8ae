//! Request extractors.

pub mod json;
pub mod path;

pub use json::ValidJson;
pub use path::parse_uuid;
