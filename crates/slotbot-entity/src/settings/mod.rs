//! Settings domain entities.

pub mod model;
pub mod tier;

pub use model::{Settings, SettingsPatch};
pub use tier::Tier;
