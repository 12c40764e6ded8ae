//! Chat command admission.

pub mod decision;
pub mod engine;

pub use decision::{Decision, Rejection};
pub use engine::AdmissionEngine;
