//! Chat event ingestion.

pub mod runner;

pub use runner::ChatIngest;
