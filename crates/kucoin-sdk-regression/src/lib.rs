/*
[INPUT]:  Public API exports for the kucoin-sdk-regression crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod forever;
pub mod reconnect;
pub mod service;
pub mod stats;

// Re-export main types for convenience
pub use config::{Credentials, RegressionConfig};
pub use service::{CaseResult, Summary};
pub use stats::RunStats;
