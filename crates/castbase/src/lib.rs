//! Deterministic engagement scoring and airdrop eligibility estimates for
//! Farcaster analytics, plus the config, error, and telemetry plumbing the
//! service binary builds on.

pub mod analytics;
pub mod config;
pub mod error;
pub mod polling;
pub mod telemetry;
