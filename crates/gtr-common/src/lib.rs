//! Common utilities shared by the gtr crates.
//!
//! This crate provides:
//! - Hierarchy and parameter-chain limits
//! - Tracing subscriber configuration (`GTR_LOG`, `GTR_LOG_FORMAT`)

// Centralized limits and thresholds
pub mod limits;

// Tracing subscriber setup
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
