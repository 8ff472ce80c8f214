//! Shared types and configuration for Tally.
//!
//! This crate provides common pieces used across all other crates:
//! - Typed account IDs
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::AccountId;
