//! Shared types, errors, and configuration for Granary.
//!
//! This crate provides common types used across all other crates:
//! - Currency definitions backing report formatting
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
