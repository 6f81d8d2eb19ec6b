//! Shared types, errors, and configuration for Invsplit.
//!
//! This crate provides common types used across all other crates:
//! - Monetary amounts with fixed two-decimal precision
//! - Split mode selection
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LogSettings, SplitSettings};
pub use error::{AppError, AppResult};
pub use types::{MonetaryAmount, Rounding, SplitMode};
