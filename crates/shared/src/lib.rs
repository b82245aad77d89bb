//! Shared types and configuration for walletd.
//!
//! This crate provides common types used across all other crates:
//! - The `Amount` monetary type with fixed-point decimal semantics
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{Amount, AmountError, OperationId, UserId, WalletId};
