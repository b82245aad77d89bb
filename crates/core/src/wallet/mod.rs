//! Wallet balance arithmetic.
//!
//! This module implements the pure half of the balance-mutation protocol:
//! - Operation kinds (deposit / withdraw)
//! - Balance arithmetic and the non-negative balance invariant
//! - Error types for balance operations

pub mod error;
pub mod kind;
pub mod service;

#[cfg(test)]
mod service_props;

pub use error::BalanceError;
pub use kind::{OperationKind, ParseOperationKindError};
pub use service::WalletService;
