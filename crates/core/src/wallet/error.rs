//! Error types for balance arithmetic.

use thiserror::Error;

/// Errors that can occur when mutating a wallet balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// A withdrawal exceeds the current balance.
    #[error("insufficient funds")]
    InsufficientFunds,
}
