//! Operation kinds for balance mutations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two permitted kinds of balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Adds funds to a wallet.
    Deposit,
    /// Removes funds from a wallet.
    Withdraw,
}

/// Error for an operation kind outside the two-member enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation type must be one of: DEPOSIT, WITHDRAW")]
pub struct ParseOperationKindError;

impl OperationKind {
    /// Returns the wire representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = ParseOperationKindError;

    // Strict: anything outside the enumeration is an error. Unknown kinds
    // must propagate instead of being silently dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            _ => Err(ParseOperationKindError),
        }
    }
}
