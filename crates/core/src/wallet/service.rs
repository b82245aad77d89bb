//! Wallet service: pure balance arithmetic.
//!
//! This service contains the deposit/withdraw arithmetic with no storage
//! dependencies. It operates on the balance value handed to it by the
//! transactional orchestrator in `walletd-db`, which owns the locked read
//! and the durable write; that split keeps the arithmetic independently
//! testable without a database.

use rust_decimal::Decimal;
use walletd_shared::Amount;

use super::error::BalanceError;
use super::kind::OperationKind;

/// Pure balance arithmetic for a single wallet.
pub struct WalletService;

impl WalletService {
    /// Adds `amount` to `balance`.
    ///
    /// Amounts are validated positive at parse time, so a deposit never
    /// fails and never lowers the balance.
    #[must_use]
    pub fn deposit(balance: Decimal, amount: Amount) -> Decimal {
        balance + amount.value()
    }

    /// Subtracts `amount` from `balance`.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InsufficientFunds`] when `balance < amount`;
    /// the input balance is left untouched.
    pub fn withdraw(balance: Decimal, amount: Amount) -> Result<Decimal, BalanceError> {
        if balance < amount.value() {
            return Err(BalanceError::InsufficientFunds);
        }
        Ok(balance - amount.value())
    }

    /// Dispatches a balance mutation to the arithmetic for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InsufficientFunds`] for a withdrawal that
    /// exceeds the balance.
    pub fn apply(
        kind: OperationKind,
        balance: Decimal,
        amount: Amount,
    ) -> Result<Decimal, BalanceError> {
        match kind {
            OperationKind::Deposit => Ok(Self::deposit(balance, amount)),
            OperationKind::Withdraw => Self::withdraw(balance, amount),
        }
    }
}
