//! Property-based tests for WalletService.
//!
//! - The balance always equals the initial balance plus the sum of applied
//!   deposits minus the sum of applied withdrawals.
//! - The balance never goes negative, regardless of operation order.
//! - A failed withdrawal leaves the balance unchanged.

use proptest::prelude::*;
use rust_decimal::Decimal;
use walletd_shared::Amount;

use super::error::BalanceError;
use super::kind::OperationKind;
use super::service::WalletService;

/// Strategy to generate positive amounts (0.01 to 10,000.00) at scale 2.
fn positive_amount() -> impl Strategy<Value = Amount> {
    (1i64..1_000_000i64).prop_map(|cents| {
        Amount::parse(&Decimal::new(cents, 2).to_string()).expect("cents are a valid amount")
    })
}

/// Strategy to generate an operation kind.
fn kind_strategy() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::Deposit), Just(OperationKind::Withdraw)]
}

proptest! {
    #[test]
    fn balance_equals_sum_of_applied_operations(
        initial_cents in 0i64..10_000_000i64,
        ops in prop::collection::vec((kind_strategy(), positive_amount()), 0..64),
    ) {
        let initial = Decimal::new(initial_cents, 2);
        let mut balance = initial;
        let mut deposits = Decimal::ZERO;
        let mut withdrawals = Decimal::ZERO;

        for (kind, amount) in ops {
            match WalletService::apply(kind, balance, amount) {
                Ok(updated) => {
                    balance = updated;
                    match kind {
                        OperationKind::Deposit => deposits += amount.value(),
                        OperationKind::Withdraw => withdrawals += amount.value(),
                    }
                }
                Err(BalanceError::InsufficientFunds) => {
                    // only withdrawals fail, and only when they would overdraw
                    prop_assert_eq!(kind, OperationKind::Withdraw);
                    prop_assert!(balance < amount.value());
                }
            }

            prop_assert!(balance >= Decimal::ZERO);
            prop_assert_eq!(balance, initial + deposits - withdrawals);
        }
    }

    #[test]
    fn withdraw_never_overdraws(
        balance_cents in 0i64..1_000_000i64,
        amount in positive_amount(),
    ) {
        let balance = Decimal::new(balance_cents, 2);
        match WalletService::withdraw(balance, amount) {
            Ok(updated) => prop_assert!(updated >= Decimal::ZERO),
            Err(BalanceError::InsufficientFunds) => prop_assert!(balance < amount.value()),
        }
    }

    #[test]
    fn deposit_then_withdraw_round_trips(
        balance_cents in 0i64..1_000_000i64,
        amount in positive_amount(),
    ) {
        let balance = Decimal::new(balance_cents, 2);
        let after_deposit = WalletService::deposit(balance, amount);
        let after_withdraw = WalletService::withdraw(after_deposit, amount)
            .expect("withdrawing a just-deposited amount always succeeds");
        prop_assert_eq!(after_withdraw, balance);
    }
}
