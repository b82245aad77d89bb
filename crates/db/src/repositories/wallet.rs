//! Wallet repository implementing the atomic-apply protocol.
//!
//! `apply_operation` is the balance-mutation protocol: one transaction per
//! call, an exclusive row lock on the wallet for the transaction's lifetime,
//! the pure arithmetic from `walletd-core` in the middle, and the updated
//! balance plus the new operation row committed together. Every failure
//! path after `begin` rolls the whole unit back, so the balance and the
//! operation history can never diverge at a commit boundary.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use walletd_core::wallet::{BalanceError, OperationKind, ParseOperationKindError, WalletService};
use walletd_shared::{Amount, AmountError, OperationId, UserId, WalletId};

use crate::entities::{operations, sea_orm_active_enums::OperationType, wallets};

/// Default upper bound on row-lock waits.
const DEFAULT_LOCK_TIMEOUT_SECS: u32 = 5;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No wallet exists with the given identifier.
    #[error("wallet not found: {0}")]
    NotFound(WalletId),

    /// The amount failed validation (format, scale, digits, or sign).
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// The operation type is outside the two-member enumeration.
    #[error(transparent)]
    InvalidOperationType(#[from] ParseOperationKindError),

    /// A withdrawal exceeds the wallet's balance.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The owner already has a wallet (1:1 relation).
    #[error("user {0} already has a wallet")]
    DuplicateOwner(UserId),

    /// The row lock could not be acquired within the configured bound;
    /// the operation is safe to retry.
    #[error("wallet is locked by another operation, retry")]
    Busy,

    /// Database error.
    #[error("database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for WalletError {
    fn from(err: DbErr) -> Self {
        // Postgres raises 55P03 (lock_not_available) when the
        // `SET LOCAL lock_timeout` bound expires while waiting on the row.
        let message = err.to_string();
        if message.contains("55P03") || message.contains("lock timeout") {
            Self::Busy
        } else {
            Self::Database(err)
        }
    }
}

impl From<BalanceError> for WalletError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds => Self::InsufficientFunds,
        }
    }
}

impl From<OperationKind> for OperationType {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Deposit => Self::Deposit,
            OperationKind::Withdraw => Self::Withdraw,
        }
    }
}

impl From<OperationType> for OperationKind {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Deposit => Self::Deposit,
            OperationType::Withdraw => Self::Withdraw,
        }
    }
}

/// Input for applying an operation to a wallet.
///
/// Both fields arrive as raw strings and are validated inside the locked
/// transaction, in protocol order, so the contract holds for every caller
/// and not only for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ApplyOperationInput {
    /// Operation kind: `"DEPOSIT"` or `"WITHDRAW"`.
    pub operation_type: String,
    /// Positive decimal amount string, scale at most 2.
    pub amount: String,
}

/// Wallet repository for reads and the atomic-apply protocol.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
    lock_timeout_secs: u32,
}

impl WalletRepository {
    /// Creates a new wallet repository with the default lock-wait bound.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            lock_timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
        }
    }

    /// Overrides the row-lock wait bound.
    #[must_use]
    pub const fn with_lock_timeout(mut self, secs: u32) -> Self {
        self.lock_timeout_secs = secs;
        self
    }

    /// Creates a wallet for an owner.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOwner` when the owner already has a wallet, or a
    /// database error.
    pub async fn create_wallet(
        &self,
        owner_id: UserId,
        initial_balance: Decimal,
    ) -> Result<wallets::Model, WalletError> {
        let wallet = wallets::ActiveModel {
            id: Set(WalletId::new().into_inner()),
            balance: Set(initial_balance),
            owner_id: Set(owner_id.into_inner()),
            created_at: Set(Utc::now().into()),
        };

        wallet.insert(&self.db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                WalletError::DuplicateOwner(owner_id)
            } else {
                err.into()
            }
        })
    }

    /// Non-locking point read of a wallet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no wallet has the given id.
    pub async fn get_wallet(&self, wallet_id: WalletId) -> Result<wallets::Model, WalletError> {
        wallets::Entity::find_by_id(wallet_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))
    }

    /// Lists a wallet's operations, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_operations(
        &self,
        wallet_id: WalletId,
    ) -> Result<Vec<operations::Model>, WalletError> {
        let ops = operations::Entity::find()
            .filter(operations::Column::WalletId.eq(wallet_id.into_inner()))
            .order_by_desc(operations::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(ops)
    }

    /// Applies a deposit or withdrawal to a wallet, atomically.
    ///
    /// Protocol, all inside one transaction:
    /// 1. Lock the wallet row exclusively (`SELECT ... FOR UPDATE`), bounded
    ///    by `lock_timeout`; concurrent applies on the same wallet queue here
    ///    and re-read a fresh balance once the lock is released.
    /// 2. Validate the amount, then the operation type; no writes on failure.
    /// 3. Run the pure arithmetic; `InsufficientFunds` rolls back.
    /// 4. Persist the new balance and insert the operation row.
    /// 5. Commit, returning the persisted operation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidAmount`, `InvalidOperationType`,
    /// `InsufficientFunds`, `Busy`, or a database error. In every error case
    /// the transaction is rolled back and nothing is written.
    pub async fn apply_operation(
        &self,
        wallet_id: WalletId,
        input: ApplyOperationInput,
    ) -> Result<operations::Model, WalletError> {
        let txn = self.db.begin().await?;

        match self.apply_in_txn(&txn, wallet_id, &input).await {
            Ok(operation) => {
                txn.commit().await?;
                tracing::debug!(
                    wallet_id = %wallet_id,
                    operation_id = %operation.id,
                    kind = %input.operation_type,
                    "Operation applied"
                );
                Ok(operation)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn apply_in_txn(
        &self,
        txn: &DatabaseTransaction,
        wallet_id: WalletId,
        input: &ApplyOperationInput,
    ) -> Result<operations::Model, WalletError> {
        txn.execute_unprepared(&format!(
            "SET LOCAL lock_timeout = '{}s'",
            self.lock_timeout_secs
        ))
        .await?;

        // Exclusive row lock, held until commit/rollback. Locks exactly one
        // wallet row; applies against other wallets proceed in parallel.
        let wallet = wallets::Entity::find_by_id(wallet_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let amount = Amount::parse(&input.amount)?;
        let kind: OperationKind = input.operation_type.parse()?;

        let new_balance = WalletService::apply(kind, wallet.balance, amount)?;

        let mut wallet: wallets::ActiveModel = wallet.into();
        wallet.balance = Set(new_balance);
        wallet.update(txn).await?;

        let operation = operations::ActiveModel {
            id: Set(OperationId::new().into_inner()),
            amount: Set(amount.value()),
            operation_type: Set(OperationType::from(kind)),
            wallet_id: Set(wallet_id.into_inner()),
            created_at: Set(Utc::now().into()),
        };

        Ok(operation.insert(txn).await?)
    }
}
