//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The two permitted operation kinds, as stored in the `operation_type`
/// Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operation_type")]
pub enum OperationType {
    /// Adds funds to a wallet.
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    /// Removes funds from a wallet.
    #[sea_orm(string_value = "WITHDRAW")]
    Withdraw,
}
