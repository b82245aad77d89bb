//! Wallet routes: balance reads and operation creation.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use walletd_core::wallet::OperationKind;
use walletd_db::{ApplyOperationInput, WalletError, WalletRepository};
use walletd_shared::{WalletId, types::amount::format_balance};

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet_id}", get(get_wallet))
        .route("/wallets/{wallet_id}/operation", post(create_operation))
}

/// Request body for creating an operation.
///
/// Both fields are optional at the serde level so that missing fields
/// surface as field-keyed validation errors rather than a body-level 422.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    /// Operation kind: `"DEPOSIT"` or `"WITHDRAW"`.
    pub operation_type: Option<String>,
    /// Positive decimal amount string.
    pub amount: Option<String>,
}

fn repository(state: &AppState) -> WalletRepository {
    WalletRepository::new((*state.db).clone()).with_lock_timeout(state.lock_timeout_secs)
}

/// GET `/wallets/{wallet_id}` - Wallet id and current balance.
async fn get_wallet(State(state): State<AppState>, Path(wallet_id): Path<Uuid>) -> impl IntoResponse {
    let repo = repository(&state);

    match repo.get_wallet(WalletId::from_uuid(wallet_id)).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "id": wallet.id,
                "balance": format_balance(wallet.balance),
            })),
        )
            .into_response(),
        Err(err) => {
            let (status, body) = error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// POST `/wallets/{wallet_id}/operation` - Apply a deposit or withdrawal.
async fn create_operation(
    State(state): State<AppState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<OperationRequest>,
) -> impl IntoResponse {
    if let Some(body) = missing_field_errors(&payload) {
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    let input = ApplyOperationInput {
        operation_type: payload.operation_type.unwrap_or_default(),
        amount: payload.amount.unwrap_or_default(),
    };

    let repo = repository(&state);

    match repo.apply_operation(WalletId::from_uuid(wallet_id), input).await {
        Ok(operation) => {
            info!(
                wallet_id = %wallet_id,
                operation_id = %operation.id,
                "Operation created"
            );

            (
                StatusCode::CREATED,
                Json(json!({
                    "id": operation.id,
                    "operation_type": OperationKind::from(operation.operation_type).as_str(),
                    "amount": format_balance(operation.amount),
                })),
            )
                .into_response()
        }
        Err(err) => {
            let (status, body) = error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// Builds the field-keyed error map for absent request fields.
fn missing_field_errors(payload: &OperationRequest) -> Option<Value> {
    let mut errors = serde_json::Map::new();
    if payload.operation_type.is_none() {
        errors.insert(
            "operation_type".to_string(),
            json!(["this field is required"]),
        );
    }
    if payload.amount.is_none() {
        errors.insert("amount".to_string(), json!(["this field is required"]));
    }
    if errors.is_empty() {
        None
    } else {
        Some(Value::Object(errors))
    }
}

/// Maps a repository error to a status and response body.
///
/// Validation and business-rule failures produce field-keyed error maps,
/// naming the responsible field; infrastructure failures produce the
/// generic error/message shape.
fn error_response(err: &WalletError) -> (StatusCode, Value) {
    match err {
        WalletError::NotFound(wallet_id) => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "not_found",
                "message": format!("No wallet matches id {wallet_id}")
            }),
        ),
        WalletError::InvalidAmount(amount_err) => (
            StatusCode::BAD_REQUEST,
            json!({ "amount": [amount_err.to_string()] }),
        ),
        WalletError::InsufficientFunds => (
            StatusCode::BAD_REQUEST,
            json!({ "amount": [err.to_string()] }),
        ),
        WalletError::InvalidOperationType(kind_err) => (
            StatusCode::BAD_REQUEST,
            json!({ "operation_type": [kind_err.to_string()] }),
        ),
        WalletError::DuplicateOwner(owner_id) => (
            StatusCode::CONFLICT,
            json!({
                "error": "duplicate_owner",
                "message": format!("User {owner_id} already has a wallet")
            }),
        ),
        WalletError::Busy => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "error": "busy",
                "message": "The wallet is locked by another operation, retry"
            }),
        ),
        WalletError::Database(db_err) => {
            error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                }),
            )
        }
    }
}
