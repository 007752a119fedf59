//! Transaction recording and settlement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::routes::fees::fee_app_error;
use crate::routes::{FINANCE_OFFICE, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_db::FeeRepository;
use unifin_shared::types::PageRequest;

/// Creates the transaction routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/transactions",
            post(record_transaction).get(list_transactions),
        )
        .route("/admin/transactions/approve", post(approve_transaction))
        .route(
            "/admin/students/{id}/transactions",
            get(student_transactions),
        )
}

/// Request body for recording an offline payment.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// Fee record the payment applies to.
    pub student_fee_record_id: Uuid,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment method (cash, cheque, bank transfer).
    pub method: String,
    /// Optional free-form remarks.
    pub remarks: Option<String>,
}

/// Request body for approving a pending gateway transaction.
#[derive(Debug, Deserialize)]
pub struct ApproveTransactionRequest {
    /// The pending transaction.
    pub transaction_id: Uuid,
}

/// POST `/admin/transactions` - Record an offline payment, settling it
/// immediately.
async fn record_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordTransactionRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .record_transaction(
            payload.student_fee_record_id,
            payload.amount,
            payload.method,
            payload.remarks,
            auth.user_id(),
        )
        .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "transaction": outcome.transaction,
                "record": outcome.record,
                "new_balance": outcome.new_balance,
            })),
        )
            .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// GET `/admin/transactions` - List transactions, newest first,
/// paginated.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.list_transactions(&page).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// POST `/admin/transactions/approve` - Approve a pending gateway
/// transaction, crediting the central balance.
async fn approve_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ApproveTransactionRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .approve_transaction(payload.transaction_id, auth.user_id())
        .await
    {
        Ok(outcome) => Json(json!({
            "transaction": outcome.transaction,
            "record": outcome.record,
            "new_balance": outcome.new_balance,
        }))
        .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// GET `/admin/students/{id}/transactions` - One student's transaction
/// history.
async fn student_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.student_transactions(id).await {
        Ok(rows) => Json(json!({ "transactions": rows })).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}
