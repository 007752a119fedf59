//! Non-fee income routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::routes::{FINANCE_OFFICE, balance_app_error, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_db::IncomeRepository;
use unifin_db::repositories::income::{IncomeError, RecordIncomeInput};
use unifin_shared::AppError;

/// Creates the income routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/income", post(record_income).get(list_income))
}

/// Request body for recording an income source.
#[derive(Debug, Deserialize)]
pub struct RecordIncomeRequest {
    /// Name of the income source.
    pub source_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount received.
    pub amount: Decimal,
    /// Date the income was received.
    pub received_date: NaiveDate,
}

fn income_app_error(e: &IncomeError) -> AppError {
    match e {
        IncomeError::NonPositiveAmount(_) => AppError::Validation(e.to_string()),
        IncomeError::Balance(balance) => balance_app_error(balance),
        IncomeError::Database(_) => {
            error!(error = %e, "income operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// POST `/admin/income` - Record a non-fee income, crediting the
/// central balance.
async fn record_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordIncomeRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = IncomeRepository::new((*state.db).clone());
    match repo
        .record(RecordIncomeInput {
            source_name: payload.source_name,
            description: payload.description,
            amount: payload.amount,
            received_date: payload.received_date,
            recorded_by: auth.user_id(),
        })
        .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "income": outcome.income,
                "new_balance": outcome.new_balance,
            })),
        )
            .into_response(),
        Err(e) => error_response(&income_app_error(&e)),
    }
}

/// GET `/admin/income` - List income sources with recorder names.
async fn list_income(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = IncomeRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => Json(json!({
            "income": rows
                .into_iter()
                .map(|row| json!({
                    "income": row.income,
                    "recorded_by_name": row.recorded_by_name,
                }))
                .collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&income_app_error(&e)),
    }
}
