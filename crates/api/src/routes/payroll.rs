//! Payroll generation and disbursement routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{FINANCE_OFFICE, balance_app_error, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_db::PayrollRepository;
use unifin_db::entities::sea_orm_active_enums::UserRole as DbUserRole;
use unifin_db::repositories::payroll::PayrollError;
use unifin_shared::AppError;

/// Creates the payroll routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/payroll/generate", post(generate))
        .route("/admin/payroll", get(list))
        .route("/admin/payroll/{id}", put(update_amount))
        .route("/admin/payroll/{id}/pay", post(pay))
        .route("/staff/{id}/payroll", get(for_staff))
}

/// Request body for generating a month's payroll.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Any date inside the target month.
    pub month: NaiveDate,
}

/// Request body for updating an unpaid entry's amount.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    /// New amount.
    pub amount: Decimal,
}

/// Query for listing payroll entries.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict to one role (staff or faculty).
    pub role: Option<String>,
}

fn payroll_app_error(e: &PayrollError) -> AppError {
    match e {
        PayrollError::NotFound(_) => AppError::NotFound(e.to_string()),
        PayrollError::AlreadyPaid(_) | PayrollError::NotUpdatable(_) => {
            AppError::StateConflict(e.to_string())
        }
        PayrollError::Rule(_) => AppError::Validation(e.to_string()),
        PayrollError::Balance(balance) => balance_app_error(balance),
        PayrollError::Database(_) => {
            error!(error = %e, "payroll operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// POST `/admin/payroll/generate` - Create unpaid entries for every
/// active staff and faculty member for the month.
async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GenerateRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = PayrollRepository::new((*state.db).clone());
    match repo.generate_for_month(payload.month, auth.user_id()).await {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "created": outcome.created,
                "skipped": outcome.skipped,
            })),
        )
            .into_response(),
        Err(e) => error_response(&payroll_app_error(&e)),
    }
}

/// GET `/admin/payroll` - List payroll entries, optionally by role.
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let role = match query.role.as_deref() {
        None => None,
        Some("staff") => Some(DbUserRole::Staff),
        Some("faculty") => Some(DbUserRole::Faculty),
        Some(other) => {
            return error_response(&AppError::Validation(format!(
                "Unknown payroll role: {other}"
            )));
        }
    };

    let repo = PayrollRepository::new((*state.db).clone());
    match repo.list(role).await {
        Ok(entries) => Json(json!({ "payroll": entries })).into_response(),
        Err(e) => error_response(&payroll_app_error(&e)),
    }
}

/// PUT `/admin/payroll/{id}` - Update an unpaid entry's amount.
async fn update_amount(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAmountRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = PayrollRepository::new((*state.db).clone());
    match repo.update_amount(id, payload.amount).await {
        Ok(entry) => Json(json!({ "entry": entry })).into_response(),
        Err(e) => error_response(&payroll_app_error(&e)),
    }
}

/// POST `/admin/payroll/{id}/pay` - Disburse one entry, debiting the
/// central balance.
async fn pay(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = PayrollRepository::new((*state.db).clone());
    match repo.pay(id, auth.user_id()).await {
        Ok(outcome) => Json(json!({
            "entry": outcome.entry,
            "new_balance": outcome.new_balance,
        }))
        .into_response(),
        Err(e) => error_response(&payroll_app_error(&e)),
    }
}

/// GET `/staff/{id}/payroll` - One staff member's payroll history.
///
/// Staff and faculty may read their own history; the finance office
/// may read anyone's.
async fn for_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let is_self = auth.user_id() == id;
    if !is_self && require_role(&auth, FINANCE_OFFICE).is_err() {
        return error_response(&AppError::Forbidden(
            "You may only view your own payroll history".to_string(),
        ));
    }

    let repo = PayrollRepository::new((*state.db).clone());
    match repo.for_staff(id).await {
        Ok(entries) => Json(json!({ "payroll": entries })).into_response(),
        Err(e) => error_response(&payroll_app_error(&e)),
    }
}
