//! Central funds and department budget routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{FINANCE_OFFICE, balance_app_error, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_core::budget::BudgetError as BudgetRule;
use unifin_db::repositories::budget::BudgetError;
use unifin_db::{BalanceRepository, BudgetRepository};
use unifin_shared::AppError;

/// Creates the budget routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/funds", get(get_funds))
        .route("/admin/budgets", put(allocate_budget).get(list_budgets))
        .route("/admin/budget-summary", get(budget_summary))
}

/// Request body for allocating a department budget.
#[derive(Debug, Deserialize)]
pub struct AllocateBudgetRequest {
    /// Department receiving the allocation.
    pub department_id: Uuid,
    /// Amount to allocate.
    pub amount: Decimal,
    /// Fiscal year; defaults to the current calendar year.
    pub fiscal_year: Option<i32>,
}

/// Query for the budget summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Fiscal year; defaults to the current calendar year.
    pub fiscal_year: Option<i32>,
}

fn budget_app_error(e: &BudgetError) -> AppError {
    match e {
        BudgetError::DepartmentNotFound(_) | BudgetError::BudgetNotFound { .. } => {
            AppError::NotFound(e.to_string())
        }
        BudgetError::Rule(BudgetRule::NonPositiveAmount(_)) => AppError::Validation(e.to_string()),
        BudgetError::Rule(BudgetRule::ExceedsRemaining { .. }) => {
            AppError::InsufficientFunds(e.to_string())
        }
        BudgetError::Balance(balance) => balance_app_error(balance),
        BudgetError::Database(_) => {
            error!(error = %e, "budget operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// GET `/admin/funds` - Read the central balance.
async fn get_funds(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = BalanceRepository::new((*state.db).clone());
    match repo.read().await {
        Ok(balance) => Json(json!({ "total_amount": balance })).into_response(),
        Err(e) => error_response(&balance_app_error(&e)),
    }
}

/// PUT `/admin/budgets` - Allocate funds to a department budget.
async fn allocate_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AllocateBudgetRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let fiscal_year = payload.fiscal_year.unwrap_or_else(|| Utc::now().year());
    let repo = BudgetRepository::new((*state.db).clone());

    match repo
        .allocate(payload.department_id, payload.amount, fiscal_year)
        .await
    {
        Ok(outcome) => Json(json!({
            "budget": outcome.budget,
            "remaining_funds": outcome.remaining_funds,
        }))
        .into_response(),
        Err(e) => error_response(&budget_app_error(&e)),
    }
}

/// GET `/admin/budgets` - List budget rows with department names.
async fn list_budgets(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = BudgetRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => Json(json!({
            "budgets": rows
                .into_iter()
                .map(|row| json!({
                    "budget": row.budget,
                    "department_name": row.department_name,
                }))
                .collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&budget_app_error(&e)),
    }
}

/// GET `/admin/budget-summary` - Per-department summary for a year.
async fn budget_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let fiscal_year = query.fiscal_year.unwrap_or_else(|| Utc::now().year());
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.summary(fiscal_year).await {
        Ok(rows) => Json(json!({
            "fiscal_year": fiscal_year,
            "departments": rows
                .into_iter()
                .map(|row| json!({
                    "department_id": row.department_id,
                    "department_name": row.department_name,
                    "allocated": row.allocated,
                    "spent": row.spent,
                    "remaining": row.remaining,
                }))
                .collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&budget_app_error(&e)),
    }
}
