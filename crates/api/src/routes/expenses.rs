//! Expense claim submission and two-stage approval routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{FINANCE_OFFICE, balance_app_error, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_core::budget::BudgetError as BudgetRule;
use unifin_core::expense::{ExpenseAction, ExpenseError as ExpenseRule};
use unifin_core::role::UserRole;
use unifin_db::entities::sea_orm_active_enums::ExpenseStatus as DbExpenseStatus;
use unifin_db::repositories::budget::BudgetError;
use unifin_db::repositories::expense::{ExpenseError, ExpenseWithDepartment};
use unifin_db::{ExpenseRepository, UserRepository};
use unifin_shared::AppError;

/// Creates the expense routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/faculty/expenses", post(submit).get(my_expenses))
        .route("/hod/expenses", get(department_expenses))
        .route("/hod/expenses/{id}/approve", put(hod_approve))
        .route("/hod/expenses/{id}/reject", put(hod_reject))
        .route("/finance/expenses", get(finance_expenses))
        .route("/finance/expenses/{id}/approve", put(finance_approve))
        .route("/finance/expenses/{id}/reject", put(finance_reject))
}

/// Request body for submitting an expense claim.
#[derive(Debug, Deserialize)]
pub struct SubmitExpenseRequest {
    /// Amount claimed.
    pub amount: Decimal,
    /// What the expense is for.
    pub description: String,
}

/// Request body for rejecting a claim.
#[derive(Debug, Deserialize, Default)]
pub struct RejectRequest {
    /// Why the claim was rejected.
    pub reason: Option<String>,
}

/// Query for the finance review queue.
#[derive(Debug, Deserialize)]
pub struct FinanceQueueQuery {
    /// Queue status (pending or dept_approved); defaults to
    /// dept_approved.
    pub status: Option<String>,
}

fn expense_json(row: ExpenseWithDepartment) -> serde_json::Value {
    json!({
        "expense": row.expense,
        "department_name": row.department_name,
    })
}

fn expense_app_error(e: &ExpenseError) -> AppError {
    match e {
        ExpenseError::NotFound(_)
        | ExpenseError::DepartmentNotFound(_)
        | ExpenseError::Budget(BudgetError::DepartmentNotFound(_)) => {
            AppError::NotFound(e.to_string())
        }
        ExpenseError::Rule(ExpenseRule::RoleNotAllowed { .. })
        | ExpenseError::WrongDepartment(_) => AppError::Forbidden(e.to_string()),
        ExpenseError::Rule(ExpenseRule::InvalidTransition { .. }) => {
            AppError::StateConflict(e.to_string())
        }
        ExpenseError::Rule(ExpenseRule::NonPositiveAmount(_))
        | ExpenseError::Budget(BudgetError::Rule(BudgetRule::NonPositiveAmount(_))) => {
            AppError::Validation(e.to_string())
        }
        // An uncovered budget is the expense-side analogue of an
        // overdrawn balance.
        ExpenseError::Budget(BudgetError::Rule(BudgetRule::ExceedsRemaining { .. }))
        | ExpenseError::Budget(BudgetError::BudgetNotFound { .. }) => {
            AppError::InsufficientFunds(e.to_string())
        }
        ExpenseError::Budget(BudgetError::Balance(balance)) => balance_app_error(balance),
        ExpenseError::Budget(BudgetError::Database(_)) | ExpenseError::Database(_) => {
            error!(error = %e, "expense operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// Resolves the caller's department, or the error response.
async fn caller_department(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Uuid, axum::response::Response> {
    let repo = UserRepository::new((*state.db).clone());
    let user = match repo.find_by_id(auth.user_id()).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "failed to resolve caller");
            return Err(error_response(&AppError::Database(
                "An error occurred".to_string(),
            )));
        }
    };

    user.department_id.ok_or_else(|| {
        error_response(&AppError::Validation(
            "Your account is not linked to a department".to_string(),
        ))
    })
}

async fn review(
    state: &AppState,
    auth: &AuthUser,
    expense_id: Uuid,
    action: ExpenseAction,
    role: UserRole,
    department_scope: Option<Uuid>,
    reason: Option<String>,
) -> axum::response::Response {
    let repo = ExpenseRepository::new((*state.db).clone());
    match repo
        .review(
            expense_id,
            action,
            role,
            auth.user_id(),
            department_scope,
            reason,
        )
        .await
    {
        Ok(claim) => Json(json!({ "expense": claim })).into_response(),
        Err(e) => error_response(&expense_app_error(&e)),
    }
}

/// POST `/faculty/expenses` - Submit a claim against the caller's
/// department.
async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SubmitExpenseRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Faculty, UserRole::DepartmentHead]) {
        return response;
    }
    let department_id = match caller_department(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo
        .submit(
            department_id,
            payload.amount,
            payload.description,
            auth.user_id(),
        )
        .await
    {
        Ok(claim) => (StatusCode::CREATED, Json(json!({ "expense": claim }))).into_response(),
        Err(e) => error_response(&expense_app_error(&e)),
    }
}

/// GET `/faculty/expenses` - The caller's own claims.
async fn my_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Faculty, UserRole::DepartmentHead]) {
        return response;
    }

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list_by_submitter(auth.user_id()).await {
        Ok(claims) => Json(json!({ "expenses": claims })).into_response(),
        Err(e) => error_response(&expense_app_error(&e)),
    }
}

/// GET `/hod/expenses` - Claims of the caller's department.
async fn department_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::DepartmentHead]) {
        return response;
    }
    let department_id = match caller_department(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list_by_department(department_id).await {
        Ok(claims) => Json(json!({ "expenses": claims })).into_response(),
        Err(e) => error_response(&expense_app_error(&e)),
    }
}

/// PUT `/hod/expenses/{id}/approve` - First-stage approval.
async fn hod_approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let role = match require_role(&auth, &[UserRole::DepartmentHead]) {
        Ok(role) => role,
        Err(response) => return response,
    };
    let department_id = match caller_department(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };
    review(
        &state,
        &auth,
        id,
        ExpenseAction::DeptApprove,
        role,
        Some(department_id),
        None,
    )
    .await
}

/// PUT `/hod/expenses/{id}/reject` - Department-stage rejection.
async fn hod_reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth, &[UserRole::DepartmentHead]) {
        Ok(role) => role,
        Err(response) => return response,
    };
    let department_id = match caller_department(&state, &auth).await {
        Ok(id) => id,
        Err(response) => return response,
    };
    review(
        &state,
        &auth,
        id,
        ExpenseAction::Reject,
        role,
        Some(department_id),
        payload.reason,
    )
    .await
}

/// GET `/finance/expenses` - The finance review queue.
async fn finance_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FinanceQueueQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let status = match query.status.as_deref() {
        None | Some("dept_approved") => DbExpenseStatus::DeptApproved,
        Some("pending") => DbExpenseStatus::Pending,
        Some(other) => {
            return error_response(&AppError::Validation(format!(
                "Unknown queue status: {other}"
            )));
        }
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    match repo.list_by_status(status).await {
        Ok(rows) => Json(json!({
            "expenses": rows.into_iter().map(expense_json).collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&expense_app_error(&e)),
    }
}

/// PUT `/finance/expenses/{id}/approve` - Final approval; charges the
/// department budget.
async fn finance_approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let role = match require_role(&auth, FINANCE_OFFICE) {
        Ok(role) => role,
        Err(response) => return response,
    };
    review(
        &state,
        &auth,
        id,
        ExpenseAction::FinalApprove,
        role,
        None,
        None,
    )
    .await
}

/// PUT `/finance/expenses/{id}/reject` - Finance-stage rejection.
async fn finance_reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> impl IntoResponse {
    let role = match require_role(&auth, FINANCE_OFFICE) {
        Ok(role) => role,
        Err(response) => return response,
    };
    review(
        &state,
        &auth,
        id,
        ExpenseAction::Reject,
        role,
        None,
        payload.reason,
    )
    .await
}
