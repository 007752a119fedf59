//! API route definitions.

use axum::{
    Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response,
};
use serde_json::json;

use crate::{AppState, middleware::AuthUser, middleware::auth::auth_middleware};
use unifin_core::role::UserRole;
use unifin_db::repositories::balance::BalanceError;
use unifin_shared::AppError;

pub mod auth;
pub mod budgets;
pub mod departments;
pub mod expenses;
pub mod fees;
pub mod health;
pub mod income;
pub mod payments;
pub mod payroll;
pub mod transactions;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(budgets::routes())
        .merge(departments::routes())
        .merge(fees::routes())
        .merge(transactions::routes())
        .merge(payments::routes())
        .merge(payroll::routes())
        .merge(expenses::routes())
        .merge(income::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Checks that the caller holds one of `allowed` roles.
///
/// Returns the parsed role for further handler logic, or a 403
/// response ready to return.
pub(crate) fn require_role(auth: &AuthUser, allowed: &[UserRole]) -> Result<UserRole, Response> {
    match auth.parsed_role() {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(error_response(&AppError::Forbidden(
            "Your role is not allowed to perform this operation".to_string(),
        ))),
    }
}

/// Roles that may finalize monetary operations.
pub(crate) const FINANCE_OFFICE: &[UserRole] = &[UserRole::Admin, UserRole::FinanceManager];

/// Renders an [`AppError`] as a JSON error response.
///
/// Every repository error funnels through here so the status mapping
/// lives in one place.
pub(crate) fn error_response(e: &AppError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}

/// Maps a central-balance error into the shared taxonomy.
pub(crate) fn balance_app_error(e: &BalanceError) -> AppError {
    match e {
        BalanceError::NonPositiveAmount(_) => AppError::Validation(e.to_string()),
        BalanceError::InsufficientFunds { .. } => AppError::InsufficientFunds(e.to_string()),
        BalanceError::Missing | BalanceError::Database(_) => {
            tracing::error!(error = %e, "balance operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}
