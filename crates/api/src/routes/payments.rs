//! Student-facing gateway payment routes.
//!
//! The gateway client itself is an external collaborator. `create-order`
//! issues a locally generated order reference; `verify-payment` records
//! the provisional settlement, which the finance office later approves.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::fees::fee_app_error;
use crate::routes::{error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_core::role::UserRole;
use unifin_db::repositories::user::UserError;
use unifin_db::{FeeRepository, UserRepository};
use unifin_shared::AppError;

/// Creates the payment routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment/create-order", post(create_order))
        .route("/payment/verify-payment", post(verify_payment))
}

/// Request body for creating a gateway order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Fee record to pay against.
    pub student_fee_record_id: Uuid,
    /// Amount to pay.
    pub amount: Decimal,
}

/// Request body for reporting a completed gateway payment.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Fee record the payment applies to.
    pub student_fee_record_id: Uuid,
    /// Amount paid at the gateway.
    pub amount: Decimal,
    /// Order reference issued by `create-order`.
    pub order_reference: String,
}

/// Resolves the calling student's profile, or the error response.
async fn calling_student(
    state: &AppState,
    auth: &AuthUser,
) -> Result<unifin_db::entities::students::Model, axum::response::Response> {
    if let Err(response) = require_role(auth, &[UserRole::Student]) {
        return Err(response);
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.student_for_user(auth.user_id()).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) | Err(UserError::NotFound) => Err(error_response(&AppError::NotFound(
            "No student profile is linked to this account".to_string(),
        ))),
        Err(e) => {
            error!(error = %e, "failed to resolve student profile");
            Err(error_response(&AppError::Database(
                "An error occurred".to_string(),
            )))
        }
    }
}

/// POST `/payment/create-order` - Issue an order reference for a
/// gateway payment.
async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let student = match calling_student(&state, &auth).await {
        Ok(student) => student,
        Err(response) => return response,
    };

    if payload.amount <= Decimal::ZERO {
        return error_response(&AppError::Validation(
            "Payment amount must be greater than zero".to_string(),
        ));
    }

    let order_reference = format!("order_{}", Uuid::new_v4().simple());
    Json(json!({
        "order_reference": order_reference,
        "student_id": student.id,
        "student_fee_record_id": payload.student_fee_record_id,
        "amount": payload.amount,
    }))
    .into_response()
}

/// POST `/payment/verify-payment` - Record a gateway payment as a
/// pending transaction awaiting finance approval.
async fn verify_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> impl IntoResponse {
    let student = match calling_student(&state, &auth).await {
        Ok(student) => student,
        Err(response) => return response,
    };

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .initiate_gateway_payment(
            payload.student_fee_record_id,
            student.id,
            payload.amount,
            payload.order_reference,
            auth.user_id(),
        )
        .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "transaction": outcome.transaction,
                "record": outcome.record,
                "message": "Payment recorded, awaiting finance approval",
            })),
        )
            .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}
