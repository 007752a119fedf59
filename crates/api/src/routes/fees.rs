//! Fee structure and fee assignment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{FINANCE_OFFICE, balance_app_error, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_db::FeeRepository;
use unifin_db::entities::sea_orm_active_enums::FeeStatus as DbFeeStatus;
use unifin_db::repositories::fee::{
    AssignedFeeFilter, AssignedFeeView, CreateFeeStructureInput, FeeError, UpdateFeeStructureInput,
};
use unifin_shared::AppError;

/// Creates the fee routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/fees", post(create_structure).get(list_structures))
        .route(
            "/admin/fees/{id}",
            axum::routing::put(update_structure).delete(delete_structure),
        )
        .route("/admin/assignfee", post(assign_single))
        .route("/admin/assignfee/bulk", post(assign_bulk))
        .route("/admin/assignfee/list", post(assign_list))
        .route("/admin/assignfee/{id}", delete(revoke_assignment))
        .route("/admin/assignedfees", get(list_assigned))
        .route("/admin/students/{id}/fees", get(student_fees))
}

// ============================================================================
// Request / response types
// ============================================================================

/// Request body for creating a fee structure.
#[derive(Debug, Deserialize)]
pub struct CreateStructureRequest {
    /// Structure name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount owed per assigned student.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
}

/// Request body for updating a fee structure. Absent fields are kept.
#[derive(Debug, Deserialize)]
pub struct UpdateStructureRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
}

/// Request body for assigning a fee to a single student.
#[derive(Debug, Deserialize)]
pub struct AssignSingleRequest {
    /// The student.
    pub student_id: Uuid,
    /// The fee structure.
    pub fee_structure_id: Uuid,
}

/// Request body for bulk assignment by department and/or batch.
#[derive(Debug, Deserialize)]
pub struct AssignBulkRequest {
    /// Restrict to one department.
    pub department_id: Option<Uuid>,
    /// Restrict to one batch.
    pub batch: Option<String>,
    /// The fee structure.
    pub fee_structure_id: Uuid,
}

/// Request body for assigning a fee to an explicit student list.
#[derive(Debug, Deserialize)]
pub struct AssignListRequest {
    /// The students.
    pub student_ids: Vec<Uuid>,
    /// The fee structure.
    pub fee_structure_id: Uuid,
}

/// Query parameters for listing assigned fee records.
#[derive(Debug, Deserialize)]
pub struct AssignedFeeQuery {
    /// Restrict to one student.
    pub student_id: Option<Uuid>,
    /// Restrict to students of one department.
    pub department_id: Option<Uuid>,
    /// Restrict to one batch.
    pub batch: Option<String>,
    /// Restrict to one fee structure.
    pub fee_structure_id: Option<Uuid>,
    /// Restrict to one status (unpaid, partial, paid).
    pub status: Option<String>,
}

fn assigned_fee_json(view: AssignedFeeView) -> serde_json::Value {
    json!({
        "record": view.record,
        "student_name": view.student_name,
        "enrollment_no": view.enrollment_no,
        "structure_name": view.structure_name,
        "structure_amount": view.structure_amount,
    })
}

pub(crate) fn fee_app_error(e: &FeeError) -> AppError {
    match e {
        FeeError::StructureNotFound(_)
        | FeeError::StudentNotFound(_)
        | FeeError::RecordNotFound(_)
        | FeeError::TransactionNotFound(_) => AppError::NotFound(e.to_string()),
        FeeError::StructureInUse(_) | FeeError::DuplicateAssignment { .. } => {
            AppError::Conflict(e.to_string())
        }
        FeeError::RecordNotRevocable(_) | FeeError::TransactionNotPending(_) => {
            AppError::StateConflict(e.to_string())
        }
        FeeError::RecordNotOwned(_) => AppError::Forbidden(e.to_string()),
        FeeError::NoStudentsMatched => AppError::NotFound(e.to_string()),
        FeeError::Rule(_) => AppError::Validation(e.to_string()),
        FeeError::Balance(balance) => balance_app_error(balance),
        FeeError::Database(_) => {
            error!(error = %e, "fee operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

// ============================================================================
// Structure CRUD
// ============================================================================

/// POST `/admin/fees` - Create a fee structure.
async fn create_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateStructureRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .create_structure(CreateFeeStructureInput {
            name: payload.name,
            description: payload.description,
            amount: payload.amount,
            due_date: payload.due_date,
        })
        .await
    {
        Ok(structure) => (StatusCode::CREATED, Json(json!({ "fee": structure }))).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// GET `/admin/fees` - List fee structures.
async fn list_structures(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.list_structures().await {
        Ok(structures) => Json(json!({ "fees": structures })).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// PUT `/admin/fees/{id}` - Update a fee structure.
async fn update_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStructureRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .update_structure(
            id,
            UpdateFeeStructureInput {
                name: payload.name,
                description: payload.description,
                amount: payload.amount,
                due_date: payload.due_date,
            },
        )
        .await
    {
        Ok(structure) => Json(json!({ "fee": structure })).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// DELETE `/admin/fees/{id}` - Delete an unreferenced fee structure.
async fn delete_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.delete_structure(id).await {
        Ok(()) => Json(json!({ "message": "Fee structure deleted" })).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// POST `/admin/assignfee` - Assign a fee to one student.
async fn assign_single(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AssignSingleRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .assign_single(payload.student_id, payload.fee_structure_id)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(json!({ "record": record }))).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// POST `/admin/assignfee/bulk` - Assign a fee to every student
/// matching a department and/or batch filter.
async fn assign_bulk(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AssignBulkRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .assign_bulk(payload.department_id, payload.batch, payload.fee_structure_id)
        .await
    {
        Ok(outcome) => Json(json!({
            "assigned": outcome.assigned,
            "failed": outcome
                .failed
                .into_iter()
                .map(|(student_id, reason)| json!({
                    "student_id": student_id,
                    "reason": reason,
                }))
                .collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// POST `/admin/assignfee/list` - Assign a fee to an explicit list of
/// students.
async fn assign_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AssignListRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .assign_list(payload.student_ids, payload.fee_structure_id)
        .await
    {
        Ok(outcome) => Json(json!({
            "assigned": outcome.assigned,
            "failed": outcome
                .failed
                .into_iter()
                .map(|(student_id, reason)| json!({
                    "student_id": student_id,
                    "reason": reason,
                }))
                .collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// DELETE `/admin/assignfee/{id}` - Revoke an unpaid assignment.
async fn revoke_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.revoke(id).await {
        Ok(()) => Json(json!({ "message": "Fee assignment revoked" })).into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// GET `/admin/assignedfees` - List assigned fee records with optional
/// filters.
async fn list_assigned(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AssignedFeeQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let status = match query.status.as_deref() {
        None => None,
        Some("unpaid") => Some(DbFeeStatus::Unpaid),
        Some("partial") => Some(DbFeeStatus::Partial),
        Some("paid") => Some(DbFeeStatus::Paid),
        Some(other) => {
            return error_response(&AppError::Validation(format!(
                "Unknown fee status: {other}"
            )));
        }
    };

    let repo = FeeRepository::new((*state.db).clone());
    match repo
        .list_assigned(AssignedFeeFilter {
            student_id: query.student_id,
            department_id: query.department_id,
            batch: query.batch,
            fee_structure_id: query.fee_structure_id,
            status,
        })
        .await
    {
        Ok(views) => Json(json!({
            "records": views.into_iter().map(assigned_fee_json).collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}

/// GET `/admin/students/{id}/fees` - List one student's assigned fees.
async fn student_fees(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = FeeRepository::new((*state.db).clone());
    match repo.student_fees(id).await {
        Ok(views) => Json(json!({
            "fees": views.into_iter().map(assigned_fee_json).collect::<Vec<_>>()
        }))
        .into_response(),
        Err(e) => error_response(&fee_app_error(&e)),
    }
}
