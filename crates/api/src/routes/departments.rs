//! Department management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{FINANCE_OFFICE, error_response, require_role};
use crate::{AppState, middleware::AuthUser};
use unifin_db::DepartmentRepository;
use unifin_db::repositories::department::DepartmentError;
use unifin_shared::AppError;

/// Creates the department routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/departments", get(list_departments).post(create_department))
        .route("/admin/departments/{id}", get(get_department))
}

/// Request body for creating a department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Department name, unique across the institution.
    pub name: String,
    /// Optional head of department.
    pub head_id: Option<Uuid>,
}

fn department_app_error(e: &DepartmentError) -> AppError {
    match e {
        DepartmentError::NotFound(_) => AppError::NotFound(e.to_string()),
        DepartmentError::DuplicateName(_) => AppError::Conflict(e.to_string()),
        DepartmentError::Database(_) => {
            error!(error = %e, "department operation failed");
            AppError::Database("An error occurred".to_string())
        }
    }
}

/// POST `/admin/departments` - Create a department.
async fn create_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateDepartmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return error_response(&AppError::Validation(
            "Department name must not be empty".to_string(),
        ));
    }

    let repo = DepartmentRepository::new((*state.db).clone());
    match repo.create(name, payload.head_id).await {
        Ok(department) => {
            (StatusCode::CREATED, Json(json!({ "department": department }))).into_response()
        }
        Err(e) => error_response(&department_app_error(&e)),
    }
}

/// GET `/admin/departments` - List departments ordered by name.
async fn list_departments(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = DepartmentRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(departments) => Json(json!({ "departments": departments })).into_response(),
        Err(e) => error_response(&department_app_error(&e)),
    }
}

/// GET `/admin/departments/{id}` - Fetch one department.
async fn get_department(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(department_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, FINANCE_OFFICE) {
        return response;
    }

    let repo = DepartmentRepository::new((*state.db).clone());
    match repo.find(department_id).await {
        Ok(department) => Json(json!({ "department": department })).into_response(),
        Err(e) => error_response(&department_app_error(&e)),
    }
}
