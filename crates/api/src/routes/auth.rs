//! Authentication routes.
//!
//! Token issuance is deliberately thin: a login endpoint returning a
//! bearer token. Sessions and refresh tokens are not modeled.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use tracing::{error, info};

use crate::{AppState, routes::error_response};
use unifin_core::auth::verify_password;
use unifin_db::UserRepository;
use unifin_db::repositories::user::UserError;
use unifin_shared::AppError;
use unifin_shared::auth::{LoginRequest, LoginResponse, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST `/auth/login` - Authenticate a user and return a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(u) => u,
        Err(UserError::NotFound) => {
            info!(email = %payload.email, "login attempt for unknown user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "password verification error");
            return internal_error();
        }
    }

    let role = sea_orm::ActiveEnum::to_value(&user.role);

    let access_token = match state.jwt_service.generate_access_token(user.id, &role) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "failed to generate access token");
            return internal_error();
        }
    };

    Json(LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.full_name,
            role,
            department_id: user.department_id,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
    .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    error_response(&AppError::Unauthorized(
        "Invalid email or password".to_string(),
    ))
}

fn internal_error() -> axum::response::Response {
    error_response(&AppError::Internal(
        "An error occurred during login".to_string(),
    ))
}
