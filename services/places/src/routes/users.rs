//! User routes: signup, login, and listing

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use crate::{
    error::ApiError,
    models::{AuthResponse, LoginRequest, NewUser, SignupRequest, UsersResponse},
    state::AppState,
    validation,
};

/// User signup endpoint
///
/// Rejects duplicate emails before any write, hashes the password, and
/// issues a token bound to the new user.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Signup attempt for email: {}", payload.email);

    validation::validate_name(&payload.name).map_err(ApiError::UnprocessableEntity)?;
    validation::validate_email(&payload.email).map_err(ApiError::UnprocessableEntity)?;
    validation::validate_password(&payload.password).map_err(ApiError::UnprocessableEntity)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::UnprocessableEntity(
            "User already exists, please login instead.".to_string(),
        ));
    }

    let new_user = NewUser {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        // A concurrent signup can slip past the pre-check and hit the
        // unique constraint on email instead
        if is_unique_violation(&e) {
            return ApiError::UnprocessableEntity(
                "User already exists, please login instead.".to_string(),
            );
        }
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    let token = state.jwt_service.issue(user.id, &user.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = AuthResponse {
        user_id: user.id,
        email: user.email,
        name: user.name,
        token,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
///
/// Unknown email and wrong password collapse into the same error so the
/// response does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for email: {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InvalidCredentials)?;

    let is_valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !is_valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt_service.issue(user.id, &user.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Login successful for user: {}", user.email);

    let response = AuthResponse {
        user_id: user.id,
        email: user.email,
        name: user.name,
        token,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Get all users, passwords excluded
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to get users: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(UsersResponse { users }))
}

/// Check whether a repository error is a unique-constraint violation
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
