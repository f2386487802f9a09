//! Places service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::{middleware::auth_middleware, state::AppState};

pub mod places;
pub mod upload;
pub mod users;

/// Ceiling for uploaded image payloads
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Create the router for the places service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/places", post(places::create_place))
        .route(
            "/places/:id",
            patch(places::update_place).delete(places::delete_place),
        )
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let images_dir = state.upload_config.upload_dir.join("images");

    Router::new()
        .route("/health", get(health_check))
        .route("/places", get(places::get_places))
        .route("/places/:id", get(places::get_place))
        .route("/places/user/:uid", get(places::get_places_by_user))
        .route("/users/signup", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/users", get(users::get_users))
        .merge(protected_routes)
        .nest_service("/uploads/images", ServeDir::new(images_dir))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let status = if database { "ok" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "service": "places-service"
    }))
}
