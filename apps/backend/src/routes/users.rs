//! User-facing identity routes.

use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::services::users as users_service;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
struct UserCreateRequest {
    user_name: String,
    leader_card_id: i32,
}

#[derive(Serialize)]
struct UserCreateResponse {
    user_token: String,
}

#[derive(Serialize)]
struct UserResponse {
    id: i64,
    name: String,
    leader_card_id: i32,
}

#[derive(Serialize)]
struct Empty {}

/// POST /api/user/create
async fn user_create(
    state: web::Data<AppState>,
    req: web::Json<UserCreateRequest>,
) -> Result<web::Json<UserCreateResponse>, AppError> {
    let body = req.into_inner();

    let user_token = with_txn(&state, move |txn| {
        Box::pin(async move {
            users_service::register_user(txn, &body.user_name, body.leader_card_id).await
        })
    })
    .await?;

    Ok(web::Json(UserCreateResponse { user_token }))
}

/// GET /api/user/me
async fn user_me(
    state: web::Data<AppState>,
    auth: AuthToken,
) -> Result<web::Json<UserResponse>, AppError> {
    let user = with_txn(&state, move |txn| {
        Box::pin(async move { users_service::require_user(txn, &auth.token).await })
    })
    .await?;

    Ok(web::Json(UserResponse {
        id: user.id,
        name: user.name,
        leader_card_id: user.leader_card_id,
    }))
}

/// POST /api/user/update
async fn user_update(
    state: web::Data<AppState>,
    auth: AuthToken,
    req: web::Json<UserCreateRequest>,
) -> Result<web::Json<Empty>, AppError> {
    let body = req.into_inner();

    with_txn(&state, move |txn| {
        Box::pin(async move {
            users_service::update_profile(txn, &auth.token, &body.user_name, body.leader_card_id)
                .await
        })
    })
    .await?;

    Ok(web::Json(Empty {}))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(user_create))
        .route("/me", web::get().to(user_me))
        .route("/update", web::post().to(user_update));
}
