//! Identity service: registration, token resolution, profile updates.
//!
//! Tokens are opaque UUIDv4 strings. The store enforces uniqueness; on the
//! (astronomically unlikely) collision, registration retries with a fresh
//! token.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::users::{self as users_repo, User};

const TOKEN_ISSUE_ATTEMPTS: u32 = 3;

/// Create a new user and return their bearer token.
pub async fn register_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    leader_card_id: i32,
) -> Result<String, AppError> {
    for attempt in 1..=TOKEN_ISSUE_ATTEMPTS {
        let token = Uuid::new_v4().to_string();
        match users_repo::create_user(conn, name, leader_card_id, &token).await {
            Ok(user) => {
                info!(user_id = user.id, "user registered");
                return Ok(token);
            }
            Err(DomainError::Conflict(ConflictKind::UniqueToken, _))
                if attempt < TOKEN_ISSUE_ATTEMPTS =>
            {
                warn!(attempt, "token collision on registration, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(AppError::internal(
        "could not issue a unique token".to_string(),
    ))
}

/// Resolve a bearer token to its user, or fail with `Unauthenticated`.
pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<User, AppError> {
    users_repo::find_by_token(conn, token)
        .await?
        .ok_or_else(AppError::unauthorized)
}

/// Update the caller's display name and leader card.
pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
    name: &str,
    leader_card_id: i32,
) -> Result<(), AppError> {
    let user = require_user(conn, token).await?;
    users_repo::update_profile(conn, user.id, name, leader_card_id).await?;
    Ok(())
}
