//! User repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// User domain model. The bearer token is deliberately absent: membership
/// views and result listings must never expose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub leader_card_id: i32,
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            leader_card_id: model.leader_card_id,
        }
    }
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    leader_card_id: i32,
    token: &str,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate {
        name: name.to_string(),
        token: token.to_string(),
        leader_card_id,
    };
    let user = users_adapter::create_user(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(User::from(user))
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_token(conn, token)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
    leader_card_id: i32,
) -> Result<User, DomainError> {
    let user = users_adapter::update_profile(conn, user_id, name.to_string(), leader_card_id)
        .await
        .map_err(map_db_err)?;
    Ok(User::from(user))
}
