//! SeaORM adapter for the user repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::users;

pub struct UserCreate {
    pub name: String,
    pub token: String,
    pub leader_card_id: i32,
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        token: Set(dto.token),
        leader_card_id: Set(dto.leader_card_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    user_active.insert(conn).await
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Token.eq(token))
        .one(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: String,
    leader_card_id: i32,
) -> Result<users::Model, sea_orm::DbErr> {
    let user_active = users::ActiveModel {
        id: Set(user_id),
        name: Set(name),
        token: NotSet,
        leader_card_id: Set(leader_card_id),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    user_active.update(conn).await
}
