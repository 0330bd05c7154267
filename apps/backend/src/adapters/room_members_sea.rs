//! SeaORM adapter for the room membership repository.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::room_members::LiveDifficulty;
use crate::entities::{room_members, users};

pub struct MemberCreate {
    pub room_id: i64,
    pub user_id: i64,
    pub difficulty: LiveDifficulty,
    pub is_host: bool,
}

pub async fn create_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MemberCreate,
) -> Result<room_members::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let member_active = room_members::ActiveModel {
        id: NotSet,
        room_id: Set(dto.room_id),
        user_id: Set(dto.user_id),
        difficulty: Set(dto.difficulty),
        is_host: Set(dto.is_host),
        score: NotSet,
        judge_perfect: NotSet,
        judge_great: NotSet,
        judge_good: NotSet,
        judge_bad: NotSet,
        judge_miss: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
    };
    member_active.insert(conn).await
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
) -> Result<Option<room_members::Model>, sea_orm::DbErr> {
    room_members::Entity::find()
        .filter(room_members::Column::RoomId.eq(room_id))
        .filter(room_members::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Members in join order. The deterministic ordering is what makes host
/// transfer pick "the first remaining member".
pub async fn find_all_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<room_members::Model>, sea_orm::DbErr> {
    room_members::Entity::find()
        .filter(room_members::Column::RoomId.eq(room_id))
        .order_by_asc(room_members::Column::Id)
        .all(conn)
        .await
}

/// Members joined with their user records, for the membership view.
pub async fn find_all_by_room_with_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<(room_members::Model, Option<users::Model>)>, sea_orm::DbErr> {
    room_members::Entity::find()
        .filter(room_members::Column::RoomId.eq(room_id))
        .order_by_asc(room_members::Column::Id)
        .find_also_related(users::Entity)
        .all(conn)
        .await
}

pub async fn count_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    room_members::Entity::find()
        .filter(room_members::Column::RoomId.eq(room_id))
        .count(conn)
        .await
}

pub async fn set_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<(), sea_orm::DbErr> {
    room_members::Entity::update_many()
        .col_expr(room_members::Column::IsHost, Expr::val(true).into())
        .col_expr(
            room_members::Column::UpdatedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(room_members::Column::Id.eq(member_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    score: i32,
    judges: [i32; 5],
) -> Result<room_members::Model, sea_orm::DbErr> {
    let member_active = room_members::ActiveModel {
        id: Set(member_id),
        room_id: NotSet,
        user_id: NotSet,
        difficulty: NotSet,
        is_host: NotSet,
        score: Set(Some(score)),
        judge_perfect: Set(Some(judges[0])),
        judge_great: Set(Some(judges[1])),
        judge_good: Set(Some(judges[2])),
        judge_bad: Set(Some(judges[3])),
        judge_miss: Set(Some(judges[4])),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };
    member_active.update(conn).await
}

pub async fn delete_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<(), sea_orm::DbErr> {
    room_members::Entity::delete_many()
        .filter(room_members::Column::Id.eq(member_id))
        .exec(conn)
        .await?;
    Ok(())
}
