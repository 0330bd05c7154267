//! SeaORM adapter for the room repository - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::rooms;

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    live_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let room_active = rooms::ActiveModel {
        id: NotSet,
        live_id: Set(live_id),
        started: Set(false),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    room_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find_by_id(room_id).one(conn).await
}

/// Find room by ID or return a structured not-found error.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<rooms::Model, sea_orm::DbErr> {
    find_by_id(conn, room_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{room_id}")))
}

/// Rooms that have not started yet. `live_id == None` means all songs.
/// Capacity filtering happens in the repos layer where member counts live.
pub async fn find_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    live_id: Option<i64>,
) -> Result<Vec<rooms::Model>, sea_orm::DbErr> {
    let mut query = rooms::Entity::find().filter(rooms::Column::Started.eq(false));
    if let Some(live_id) = live_id {
        query = query.filter(rooms::Column::LiveId.eq(live_id));
    }
    query.all(conn).await
}

pub async fn set_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), sea_orm::DbErr> {
    rooms::Entity::update_many()
        .col_expr(rooms::Column::Started, Expr::val(true).into())
        .col_expr(
            rooms::Column::UpdatedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(rooms::Column::Id.eq(room_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn delete_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), sea_orm::DbErr> {
    rooms::Entity::delete_many()
        .filter(rooms::Column::Id.eq(room_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Bump the room version with an optimistic-lock check, then refetch.
///
/// Filters on id and the caller's expected version; `rows_affected == 0`
/// distinguishes NotFound from a lock conflict. Mutating room operations
/// call this last so concurrent transactions on the same room serialize.
pub async fn touch_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    expected_version: i32,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = rooms::Entity::update_many()
        .col_expr(rooms::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            rooms::Column::Version,
            Expr::col(rooms::Column::Version).add(1),
        )
        .filter(rooms::Column::Id.eq(room_id))
        .filter(rooms::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the room doesn't exist or the version doesn't match.
        let room = rooms::Entity::find_by_id(room_id).one(conn).await?;
        if let Some(room) = room {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, room.version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{room_id}")));
        }
    }

    rooms::Entity::find_by_id(room_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{room_id}")))
}
