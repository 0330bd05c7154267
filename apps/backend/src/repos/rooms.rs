//! Room repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::rooms_sea as rooms_adapter;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Room domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub live_id: i64,
    pub started: bool,
    pub version: i32,
}

impl From<crate::entities::rooms::Model> for Room {
    fn from(model: crate::entities::rooms::Model) -> Self {
        Self {
            id: model.id,
            live_id: model.live_id,
            started: model.started,
            version: model.version,
        }
    }
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    live_id: i64,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::create_room(conn, live_id)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<Room>, DomainError> {
    let room = rooms_adapter::find_by_id(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(room.map(Room::from))
}

pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::require_room(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}

pub async fn find_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    live_id: Option<i64>,
) -> Result<Vec<Room>, DomainError> {
    let rooms = rooms_adapter::find_open(conn, live_id)
        .await
        .map_err(map_db_err)?;
    Ok(rooms.into_iter().map(Room::from).collect())
}

pub async fn set_started<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), DomainError> {
    rooms_adapter::set_started(conn, room_id)
        .await
        .map_err(map_db_err)
}

pub async fn delete_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<(), DomainError> {
    rooms_adapter::delete_room(conn, room_id)
        .await
        .map_err(map_db_err)
}

/// Conditional version bump; fails with an optimistic-lock conflict when a
/// concurrent transaction already moved the room.
pub async fn touch_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    expected_version: i32,
) -> Result<Room, DomainError> {
    let room = rooms_adapter::touch_room(conn, room_id, expected_version)
        .await
        .map_err(map_db_err)?;
    Ok(Room::from(room))
}
