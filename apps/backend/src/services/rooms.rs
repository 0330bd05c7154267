//! Room coordinator: creation, listing, join/leave, host transfer and the
//! waiting/live transition.
//!
//! Every multi-step operation runs in a single transaction. Mutating
//! operations end with a conditional version bump on the room row
//! (`touch_room`), so concurrent transactions on the same room serialize:
//! the loser rolls back and is retried by `run_serialized`, re-reading
//! fresh state. Operations on distinct rooms never contend.

use sea_orm::DatabaseTransaction;
use tracing::info;

use crate::db::retry::run_serialized;
use crate::db::txn::with_txn;
use crate::entities::room_members::LiveDifficulty;
use crate::error::AppError;
use crate::repos::{room_members, rooms};
use crate::services::users::require_user;
use crate::state::app_state::AppState;

/// Default room capacity.
pub const DEFAULT_MAX_MEMBERS: usize = 4;

/// Outcome of a join attempt. Expected capacity outcomes are values, not
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRoomResult {
    Ok,
    RoomFull,
    Disbanded,
    OtherError,
}

impl JoinRoomResult {
    pub fn code(self) -> i32 {
        match self {
            JoinRoomResult::Ok => 1,
            JoinRoomResult::RoomFull => 2,
            JoinRoomResult::Disbanded => 3,
            JoinRoomResult::OtherError => 4,
        }
    }
}

/// Room status as seen by a polling member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitRoomStatus {
    Waiting,
    LiveStart,
    Dissolution,
}

impl WaitRoomStatus {
    pub fn code(self) -> i32 {
        match self {
            WaitRoomStatus::Waiting => 1,
            WaitRoomStatus::LiveStart => 2,
            WaitRoomStatus::Dissolution => 3,
        }
    }
}

/// Joinable-room summary returned by ListRooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: i64,
    pub live_id: i64,
    pub joined_user_count: u32,
    pub max_user_count: u32,
}

/// One row of the membership view, resolved per request and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomUser {
    pub user_id: i64,
    pub name: String,
    pub leader_card_id: i32,
    pub select_difficulty: LiveDifficulty,
    pub is_me: bool,
    pub is_host: bool,
}

/// Room lifecycle coordinator. Capacity is injected configuration, not
/// process-global state.
pub struct RoomService {
    max_members: usize,
}

impl RoomService {
    pub fn new() -> Self {
        Self {
            max_members: DEFAULT_MAX_MEMBERS,
        }
    }

    pub fn with_capacity(max_members: usize) -> Self {
        Self { max_members }
    }

    /// Create a room for `live_id` with the caller as host. Room and host
    /// membership are inserted in one transaction; a room never exists
    /// without members.
    pub async fn create_room(
        &self,
        state: &AppState,
        token: &str,
        live_id: i64,
        difficulty: LiveDifficulty,
    ) -> Result<i64, AppError> {
        let token = token.to_owned();
        with_txn(state, move |txn| {
            Box::pin(async move {
                let user = require_user(txn, &token).await?;
                let room = rooms::create_room(txn, live_id).await?;
                room_members::create_member(txn, room.id, user.id, difficulty, true).await?;
                info!(room_id = room.id, user_id = user.id, live_id, "room created");
                Ok(room.id)
            })
        })
        .await
    }

    /// List rooms that can still be joined: not started and not full.
    /// `live_id == 0` is the wildcard for "all songs".
    pub async fn list_rooms(&self, state: &AppState, live_id: i64) -> Result<Vec<RoomInfo>, AppError> {
        let max_members = self.max_members;
        with_txn(state, |txn| {
            Box::pin(async move {
                let filter = if live_id == 0 { None } else { Some(live_id) };
                let open_rooms = rooms::find_open(txn, filter).await?;

                let mut room_info_list = Vec::with_capacity(open_rooms.len());
                for room in open_rooms {
                    let joined = room_members::count_by_room(txn, room.id).await? as usize;
                    if joined >= max_members {
                        continue;
                    }
                    room_info_list.push(RoomInfo {
                        room_id: room.id,
                        live_id: room.live_id,
                        joined_user_count: joined as u32,
                        max_user_count: max_members as u32,
                    });
                }
                Ok(room_info_list)
            })
        })
        .await
    }

    /// Join `room_id` at `difficulty`. The member count check and the
    /// insert share one transaction; the final version bump catches any
    /// concurrent join/leave that would break the capacity invariant.
    pub async fn join_room(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
        difficulty: LiveDifficulty,
    ) -> Result<JoinRoomResult, AppError> {
        let max_members = self.max_members;
        let token = token.to_owned();
        let outcome = run_serialized(|| {
            let token = token.clone();
            with_txn(state, move |txn| {
                Box::pin(async move {
                    let user = require_user(txn, &token).await?;
                    Self::join_room_txn(txn, user.id, room_id, difficulty, max_members).await
                })
            })
        })
        .await;

        match outcome {
            // The room vanished between our reads and the version bump:
            // the last member left concurrently. Same answer as finding it
            // already gone.
            Err(AppError::NotFound {
                code: "ROOM_NOT_FOUND",
                ..
            }) => Ok(JoinRoomResult::Disbanded),
            other => other,
        }
    }

    async fn join_room_txn(
        txn: &DatabaseTransaction,
        user_id: i64,
        room_id: i64,
        difficulty: LiveDifficulty,
        max_members: usize,
    ) -> Result<JoinRoomResult, AppError> {
        let Some(room) = rooms::find_by_id(txn, room_id).await? else {
            return Ok(JoinRoomResult::Disbanded);
        };

        let joined = room_members::count_by_room(txn, room_id).await? as usize;
        if joined == 0 {
            return Ok(JoinRoomResult::Disbanded);
        }
        if joined >= max_members {
            return Ok(JoinRoomResult::RoomFull);
        }
        if room_members::find_membership(txn, room_id, user_id)
            .await?
            .is_some()
        {
            return Ok(JoinRoomResult::OtherError);
        }

        room_members::create_member(txn, room_id, user_id, difficulty, false).await?;
        rooms::touch_room(txn, room_id, room.version).await?;
        info!(room_id, user_id, "user joined room");
        Ok(JoinRoomResult::Ok)
    }

    /// Polling primitive: room status plus the membership view. Pure read,
    /// safe to call at high frequency.
    pub async fn wait_status(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
    ) -> Result<(WaitRoomStatus, Vec<RoomUser>), AppError> {
        let token = token.to_owned();
        with_txn(state, move |txn| {
            Box::pin(async move {
                let user = require_user(txn, &token).await?;

                let Some(room) = rooms::find_by_id(txn, room_id).await? else {
                    return Ok((WaitRoomStatus::Dissolution, Vec::new()));
                };
                let status = if room.started {
                    WaitRoomStatus::LiveStart
                } else {
                    WaitRoomStatus::Waiting
                };

                let rows = room_members::find_all_by_room_with_users(txn, room_id).await?;
                let room_user_list = rows
                    .into_iter()
                    .map(|row| RoomUser {
                        user_id: row.member.user_id,
                        name: row.name,
                        leader_card_id: row.leader_card_id,
                        select_difficulty: row.member.difficulty,
                        is_me: row.member.user_id == user.id,
                        is_host: row.member.is_host,
                    })
                    .collect();

                Ok((status, room_user_list))
            })
        })
        .await
    }

    /// Flip the room to live. Any authenticated caller may start; clients
    /// are expected to only invoke this as host, and the reference
    /// behavior performs no host check.
    pub async fn start_room(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
    ) -> Result<(), AppError> {
        let token = token.to_owned();
        with_txn(state, move |txn| {
            Box::pin(async move {
                require_user(txn, &token).await?;
                rooms::set_started(txn, room_id).await?;
                info!(room_id, "room started");
                Ok(())
            })
        })
        .await
    }

    /// Leave `room_id`: disband if the caller is the last member, transfer
    /// host first if they hold it.
    pub async fn leave_room(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
    ) -> Result<(), AppError> {
        let token = token.to_owned();
        run_serialized(|| {
            let token = token.clone();
            with_txn(state, move |txn| {
                Box::pin(async move {
                    let user = require_user(txn, &token).await?;
                    leave_room_txn(txn, room_id, user.id).await
                })
            })
        })
        .await
    }
}

impl Default for RoomService {
    fn default() -> Self {
        Self::new()
    }
}

/// Transactional core of LeaveRoom, shared with the result aggregator
/// (fetching final results removes the caller from the room).
///
/// Three branches plus the final member-row deletion, all in the caller's
/// transaction so no concurrent join/leave observes zero or two hosts:
/// - sole member: delete the room (and the membership row),
/// - departing host: hand `is_host` to the first remaining member in join
///   order,
/// - otherwise: just drop the membership row.
pub(crate) async fn leave_room_txn(
    txn: &DatabaseTransaction,
    room_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    let Some(room) = rooms::find_by_id(txn, room_id).await? else {
        // Already disbanded by a concurrent leave; nothing to do.
        return Ok(());
    };

    let members = room_members::find_all_by_room(txn, room_id).await?;
    let Some(me) = members.iter().find(|m| m.user_id == user_id) else {
        return Ok(());
    };

    if members.len() == 1 {
        room_members::delete_member(txn, me.id).await?;
        rooms::delete_room(txn, room_id).await?;
        info!(room_id, user_id, "last member left, room disbanded");
        return Ok(());
    }

    if me.is_host {
        let successor = members
            .iter()
            .find(|m| m.user_id != user_id)
            .ok_or_else(|| {
                AppError::internal(format!("room {room_id} has multiple members but no successor"))
            })?;
        room_members::set_host(txn, successor.id).await?;
        info!(
            room_id,
            from_user = user_id,
            to_user = successor.user_id,
            "host transferred"
        );
    }

    room_members::delete_member(txn, me.id).await?;
    rooms::touch_room(txn, room_id, room.version).await?;
    info!(room_id, user_id, "user left room");
    Ok(())
}
