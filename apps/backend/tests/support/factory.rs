//! Seed-data helpers built on the production code paths: users register
//! through the identity service and rooms are created/joined through the
//! coordinator, so fixtures exercise the same invariants as live traffic.

use backend::db::txn::with_txn;
use backend::entities::room_members::LiveDifficulty;
use backend::services::rooms::{JoinRoomResult, RoomService};
use backend::services::users as users_service;
use backend::{AppError, AppState};

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn create_test_user(state: &AppState, name: &str) -> Result<TestUser, AppError> {
    let user_name = name.to_string();
    let token = with_txn(state, move |txn| {
        Box::pin(async move { users_service::register_user(txn, &user_name, 1000).await })
    })
    .await?;

    let lookup = token.clone();
    let user = with_txn(state, move |txn| {
        Box::pin(async move { users_service::require_user(txn, &lookup).await })
    })
    .await?;

    Ok(TestUser {
        id: user.id,
        token,
    })
}

/// Create a room hosted by a fresh user and join `extra_members` more fresh
/// users. Returns the room id and all members, host first.
pub async fn create_room_with_members(
    state: &AppState,
    live_id: i64,
    extra_members: usize,
) -> Result<(i64, Vec<TestUser>), AppError> {
    let service = RoomService::new();

    let host = create_test_user(state, "Host").await?;
    let room_id = service
        .create_room(state, &host.token, live_id, LiveDifficulty::Normal)
        .await?;

    let mut members = vec![host];
    for i in 0..extra_members {
        let member = create_test_user(state, &format!("Member {i}")).await?;
        let result = service
            .join_room(state, &member.token, room_id, LiveDifficulty::Normal)
            .await?;
        assert_eq!(result, JoinRoomResult::Ok, "seed join should succeed");
        members.push(member);
    }

    Ok((room_id, members))
}
