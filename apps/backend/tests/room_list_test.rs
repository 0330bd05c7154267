//! Integration tests for the joinable-room listing contract.

mod support;

use backend::entities::room_members::LiveDifficulty;
use backend::error::AppError;
use backend::services::rooms::RoomService;

use crate::support::factory::{create_room_with_members, create_test_user};
use crate::support::test_state;

#[tokio::test]
async fn list_filters_by_live_id() -> Result<(), AppError> {
    let state = test_state().await;
    let service = RoomService::new();

    let (room_a, _) = create_room_with_members(&state, 100, 0).await?;
    let (room_b, _) = create_room_with_members(&state, 200, 1).await?;

    let rooms = service.list_rooms(&state, 100).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, room_a);
    assert_eq!(rooms[0].live_id, 100);
    assert_eq!(rooms[0].joined_user_count, 1);
    assert_eq!(rooms[0].max_user_count, 4);

    let rooms = service.list_rooms(&state, 200).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, room_b);
    assert_eq!(rooms[0].joined_user_count, 2);

    Ok(())
}

#[tokio::test]
async fn live_id_zero_is_a_wildcard_across_songs() -> Result<(), AppError> {
    let state = test_state().await;
    let service = RoomService::new();

    let (room_a, _) = create_room_with_members(&state, 100, 0).await?;
    let (room_b, _) = create_room_with_members(&state, 200, 0).await?;

    let mut listed: Vec<i64> = service
        .list_rooms(&state, 0)
        .await?
        .into_iter()
        .map(|r| r.room_id)
        .collect();
    listed.sort_unstable();
    assert_eq!(listed, vec![room_a, room_b]);

    // Each summary reports the room's own song, not the wildcard.
    let lives: Vec<i64> = service
        .list_rooms(&state, 0)
        .await?
        .into_iter()
        .map(|r| r.live_id)
        .collect();
    assert!(lives.contains(&100) && lives.contains(&200));

    Ok(())
}

#[tokio::test]
async fn full_rooms_are_excluded() -> Result<(), AppError> {
    let state = test_state().await;
    let service = RoomService::new();

    let (_full_room, _) = create_room_with_members(&state, 300, 3).await?;
    let (open_room, _) = create_room_with_members(&state, 300, 2).await?;

    let rooms = service.list_rooms(&state, 300).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, open_room);
    assert_eq!(rooms[0].joined_user_count, 3);

    Ok(())
}

#[tokio::test]
async fn started_rooms_are_excluded() -> Result<(), AppError> {
    let state = test_state().await;
    let service = RoomService::new();

    let (started_room, members) = create_room_with_members(&state, 400, 1).await?;
    let (waiting_room, _) = create_room_with_members(&state, 400, 1).await?;

    service
        .start_room(&state, &members[0].token, started_room)
        .await?;

    let rooms = service.list_rooms(&state, 400).await?;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, waiting_room);

    Ok(())
}

#[tokio::test]
async fn disbanded_rooms_never_show_up() -> Result<(), AppError> {
    let state = test_state().await;
    let service = RoomService::new();

    let solo = create_test_user(&state, "Solo").await?;
    let room_id = service
        .create_room(&state, &solo.token, 500, LiveDifficulty::Normal)
        .await?;
    service.leave_room(&state, &solo.token, room_id).await?;

    let rooms = service.list_rooms(&state, 500).await?;
    assert!(rooms.is_empty());

    Ok(())
}
