//! Integration tests for result submission and the all-reported gate.

mod support;

use backend::error::AppError;
use backend::services::results::ResultService;
use backend::services::rooms::{RoomService, WaitRoomStatus};

use crate::support::factory::{create_room_with_members, create_test_user};
use crate::support::test_state;

const JUDGES: [i32; 5] = [4, 3, 2, 1, 3];

#[tokio::test]
async fn results_stay_empty_until_every_member_reports() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();

    let (room_id, members) = create_room_with_members(&state, 7, 1).await?;

    results
        .submit_result(&state, &members[0].token, room_id, JUDGES, 1200)
        .await?;

    let released = results
        .collect_results(&state, &members[0].token, room_id)
        .await?;
    assert!(released.is_empty());

    // The gate being closed must not have removed the caller.
    let service = RoomService::new();
    let (_, view) = service
        .wait_status(&state, &members[1].token, room_id)
        .await?;
    assert_eq!(view.len(), 2);

    results
        .submit_result(&state, &members[1].token, room_id, JUDGES, 800)
        .await?;

    let released = results
        .collect_results(&state, &members[0].token, room_id)
        .await?;
    assert_eq!(released.len(), 2);

    let mine = released
        .iter()
        .find(|r| r.user_id == members[0].id)
        .expect("own result present");
    assert_eq!(mine.score, 1200);
    assert_eq!(mine.judge_count_list, JUDGES);

    Ok(())
}

#[tokio::test]
async fn collecting_released_results_removes_the_caller() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();
    let service = RoomService::new();

    let (room_id, members) = create_room_with_members(&state, 7, 1).await?;
    for member in &members {
        results
            .submit_result(&state, &member.token, room_id, JUDGES, 999)
            .await?;
    }

    let released = results
        .collect_results(&state, &members[0].token, room_id)
        .await?;
    assert_eq!(released.len(), 2);

    let (_, view) = service
        .wait_status(&state, &members[1].token, room_id)
        .await?;
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].user_id, members[1].id);
    assert!(view[0].is_host, "departing host hands the flag over");

    // The last member fetches what is left and disbands the room.
    let released = results
        .collect_results(&state, &members[1].token, room_id)
        .await?;
    assert_eq!(released.len(), 1);

    let (status, _) = service
        .wait_status(&state, &members[1].token, room_id)
        .await?;
    assert_eq!(status, WaitRoomStatus::Dissolution);

    Ok(())
}

#[tokio::test]
async fn resubmission_silently_overwrites() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();

    let (room_id, members) = create_room_with_members(&state, 7, 0).await?;

    results
        .submit_result(&state, &members[0].token, room_id, JUDGES, 100)
        .await?;
    results
        .submit_result(&state, &members[0].token, room_id, [5, 0, 0, 0, 0], 2500)
        .await?;

    let released = results
        .collect_results(&state, &members[0].token, room_id)
        .await?;
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].score, 2500);
    assert_eq!(released[0].judge_count_list, [5, 0, 0, 0, 0]);

    Ok(())
}

#[tokio::test]
async fn submitting_without_membership_is_not_found() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();

    let (room_id, _members) = create_room_with_members(&state, 7, 0).await?;
    let outsider = create_test_user(&state, "Outsider").await?;

    let outcome = results
        .submit_result(&state, &outsider.token, room_id, JUDGES, 500)
        .await;
    assert!(matches!(
        outcome,
        Err(AppError::NotFound {
            code: "MEMBERSHIP_NOT_FOUND",
            ..
        })
    ));

    Ok(())
}

#[tokio::test]
async fn negative_judge_counts_are_rejected() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();

    let (room_id, members) = create_room_with_members(&state, 7, 0).await?;

    let outcome = results
        .submit_result(&state, &members[0].token, room_id, [4, 3, -1, 1, 3], 500)
        .await;
    assert!(matches!(
        outcome,
        Err(AppError::Validation {
            code: "INVALID_JUDGE_COUNTS",
            ..
        })
    ));

    Ok(())
}

#[tokio::test]
async fn results_for_a_vanished_room_are_empty() -> Result<(), AppError> {
    let state = test_state().await;
    let results = ResultService::new();

    let user = create_test_user(&state, "Ghost").await?;
    let released = results.collect_results(&state, &user.token, 12345).await?;
    assert!(released.is_empty());

    Ok(())
}
