//! Result aggregator: per-member score recording and the all-reported gate
//! that releases the final list.

use sea_orm::DatabaseTransaction;
use tracing::info;

use crate::db::retry::run_serialized;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::room_members;
use crate::services::rooms::leave_room_txn;
use crate::services::users::require_user;
use crate::state::app_state::AppState;

/// One member's released result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultUser {
    pub user_id: i64,
    pub judge_count_list: [i32; 5],
    pub score: i32,
}

pub struct ResultService;

impl ResultService {
    pub fn new() -> Self {
        Self
    }

    /// Record the caller's score and judge counts. A second submission
    /// silently overwrites the first; the write is a plain idempotent
    /// update.
    pub async fn submit_result(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
        judge_count_list: [i32; 5],
        score: i32,
    ) -> Result<(), AppError> {
        if judge_count_list.iter().any(|&c| c < 0) {
            return Err(AppError::invalid(
                "INVALID_JUDGE_COUNTS",
                "judge counts must be non-negative".to_string(),
            ));
        }

        let token = token.to_owned();
        with_txn(state, move |txn| {
            Box::pin(async move {
                let user = require_user(txn, &token).await?;
                let membership = room_members::find_membership(txn, room_id, user.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::from(DomainError::not_found(
                            NotFoundKind::Membership,
                            format!("user {} is not a member of room {room_id}", user.id),
                        ))
                    })?;

                room_members::set_result(txn, membership.id, score, judge_count_list).await?;
                info!(room_id, user_id = user.id, score, "result submitted");
                Ok(())
            })
        })
        .await
    }

    /// Fetch the final results for the room. All-or-nothing: while any
    /// member has not reported, the list is empty. Once the full list is
    /// released to the caller, their participation ends and they leave the
    /// room in the same transaction (possibly transferring host or
    /// disbanding the room).
    pub async fn collect_results(
        &self,
        state: &AppState,
        token: &str,
        room_id: i64,
    ) -> Result<Vec<ResultUser>, AppError> {
        let token = token.to_owned();
        run_serialized(|| {
            let token = token.clone();
            with_txn(state, move |txn| {
                Box::pin(async move {
                    let user = require_user(txn, &token).await?;

                    match fetch_results_txn(txn, room_id).await? {
                        Some(result_user_list) => {
                            // Receiving the final list is the completion
                            // event; the coordinator turns it into a leave.
                            leave_room_txn(txn, room_id, user.id).await?;
                            info!(
                                room_id,
                                user_id = user.id,
                                members = result_user_list.len(),
                                "results released"
                            );
                            Ok(result_user_list)
                        }
                        None => Ok(Vec::new()),
                    }
                })
            })
        })
        .await
    }
}

impl Default for ResultService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure gating read: `Some(results)` once every member has reported,
/// `None` while the gate is closed (or the room no longer exists).
async fn fetch_results_txn(
    txn: &DatabaseTransaction,
    room_id: i64,
) -> Result<Option<Vec<ResultUser>>, AppError> {
    let members = room_members::find_all_by_room(txn, room_id).await?;
    if members.is_empty() {
        return Ok(None);
    }

    let mut result_user_list = Vec::with_capacity(members.len());
    for member in &members {
        match (member.score, member.judges) {
            (Some(score), Some(judge_count_list)) => result_user_list.push(ResultUser {
                user_id: member.user_id,
                judge_count_list,
                score,
            }),
            _ => return Ok(None),
        }
    }
    Ok(Some(result_user_list))
}
