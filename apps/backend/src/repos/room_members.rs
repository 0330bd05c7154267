//! Room membership repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::room_members_sea as members_adapter;
use crate::entities::room_members::LiveDifficulty;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Room membership domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub difficulty: LiveDifficulty,
    pub is_host: bool,
    pub score: Option<i32>,
    pub judges: Option<[i32; 5]>,
}

impl RoomMember {
    /// A member counts as reported once their score is set; judge counts are
    /// written in the same update.
    pub fn has_reported(&self) -> bool {
        self.score.is_some()
    }
}

impl From<crate::entities::room_members::Model> for RoomMember {
    fn from(model: crate::entities::room_members::Model) -> Self {
        let judges = match (
            model.judge_perfect,
            model.judge_great,
            model.judge_good,
            model.judge_bad,
            model.judge_miss,
        ) {
            (Some(p), Some(gr), Some(go), Some(b), Some(m)) => Some([p, gr, go, b, m]),
            _ => None,
        };
        Self {
            id: model.id,
            room_id: model.room_id,
            user_id: model.user_id,
            difficulty: model.difficulty,
            is_host: model.is_host,
            score: model.score,
            judges,
        }
    }
}

/// A member joined with the resolved user identity, for membership views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithUser {
    pub member: RoomMember,
    pub name: String,
    pub leader_card_id: i32,
}

pub async fn create_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
    difficulty: LiveDifficulty,
    is_host: bool,
) -> Result<RoomMember, DomainError> {
    let dto = members_adapter::MemberCreate {
        room_id,
        user_id,
        difficulty,
        is_host,
    };
    let member = members_adapter::create_member(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(RoomMember::from(member))
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    user_id: i64,
) -> Result<Option<RoomMember>, DomainError> {
    let member = members_adapter::find_membership(conn, room_id, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(member.map(RoomMember::from))
}

pub async fn find_all_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<RoomMember>, DomainError> {
    let members = members_adapter::find_all_by_room(conn, room_id)
        .await
        .map_err(map_db_err)?;
    Ok(members.into_iter().map(RoomMember::from).collect())
}

/// Membership view rows: each member resolved to their user record. A
/// dangling membership (user row missing) would be a referential integrity
/// breach, surfaced as an infra error rather than silently skipped.
pub async fn find_all_by_room_with_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<MemberWithUser>, DomainError> {
    let rows = members_adapter::find_all_by_room_with_users(conn, room_id)
        .await
        .map_err(map_db_err)?;

    rows.into_iter()
        .map(|(member, user)| {
            let user = user.ok_or_else(|| {
                DomainError::infra(
                    crate::errors::domain::InfraErrorKind::Other("DanglingMembership".into()),
                    format!("member {} has no user record", member.id),
                )
            })?;
            Ok(MemberWithUser {
                member: RoomMember::from(member),
                name: user.name,
                leader_card_id: user.leader_card_id,
            })
        })
        .collect()
}

pub async fn count_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, DomainError> {
    members_adapter::count_by_room(conn, room_id)
        .await
        .map_err(map_db_err)
}

pub async fn set_host<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<(), DomainError> {
    members_adapter::set_host(conn, member_id)
        .await
        .map_err(map_db_err)
}

pub async fn set_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    score: i32,
    judges: [i32; 5],
) -> Result<RoomMember, DomainError> {
    let member = members_adapter::set_result(conn, member_id, score, judges)
        .await
        .map_err(map_db_err)?;
    Ok(RoomMember::from(member))
}

pub async fn delete_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<(), DomainError> {
    members_adapter::delete_member(conn, member_id)
        .await
        .map_err(map_db_err)
}
