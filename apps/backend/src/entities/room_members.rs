use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Song difficulty selected by a member when creating or joining a room.
/// Stored as its numeric wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum LiveDifficulty {
    #[sea_orm(num_value = 1)]
    Normal,
    #[sea_orm(num_value = 2)]
    Hard,
}

impl LiveDifficulty {
    pub fn code(self) -> i32 {
        match self {
            LiveDifficulty::Normal => 1,
            LiveDifficulty::Hard => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(LiveDifficulty::Normal),
            2 => Some(LiveDifficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "room_id")]
    pub room_id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    pub difficulty: LiveDifficulty,
    #[sea_orm(column_name = "is_host")]
    pub is_host: bool,
    /// NULL until the member submits end-of-play results.
    pub score: Option<i32>,
    #[sea_orm(column_name = "judge_perfect")]
    pub judge_perfect: Option<i32>,
    #[sea_orm(column_name = "judge_great")]
    pub judge_great: Option<i32>,
    #[sea_orm(column_name = "judge_good")]
    pub judge_good: Option<i32>,
    #[sea_orm(column_name = "judge_bad")]
    pub judge_bad: Option<i32>,
    #[sea_orm(column_name = "judge_miss")]
    pub judge_miss: Option<i32>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::LiveDifficulty;

    #[test]
    fn difficulty_round_trips_through_wire_codes() {
        assert_eq!(LiveDifficulty::from_code(1), Some(LiveDifficulty::Normal));
        assert_eq!(LiveDifficulty::from_code(2), Some(LiveDifficulty::Hard));
        assert_eq!(LiveDifficulty::from_code(0), None);
        assert_eq!(LiveDifficulty::from_code(3), None);
        assert_eq!(LiveDifficulty::Normal.code(), 1);
        assert_eq!(LiveDifficulty::Hard.code(), 2);
    }
}
