//! SeaORM adapters. Functions here return raw `sea_orm::DbErr`; the repos
//! layer translates to `DomainError` via `map_db_err`.

pub mod room_members_sea;
pub mod rooms_sea;
pub mod users_sea;
