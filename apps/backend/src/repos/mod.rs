//! Repository functions for the domain layer. Thin translation over the
//! adapters: raw models become domain models, `DbErr` becomes `DomainError`.

pub mod room_members;
pub mod rooms;
pub mod users;
