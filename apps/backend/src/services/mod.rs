pub mod results;
pub mod rooms;
pub mod users;
