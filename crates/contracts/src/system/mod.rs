pub mod auth;
pub mod scheduler;
pub mod users;
