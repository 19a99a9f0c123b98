pub mod admin;
pub mod assignment;
pub mod attendance;
pub mod auth;
pub mod intern;
pub mod manager;
pub mod project;
pub mod task;
pub mod verify;
