pub mod activity;
pub mod archive;
pub mod auth;
pub mod booking;
pub mod opening_hour;
pub mod session;
pub mod user;
