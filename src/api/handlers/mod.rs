pub mod activity;
pub mod archive;
pub mod auth;
pub mod booking;
pub mod health;
pub mod opening_hour;
pub mod timetable;
