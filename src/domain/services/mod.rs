pub mod archival;
pub mod auth_service;
pub mod capacity;
pub mod timetable;
