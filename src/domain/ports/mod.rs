use crate::domain::models::{
    activity::Activity,
    archive::{HistoricalBooking, HistoricalSession},
    booking::Booking,
    opening_hour::OpeningHour,
    session::Session,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn create(&self, activity: &Activity) -> Result<Activity, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>, AppError>;
    async fn list(&self) -> Result<Vec<Activity>, AppError>;
    async fn update(&self, activity: &Activity) -> Result<Activity, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OpeningHourRepository: Send + Sync {
    async fn create(&self, window: &OpeningHour) -> Result<OpeningHour, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<OpeningHour>, AppError>;
    async fn list(&self) -> Result<Vec<OpeningHour>, AppError>;
    async fn list_by_day(&self, day: &str) -> Result<Vec<OpeningHour>, AppError>;
    async fn update(&self, window: &OpeningHour) -> Result<OpeningHour, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert any of the given empty slot rows that do not exist yet.
    /// Existing rows are left untouched. Returns the number created.
    async fn ensure_slots(&self, sessions: &[Session]) -> Result<u64, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;
    async fn list_all(&self) -> Result<Vec<Session>, AppError>;
    async fn list_by_day(&self, day: &str) -> Result<Vec<Session>, AppError>;
    async fn list_by_activity(&self, activity_id: &str) -> Result<Vec<Session>, AppError>;
    /// Assign the activity to every named slot of the day in one transaction.
    /// Fails without touching anything if any slot is missing or already
    /// assigned.
    async fn assign_activity(&self, day: &str, slots: &[String], activity_id: &str) -> Result<Vec<Session>, AppError>;
    /// Clear one slot's activity. Refuses if live bookings exist unless
    /// `force`, in which case the bookings are deleted in the same
    /// transaction.
    async fn clear_activity(&self, day: &str, start_time: &str, force: bool) -> Result<Session, AppError>;
    async fn count_by_activity(&self, activity_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert the booking. When `enforce_capacity` the session's occupancy is
    /// re-derived and checked inside the same transaction that writes, under
    /// a lock on the session row.
    async fn create(&self, booking: &Booking, enforce_capacity: bool) -> Result<Booking, AppError>;
    /// Update guest fields and party size. Capacity re-validation excludes
    /// the booking's own prior contribution.
    async fn update(&self, booking: &Booking, enforce_capacity: bool) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn occupancy(&self, session_id: &str) -> Result<i64, AppError>;
    async fn mark_attended(&self, id: &str) -> Result<Booking, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count_for_activity(&self, activity_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Archive one concrete occurrence of a session: snapshot the session
    /// aggregate and every live booking, then delete the live bookings, all
    /// in one transaction. Returns false (and changes nothing) when that
    /// occurrence is already archived.
    async fn archive_occurrence(
        &self,
        session: &Session,
        activity: &Activity,
        session_date: NaiveDate,
    ) -> Result<bool, AppError>;
    async fn list_sessions(&self) -> Result<Vec<HistoricalSession>, AppError>;
    async fn list_bookings(&self, historical_session_id: &str) -> Result<Vec<HistoricalBooking>, AppError>;
}
