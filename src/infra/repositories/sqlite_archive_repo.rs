use crate::domain::models::activity::Activity;
use crate::domain::models::archive::{HistoricalBooking, HistoricalSession};
use crate::domain::models::booking::Booking;
use crate::domain::models::session::Session;
use crate::domain::ports::ArchiveRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct SqliteArchiveRepo {
    pool: SqlitePool,
}

impl SqliteArchiveRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArchiveRepository for SqliteArchiveRepo {
    async fn archive_occurrence(
        &self,
        session: &Session,
        activity: &Activity,
        session_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Hold the write lock before snapshotting, so a booking transaction
        // in flight against this session cannot interleave.
        sqlx::query("UPDATE sessions SET id = id WHERE id = ?")
            .bind(&session.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let total_booked: i64 = sqlx::query(
            "SELECT COALESCE(SUM(number_of_people), 0) AS occupied FROM bookings WHERE session_id = ?",
        )
        .bind(&session.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .get("occupied");

        let snapshot = HistoricalSession::new(
            session.id.clone(),
            session_date,
            session.day.clone(),
            session.start_time.clone(),
            activity.id.clone(),
            activity.name.clone(),
            total_booked,
        );

        // The (session_id, session_date) unique key makes re-runs a no-op.
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO historical_sessions
             (id, session_id, session_date, day, start_time, activity_id, activity_name, total_booked, archived_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&snapshot.id)
        .bind(&snapshot.session_id)
        .bind(snapshot.session_date)
        .bind(&snapshot.day)
        .bind(&snapshot.start_time)
        .bind(&snapshot.activity_id)
        .bind(&snapshot.activity_name)
        .bind(snapshot.total_booked)
        .bind(snapshot.archived_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if inserted.rows_affected() == 0 {
            return Ok(false);
        }

        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE session_id = ?")
                .bind(&session.id)
                .fetch_all(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        let archived_at = Utc::now();
        for booking in &bookings {
            sqlx::query(
                "INSERT INTO historical_bookings
                 (id, historical_session_id, pitch_number, first_name, last_name, email, number_of_people, attended, booked_at, archived_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&snapshot.id)
            .bind(&booking.pitch_number)
            .bind(&booking.first_name)
            .bind(&booking.last_name)
            .bind(&booking.email)
            .bind(booking.number_of_people)
            .bind(booking.attended)
            .bind(booking.created_at)
            .bind(archived_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        sqlx::query("DELETE FROM bookings WHERE session_id = ?")
            .bind(&session.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(true)
    }

    async fn list_sessions(&self) -> Result<Vec<HistoricalSession>, AppError> {
        sqlx::query_as::<_, HistoricalSession>(
            "SELECT * FROM historical_sessions ORDER BY session_date DESC, start_time",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_bookings(
        &self,
        historical_session_id: &str,
    ) -> Result<Vec<HistoricalBooking>, AppError> {
        sqlx::query_as::<_, HistoricalBooking>(
            "SELECT * FROM historical_bookings WHERE historical_session_id = ? ORDER BY booked_at",
        )
        .bind(historical_session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
