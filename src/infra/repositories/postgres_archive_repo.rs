use crate::domain::models::activity::Activity;
use crate::domain::models::archive::{HistoricalBooking, HistoricalSession};
use crate::domain::models::booking::Booking;
use crate::domain::models::session::Session;
use crate::domain::ports::ArchiveRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PostgresArchiveRepo {
    pool: PgPool,
}

impl PostgresArchiveRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArchiveRepository for PostgresArchiveRepo {
    async fn archive_occurrence(
        &self,
        session: &Session,
        activity: &Activity,
        session_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Lock the session row so in-flight booking transactions cannot
        // interleave with the snapshot-then-delete.
        sqlx::query("SELECT id FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(&session.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let total_booked: i64 = sqlx::query(
            "SELECT COALESCE(SUM(number_of_people), 0) AS occupied FROM bookings WHERE session_id = $1",
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

        let inserted = sqlx::query(
            "INSERT INTO historical_sessions
             (id, session_id, session_date, day, start_time, activity_id, activity_name, total_booked, archived_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (session_id, session_date) DO NOTHING",
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
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE session_id = $1")
                .bind(&session.id)
                .fetch_all(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        let archived_at = Utc::now();
        for booking in &bookings {
            sqlx::query(
                "INSERT INTO historical_bookings
                 (id, historical_session_id, pitch_number, first_name, last_name, email, number_of_people, attended, booked_at, archived_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
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

        sqlx::query("DELETE FROM bookings WHERE session_id = $1")
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
            "SELECT * FROM historical_bookings WHERE historical_session_id = $1 ORDER BY booked_at",
        )
        .bind(historical_session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
