use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(e: sqlx::Error, pitch_number: &str) -> AppError {
    if AppError::is_unique_violation(&e) {
        return AppError::DuplicateIdentity(format!(
            "A booking already exists for pitch {}",
            pitch_number
        ));
    }
    AppError::Database(e)
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking, enforce_capacity: bool) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // No-op write first: the transaction must hold the write lock before
        // occupancy is read, so concurrent creates serialize here.
        let touched = sqlx::query("UPDATE sessions SET id = id WHERE id = ?")
            .bind(&booking.session_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if touched.rows_affected() == 0 {
            return Err(AppError::NotFound("Session not found".into()));
        }

        let session_row = sqlx::query(
            "SELECT s.activity_id, a.max_number
             FROM sessions s LEFT JOIN activities a ON a.id = s.activity_id
             WHERE s.id = ?",
        )
        .bind(&booking.session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let activity_id: Option<String> = session_row.get("activity_id");
        let max_number: Option<i32> = session_row.get("max_number");
        if activity_id.is_none() {
            return Err(AppError::Validation("Session has no activity assigned".into()));
        }
        let max_number = max_number.ok_or(AppError::Internal)?;

        if enforce_capacity {
            let occupied: i64 = sqlx::query(
                "SELECT COALESCE(SUM(number_of_people), 0) AS occupied FROM bookings WHERE session_id = ?",
            )
            .bind(&booking.session_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("occupied");

            let remaining = max_number as i64 - occupied;
            if (booking.number_of_people as i64) > remaining {
                return Err(AppError::CapacityExceeded(format!(
                    "Session is full: capacity {}, {} places remaining",
                    max_number,
                    remaining.max(0)
                )));
            }
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, session_id, pitch_number, first_name, last_name, email, number_of_people, attended, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&booking.id)
        .bind(&booking.session_id)
        .bind(&booking.pitch_number)
        .bind(&booking.first_name)
        .bind(&booking.last_name)
        .bind(&booking.email)
        .bind(booking.number_of_people)
        .bind(booking.attended)
        .bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_insert_err(e, &booking.pitch_number))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update(&self, booking: &Booking, enforce_capacity: bool) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("UPDATE sessions SET id = id WHERE id = ?")
            .bind(&booking.session_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if enforce_capacity {
            let row = sqlx::query(
                "SELECT a.max_number FROM sessions s JOIN activities a ON a.id = s.activity_id WHERE s.id = ?",
            )
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Validation("Session has no activity assigned".into()))?;
            let max_number: i32 = row.get("max_number");

            // Re-validation discounts the booking's own prior contribution,
            // otherwise shrinking a booking on a full session would fail.
            let occupied_by_others: i64 = sqlx::query(
                "SELECT COALESCE(SUM(number_of_people), 0) AS occupied
                 FROM bookings WHERE session_id = ? AND id != ?",
            )
            .bind(&booking.session_id)
            .bind(&booking.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get("occupied");

            let remaining = max_number as i64 - occupied_by_others;
            if (booking.number_of_people as i64) > remaining {
                return Err(AppError::CapacityExceeded(format!(
                    "Session is full: capacity {}, {} places remaining",
                    max_number,
                    remaining.max(0)
                )));
            }
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET pitch_number = ?, first_name = ?, last_name = ?, email = ?, number_of_people = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&booking.pitch_number)
        .bind(&booking.first_name)
        .bind(&booking.last_name)
        .bind(&booking.email)
        .bind(booking.number_of_people)
        .bind(&booking.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_insert_err(e, &booking.pitch_number))?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE session_id = ? ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn occupancy(&self, session_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(number_of_people), 0) AS occupied FROM bookings WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(row.get("occupied"))
    }

    async fn mark_attended(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET attended = 1 WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found".into()));
        }
        Ok(())
    }

    async fn count_for_activity(&self, activity_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM bookings b
             JOIN sessions s ON s.id = b.session_id
             WHERE s.activity_id = ?",
        )
        .bind(activity_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(row.get("count"))
    }
}
