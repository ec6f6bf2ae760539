use crate::domain::{models::session::Session, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn ensure_slots(&self, sessions: &[Session]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = 0u64;
        for session in sessions {
            let result = sqlx::query(
                "INSERT INTO sessions (id, day, start_time, activity_id, created_at)
                 VALUES ($1, $2, $3, NULL, $4)
                 ON CONFLICT (day, start_time) DO NOTHING",
            )
            .bind(&session.id)
            .bind(&session.day)
            .bind(&session.start_time)
            .bind(session.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            created += result.rows_affected();
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions ORDER BY day, start_time")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_day(&self, day: &str) -> Result<Vec<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE day = $1 ORDER BY start_time")
            .bind(day)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_activity(&self, activity_id: &str) -> Result<Vec<Session>, AppError> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE activity_id = $1 ORDER BY day, start_time",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn assign_activity(
        &self,
        day: &str,
        slots: &[String],
        activity_id: &str,
    ) -> Result<Vec<Session>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Lock and check every covered slot before writing any of them.
        for slot in slots {
            let session = sqlx::query_as::<_, Session>(
                "SELECT * FROM sessions WHERE day = $1 AND start_time = $2 FOR UPDATE",
            )
            .bind(day)
            .bind(slot)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

            match session {
                None => {
                    return Err(AppError::SchedulingConflict(format!(
                        "Session slot at {} does not exist",
                        slot
                    )));
                }
                Some(s) if s.activity_id.is_some() => {
                    return Err(AppError::SchedulingConflict(format!(
                        "Session at {} already has an activity assigned",
                        slot
                    )));
                }
                Some(_) => {}
            }
        }

        let mut updated = Vec::with_capacity(slots.len());
        for slot in slots {
            let session = sqlx::query_as::<_, Session>(
                "UPDATE sessions SET activity_id = $1 WHERE day = $2 AND start_time = $3 RETURNING *",
            )
            .bind(activity_id)
            .bind(day)
            .bind(slot)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            updated.push(session);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn clear_activity(
        &self,
        day: &str,
        start_time: &str,
        force: bool,
    ) -> Result<Session, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE day = $1 AND start_time = $2 FOR UPDATE",
        )
        .bind(day)
        .bind(start_time)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Session slot not found".into()))?;

        let bookings: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM bookings WHERE session_id = $1")
                .bind(&session.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .get("count");

        if bookings > 0 {
            if !force {
                return Err(AppError::Conflict(format!(
                    "Slot has {} existing booking(s); pass force to clear them",
                    bookings
                )));
            }
            sqlx::query("DELETE FROM bookings WHERE session_id = $1")
                .bind(&session.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        let cleared = sqlx::query_as::<_, Session>(
            "UPDATE sessions SET activity_id = NULL WHERE id = $1 RETURNING *",
        )
        .bind(&session.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cleared)
    }

    async fn count_by_activity(&self, activity_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM sessions WHERE activity_id = $1")
            .bind(activity_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get("count"))
    }
}
