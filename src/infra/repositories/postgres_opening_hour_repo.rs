use crate::domain::{models::opening_hour::OpeningHour, ports::OpeningHourRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOpeningHourRepo {
    pool: PgPool,
}

impl PostgresOpeningHourRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OpeningHourRepository for PostgresOpeningHourRepo {
    async fn create(&self, window: &OpeningHour) -> Result<OpeningHour, AppError> {
        sqlx::query_as::<_, OpeningHour>(
            "INSERT INTO opening_hours (id, day, open_time, close_time)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&window.id)
        .bind(&window.day)
        .bind(&window.open_time)
        .bind(&window.close_time)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<OpeningHour>, AppError> {
        sqlx::query_as::<_, OpeningHour>("SELECT * FROM opening_hours WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<OpeningHour>, AppError> {
        sqlx::query_as::<_, OpeningHour>("SELECT * FROM opening_hours ORDER BY day, open_time")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_day(&self, day: &str) -> Result<Vec<OpeningHour>, AppError> {
        sqlx::query_as::<_, OpeningHour>(
            "SELECT * FROM opening_hours WHERE day = $1 ORDER BY open_time",
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn update(&self, window: &OpeningHour) -> Result<OpeningHour, AppError> {
        sqlx::query_as::<_, OpeningHour>(
            "UPDATE opening_hours SET day = $1, open_time = $2, close_time = $3 WHERE id = $4 RETURNING *",
        )
        .bind(&window.day)
        .bind(&window.open_time)
        .bind(&window.close_time)
        .bind(&window.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Opening hour not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM opening_hours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Opening hour not found".into()));
        }
        Ok(())
    }
}
