use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::models::user::{User, ROLE_SUPERUSER};
use crate::domain::ports::UserRepository;
use crate::domain::services::auth_service::AuthService;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_activity_repo::PostgresActivityRepo, postgres_archive_repo::PostgresArchiveRepo,
    postgres_booking_repo::PostgresBookingRepo, postgres_opening_hour_repo::PostgresOpeningHourRepo,
    postgres_session_repo::PostgresSessionRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_activity_repo::SqliteActivityRepo, sqlite_archive_repo::SqliteArchiveRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_opening_hour_repo::SqliteOpeningHourRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let auth_service = Arc::new(AuthService::new(config.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        seed_admin_user(user_repo.clone(), config).await;

        AppState {
            config: config.clone(),
            user_repo,
            activity_repo: Arc::new(PostgresActivityRepo::new(pool.clone())),
            opening_hour_repo: Arc::new(PostgresOpeningHourRepo::new(pool.clone())),
            session_repo: Arc::new(PostgresSessionRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            archive_repo: Arc::new(PostgresArchiveRepo::new(pool.clone())),
            auth_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        seed_admin_user(user_repo.clone(), config).await;

        AppState {
            config: config.clone(),
            user_repo,
            activity_repo: Arc::new(SqliteActivityRepo::new(pool.clone())),
            opening_hour_repo: Arc::new(SqliteOpeningHourRepo::new(pool.clone())),
            session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            archive_repo: Arc::new(SqliteArchiveRepo::new(pool.clone())),
            auth_service,
        }
    }
}

// First boot on an empty database gets a superuser so the API is reachable.
async fn seed_admin_user(user_repo: Arc<dyn UserRepository>, config: &Config) {
    let existing = user_repo
        .count()
        .await
        .expect("Failed to count users during bootstrap");
    if existing > 0 {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(config.admin_password.as_bytes(), &salt)
        .expect("Failed to hash bootstrap admin password")
        .to_string();

    let admin = User::new(config.admin_username.clone(), hash, ROLE_SUPERUSER.to_string());
    user_repo
        .create(&admin)
        .await
        .expect("Failed to seed bootstrap admin user");
    info!(username = %config.admin_username, "Seeded bootstrap superuser");
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
