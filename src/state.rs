use std::sync::Arc;
use crate::domain::ports::{
    ActivityRepository, ArchiveRepository, BookingRepository,
    OpeningHourRepository, SessionRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub opening_hour_repo: Arc<dyn OpeningHourRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub archive_repo: Arc<dyn ArchiveRepository>,
    pub auth_service: Arc<AuthService>,
}
