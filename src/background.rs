use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::domain::services::archival;
use crate::state::AppState;

/// Periodic archival sweep. Each pass moves every assigned session's latest
/// finished occurrence into history and clears its live bookings.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting archival sweep worker...");

    let interval = Duration::from_secs(state.config.sweep_interval_secs);

    loop {
        let as_of = Utc::now().date_naive();
        let span = info_span!("archival_sweep", as_of = %as_of);

        async {
            match archival::run_sweep(
                state.session_repo.as_ref(),
                state.activity_repo.as_ref(),
                state.archive_repo.as_ref(),
                as_of,
            )
            .await
            {
                Ok(0) => info!("Sweep complete, nothing to archive"),
                Ok(archived) => info!("Sweep archived {} occurrence(s)", archived),
                Err(e) => error!("Sweep failed: {:?}", e),
            }
        }
        .instrument(span)
        .await;

        sleep(interval).await;
    }
}
