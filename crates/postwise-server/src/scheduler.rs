//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring maintenance jobs.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Grace period before a scheduled post that never published counts as missed.
const MISSED_GRACE_HOURS: i64 = 1;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(pool: PgPool) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_missed_posts_job(&scheduler, pool).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the hourly overdue-post sweep (`0 0 * * * *`, top of every hour).
///
/// Any post still `scheduled` more than [`MISSED_GRACE_HOURS`] after its
/// `scheduled_at` is marked `missed` so it stops blocking slot recommendations.
async fn register_missed_posts_job(
    scheduler: &JobScheduler,
    pool: PgPool,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);

        Box::pin(async move {
            tracing::info!("scheduler: starting overdue-post sweep");
            run_missed_posts_sweep(&pool).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Mark overdue scheduled posts as missed. Failures are logged, not fatal;
/// the next hourly run will pick the rows up again.
async fn run_missed_posts_sweep(pool: &PgPool) {
    let cutoff = Utc::now() - Duration::hours(MISSED_GRACE_HOURS);

    match postwise_db::mark_overdue_scheduled_missed(pool, cutoff).await {
        Ok(0) => tracing::info!("scheduler: no overdue posts"),
        Ok(count) => tracing::info!(count, "scheduler: marked overdue posts as missed"),
        Err(e) => tracing::error!(error = %e, "scheduler: overdue-post sweep failed"),
    }
}
