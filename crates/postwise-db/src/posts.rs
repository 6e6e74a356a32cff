//! Database operations for the `posts` table.
//!
//! The best-times endpoint never loads whole posts — it needs counts and
//! (day-of-week, hour) buckets in the channel's local timezone, so the
//! bucketing happens here in SQL with `AT TIME ZONE` rather than in
//! application code.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A published post reduced to its channel-local (day-of-week, hour) bucket.
///
/// `dow` follows Postgres `EXTRACT(DOW ...)`: 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct PublishBucketRow {
    pub dow: i32,
    pub hour: i32,
}

/// A scheduled post reduced to its channel-local calendar slot.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ScheduledSlotRow {
    pub date: NaiveDate,
    pub hour: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Counts all published posts for a channel.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_published_posts(pool: &PgPool, channel_id: i64) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) \
         FROM posts \
         WHERE channel_id = $1 AND status = 'published' AND published_at IS NOT NULL",
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Returns (day-of-week, hour) buckets for the channel's most recent
/// published posts, converted to the given IANA timezone.
///
/// `limit` caps the history sample (most recent first).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, including for timezone
/// names Postgres does not recognise.
pub async fn list_publish_buckets(
    pool: &PgPool,
    channel_id: i64,
    timezone: &str,
    limit: i64,
) -> Result<Vec<PublishBucketRow>, DbError> {
    let rows = sqlx::query_as::<_, PublishBucketRow>(
        "SELECT EXTRACT(DOW FROM recent.published_at AT TIME ZONE $2)::INT AS dow, \
                EXTRACT(HOUR FROM recent.published_at AT TIME ZONE $2)::INT AS hour \
         FROM (SELECT published_at \
               FROM posts \
               WHERE channel_id = $1 AND status = 'published' AND published_at IS NOT NULL \
               ORDER BY published_at DESC \
               LIMIT $3) AS recent",
    )
    .bind(channel_id)
    .bind(timezone)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the channel-local (date, hour) slots occupied by scheduled posts
/// within `[from, to]` (inclusive, channel-local dates).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scheduled_slots(
    pool: &PgPool,
    channel_id: i64,
    timezone: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ScheduledSlotRow>, DbError> {
    let rows = sqlx::query_as::<_, ScheduledSlotRow>(
        "SELECT (scheduled_at AT TIME ZONE $2)::DATE AS date, \
                EXTRACT(HOUR FROM scheduled_at AT TIME ZONE $2)::INT AS hour \
         FROM posts \
         WHERE channel_id = $1 AND status = 'scheduled' AND scheduled_at IS NOT NULL \
           AND (scheduled_at AT TIME ZONE $2)::DATE BETWEEN $3 AND $4 \
         ORDER BY scheduled_at",
    )
    .bind(channel_id)
    .bind(timezone)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks scheduled posts whose publish time has passed `cutoff` as missed.
///
/// Returns the number of posts swept. Run periodically so stale schedule
/// entries stop blocking recommendation slots.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mark_overdue_scheduled_missed(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query(
        "UPDATE posts \
         SET status = 'missed' \
         WHERE status = 'scheduled' AND scheduled_at IS NOT NULL AND scheduled_at < $1",
    )
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
