//! Database operations for the `channels` and `channel_platforms` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active, non-deleted channels, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_channels(pool: &PgPool) -> Result<Vec<ChannelRow>, DbError> {
    let rows = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, public_id, name, slug, timezone, is_active, created_at, updated_at, deleted_at \
         FROM channels \
         WHERE is_active = true AND deleted_at IS NULL \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active, non-deleted channel by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_channel_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, public_id, name, slug, timezone, is_active, created_at, updated_at, deleted_at \
         FROM channels \
         WHERE public_id = $1 AND is_active = true AND deleted_at IS NULL",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the connected platform names for a channel, ordered by name.
///
/// Values are the lowercase wire names (`"facebook"`, `"gbp"`, ...).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_channel_platforms(
    pool: &PgPool,
    channel_id: i64,
) -> Result<Vec<String>, DbError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT platform \
         FROM channel_platforms \
         WHERE channel_id = $1 \
         ORDER BY platform",
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Creates a new channel row and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails (including unique constraint violations).
pub async fn create_channel(
    pool: &PgPool,
    name: &str,
    slug: &str,
    timezone: &str,
) -> Result<ChannelRow, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "INSERT INTO channels (name, slug, timezone, is_active) \
         VALUES ($1, $2, $3, true) \
         RETURNING id, public_id, name, slug, timezone, is_active, created_at, updated_at, deleted_at",
    )
    .bind(name)
    .bind(slug)
    .bind(timezone)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Connects a platform to a channel. Idempotent: reconnecting an existing
/// platform is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn add_channel_platform(
    pool: &PgPool,
    channel_id: i64,
    platform: &str,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO channel_platforms (channel_id, platform) \
         VALUES ($1, $2) \
         ON CONFLICT (channel_id, platform) DO NOTHING",
    )
    .bind(channel_id)
    .bind(platform)
    .execute(pool)
    .await?;
    Ok(())
}
