//! Query integration tests against a live Postgres (provisioned per-test by
//! `#[sqlx::test]` with the workspace migrations).

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::PgPool;

async fn seed_channel(pool: &PgPool, slug: &str, timezone: &str) -> i64 {
    postwise_db::create_channel(pool, &format!("Channel {slug}"), slug, timezone)
        .await
        .expect("seed_channel failed")
        .id
}

async fn seed_published(pool: &PgPool, channel_id: i64, published_at: chrono::DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO posts (channel_id, status, platforms, content, published_at) \
         VALUES ($1, 'published', '{facebook}', 'hello', $2)",
    )
    .bind(channel_id)
    .bind(published_at)
    .execute(pool)
    .await
    .expect("seed_published failed");
}

async fn seed_scheduled(pool: &PgPool, channel_id: i64, scheduled_at: chrono::DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO posts (channel_id, status, platforms, content, scheduled_at) \
         VALUES ($1, 'scheduled', '{facebook}', 'later', $2)",
    )
    .bind(channel_id)
    .bind(scheduled_at)
    .execute(pool)
    .await
    .expect("seed_scheduled failed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn created_channels_are_listed_with_their_platforms(pool: PgPool) {
    let channel = postwise_db::create_channel(&pool, "Channel crud", "crud", "Europe/Berlin")
        .await
        .expect("create_channel");
    postwise_db::add_channel_platform(&pool, channel.id, "facebook")
        .await
        .expect("add facebook");
    // Reconnecting the same platform is a no-op, not an error.
    postwise_db::add_channel_platform(&pool, channel.id, "facebook")
        .await
        .expect("reconnect facebook");
    postwise_db::add_channel_platform(&pool, channel.id, "bluesky")
        .await
        .expect("add bluesky");

    let listed = postwise_db::list_active_channels(&pool)
        .await
        .expect("list_active_channels");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug, "crud");
    assert_eq!(listed[0].timezone, "Europe/Berlin");

    let platforms = postwise_db::list_channel_platforms(&pool, channel.id)
        .await
        .expect("list_channel_platforms");
    assert_eq!(platforms, vec!["bluesky".to_string(), "facebook".to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn publish_buckets_convert_to_channel_timezone(pool: PgPool) {
    let channel_id = seed_channel(&pool, "tz-bucket", "America/New_York").await;

    // 2025-03-05 16:00 UTC is Wednesday 11:00 in New York (EST, UTC-5).
    let published = Utc.with_ymd_and_hms(2025, 3, 5, 16, 0, 0).unwrap();
    seed_published(&pool, channel_id, published).await;

    let buckets = postwise_db::list_publish_buckets(&pool, channel_id, "America/New_York", 200)
        .await
        .expect("list_publish_buckets");

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].dow, 3, "expected Wednesday (DOW 3)");
    assert_eq!(buckets[0].hour, 11);
}

#[sqlx::test(migrations = "../../migrations")]
async fn publish_buckets_respect_the_sample_limit(pool: PgPool) {
    let channel_id = seed_channel(&pool, "tz-limit", "America/New_York").await;
    for day in 1..=5 {
        let at = Utc.with_ymd_and_hms(2025, 3, day, 16, 0, 0).unwrap();
        seed_published(&pool, channel_id, at).await;
    }

    let buckets = postwise_db::list_publish_buckets(&pool, channel_id, "America/New_York", 2)
        .await
        .expect("list_publish_buckets");
    assert_eq!(buckets.len(), 2, "limit should cap the sample");
}

#[sqlx::test(migrations = "../../migrations")]
async fn count_published_ignores_other_statuses(pool: PgPool) {
    let channel_id = seed_channel(&pool, "count-status", "America/New_York").await;
    seed_published(&pool, channel_id, Utc::now()).await;
    seed_scheduled(&pool, channel_id, Utc::now() + chrono::Duration::days(1)).await;

    let count = postwise_db::count_published_posts(&pool, channel_id)
        .await
        .expect("count_published_posts");
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn scheduled_slots_filter_by_local_date_range(pool: PgPool) {
    let channel_id = seed_channel(&pool, "sched-range", "America/New_York").await;

    // Wednesday 14:00 New York = 19:00 UTC.
    let inside = Utc.with_ymd_and_hms(2025, 3, 5, 19, 0, 0).unwrap();
    let outside = Utc.with_ymd_and_hms(2025, 3, 20, 19, 0, 0).unwrap();
    seed_scheduled(&pool, channel_id, inside).await;
    seed_scheduled(&pool, channel_id, outside).await;

    let from = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
    let to = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    let slots = postwise_db::list_scheduled_slots(&pool, channel_id, "America/New_York", from, to)
        .await
        .expect("list_scheduled_slots");

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].date, from);
    assert_eq!(slots[0].hour, 14);
}

#[sqlx::test(migrations = "../../migrations")]
async fn overdue_sweep_marks_only_past_scheduled_posts(pool: PgPool) {
    let channel_id = seed_channel(&pool, "sweep", "America/New_York").await;
    seed_scheduled(&pool, channel_id, Utc::now() - chrono::Duration::hours(3)).await;
    seed_scheduled(&pool, channel_id, Utc::now() + chrono::Duration::hours(3)).await;

    let swept = postwise_db::mark_overdue_scheduled_missed(&pool, Utc::now())
        .await
        .expect("mark_overdue_scheduled_missed");
    assert_eq!(swept, 1);

    let missed: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM posts WHERE channel_id = $1 AND status = 'missed'",
    )
    .bind(channel_id)
    .fetch_one(&pool)
    .await
    .expect("count missed");
    assert_eq!(missed, 1);

    let still_scheduled: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM posts WHERE channel_id = $1 AND status = 'scheduled'",
    )
    .bind(channel_id)
    .fetch_one(&pool)
    .await
    .expect("count scheduled");
    assert_eq!(still_scheduled, 1);
}
