use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use postwise_core::Platform;
use postwise_scoring::{
    compute_slots, country_for_timezone, holidays_in_range, Holiday, PostHistogram, ScoringInputs,
    HISTORY_SAMPLE_LIMIT, MIN_PUBLISHED_POSTS,
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "postwise-cli")]
#[command(about = "Postwise command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List active channels and their connected platforms.
    Channels,
    /// Register a channel and connect its platforms.
    AddChannel {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        /// IANA timezone the channel posts in.
        #[arg(long, default_value = "America/New_York")]
        timezone: String,
        /// Comma-separated platforms to connect.
        #[arg(long)]
        platforms: Option<String>,
    },
    /// Recommend posting slots for a channel over a date range.
    BestTimes {
        /// Channel public id.
        #[arg(long)]
        channel: Uuid,
        /// Start of the window (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// End of the window, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// Comma-separated platform filter (defaults to the channel's platforms).
        #[arg(long)]
        platforms: Option<String>,
        /// ISO 3166-1 alpha-2 country override for holiday lookups.
        #[arg(long)]
        country: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = postwise_db::connect_pool_from_env().await?;

    match cli.command {
        Commands::Channels => list_channels(&pool).await,
        Commands::AddChannel {
            name,
            slug,
            timezone,
            platforms,
        } => add_channel(&pool, &name, &slug, &timezone, platforms.as_deref()).await,
        Commands::BestTimes {
            channel,
            from,
            to,
            platforms,
            country,
        } => best_times(&pool, channel, from, to, platforms, country).await,
    }
}

async fn list_channels(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let channels = postwise_db::list_active_channels(pool).await?;
    if channels.is_empty() {
        println!("no active channels");
        return Ok(());
    }

    for channel in channels {
        let platforms = postwise_db::list_channel_platforms(pool, channel.id).await?;
        println!(
            "{}  {}  tz={}  platforms=[{}]",
            channel.public_id,
            channel.slug,
            channel.timezone,
            platforms.join(", ")
        );
    }
    Ok(())
}

async fn add_channel(
    pool: &sqlx::PgPool,
    name: &str,
    slug: &str,
    timezone: &str,
    platforms: Option<&str>,
) -> anyhow::Result<()> {
    let channel = postwise_db::create_channel(pool, name, slug, timezone).await?;

    if let Some(raw) = platforms {
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let platform: Platform = part.parse()?;
            postwise_db::add_channel_platform(pool, channel.id, platform.as_str()).await?;
        }
    }

    println!("created channel {} ({})", channel.slug, channel.public_id);
    Ok(())
}

async fn best_times(
    pool: &sqlx::PgPool,
    channel_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
    platforms: Option<String>,
    country: Option<String>,
) -> anyhow::Result<()> {
    anyhow::ensure!(from <= to, "--from must not be after --to");

    let channel = postwise_db::get_channel_by_public_id(pool, channel_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("channel '{channel_id}' not found"))?;

    let published_count = postwise_db::count_published_posts(pool, channel.id).await?;
    if published_count < MIN_PUBLISHED_POSTS {
        println!(
            "not enough history: {published_count} published posts (need {MIN_PUBLISHED_POSTS})"
        );
        return Ok(());
    }

    let platforms = resolve_platforms(pool, channel.id, platforms.as_deref()).await?;

    let country = match country {
        Some(code) => code.trim().to_ascii_uppercase(),
        None => country_for_timezone(&channel.timezone).to_string(),
    };
    let holidays = holidays_in_range(&country, from, to);
    let holiday_map: HashMap<NaiveDate, Holiday> = holidays
        .iter()
        .cloned()
        .map(|holiday| (holiday.date, holiday))
        .collect();

    let buckets =
        postwise_db::list_publish_buckets(pool, channel.id, &channel.timezone, HISTORY_SAMPLE_LIMIT)
            .await?;
    let histogram = PostHistogram::from_buckets(buckets.iter().filter_map(|bucket| {
        Some((
            u32::try_from(bucket.dow).ok()?,
            u32::try_from(bucket.hour).ok()?,
        ))
    }));

    let scheduled_rows =
        postwise_db::list_scheduled_slots(pool, channel.id, &channel.timezone, from, to).await?;
    let scheduled: HashSet<(NaiveDate, u32)> = scheduled_rows
        .iter()
        .filter_map(|slot| Some((slot.date, u32::try_from(slot.hour).ok()?)))
        .collect();

    let slots = compute_slots(&ScoringInputs {
        histogram: &histogram,
        platforms: &platforms,
        holidays: &holiday_map,
        scheduled: &scheduled,
        from,
        to,
    });

    if slots.is_empty() {
        println!("no slots scored above the recommendation threshold");
        return Ok(());
    }

    for slot in &slots {
        let platforms: Vec<&str> = slot.platforms.iter().map(|p| p.as_str()).collect();
        println!(
            "{} {}  score={:>3} tier={}  [{}]  {}",
            slot.date,
            slot.time,
            slot.score,
            slot.tier,
            platforms.join(", "),
            slot.reason
        );
    }
    Ok(())
}

async fn resolve_platforms(
    pool: &sqlx::PgPool,
    channel_id: i64,
    requested: Option<&str>,
) -> anyhow::Result<Vec<Platform>> {
    if let Some(raw) = requested {
        let mut platforms = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let platform: Platform = part.parse()?;
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        anyhow::ensure!(!platforms.is_empty(), "--platforms must name at least one platform");
        return Ok(platforms);
    }

    let names = postwise_db::list_channel_platforms(pool, channel_id).await?;
    let platforms: Vec<Platform> = names
        .iter()
        .filter_map(|name| name.parse().ok())
        .collect();

    if platforms.is_empty() {
        Ok(Platform::ALL.to_vec())
    } else {
        Ok(platforms)
    }
}
