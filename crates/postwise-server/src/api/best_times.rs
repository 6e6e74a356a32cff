//! `GET /api/v1/posts/best-times` — ranked posting-slot recommendations.
//!
//! The handler only gathers data and validates input; the actual scoring
//! lives in `postwise-scoring` so it stays testable without a database.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use postwise_core::Platform;
use postwise_scoring::{
    compute_slots, country_for_timezone, holidays_in_range, Holiday, PostHistogram, ScoredSlot,
    ScoringInputs, HISTORY_SAMPLE_LIMIT, MIN_PUBLISHED_POSTS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::channels::resolve_channel;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// All parameters arrive as raw strings so that every validation failure
/// produces the standard error envelope instead of axum's bare 400.
#[derive(Debug, Deserialize)]
pub(super) struct BestTimesQuery {
    channel_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    platforms: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BestTimesData {
    pub slots: Vec<ScoredSlot>,
    pub holidays: Vec<Holiday>,
    pub country: String,
    pub published_count: i64,
    pub min_required: i64,
    pub message: Option<String>,
}

pub(super) async fn get_best_times(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BestTimesQuery>,
) -> Result<Json<ApiResponse<BestTimesData>>, ApiError> {
    let channel_id = parse_required_uuid(&req_id.0, "channel_id", query.channel_id.as_deref())?;
    let from = parse_required_date(&req_id.0, "from", query.from.as_deref())?;
    let to = parse_required_date(&req_id.0, "to", query.to.as_deref())?;
    if from > to {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "'from' must not be after 'to'",
        ));
    }
    let requested = parse_platform_list(&req_id.0, query.platforms.as_deref())?;
    let country_override = parse_country(&req_id.0, query.country.as_deref())?;

    let channel = resolve_channel(&state.pool, channel_id, &req_id.0).await?;

    let country =
        country_override.unwrap_or_else(|| country_for_timezone(&channel.timezone).to_string());
    let holidays = holidays_in_range(&country, from, to);

    let published_count = postwise_db::count_published_posts(&state.pool, channel.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if published_count < MIN_PUBLISHED_POSTS {
        return Ok(Json(ApiResponse {
            data: BestTimesData {
                slots: Vec::new(),
                holidays,
                country,
                published_count,
                min_required: MIN_PUBLISHED_POSTS,
                message: Some(format!(
                    "Need at least {MIN_PUBLISHED_POSTS} published posts to recommend times; \
                     this channel has {published_count}"
                )),
            },
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let platforms = match requested {
        Some(platforms) => platforms,
        None => channel_platforms(&state.pool, channel.id, &req_id.0).await?,
    };

    let buckets =
        postwise_db::list_publish_buckets(&state.pool, channel.id, &channel.timezone, HISTORY_SAMPLE_LIMIT)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let histogram = PostHistogram::from_buckets(buckets.iter().filter_map(|bucket| {
        Some((
            u32::try_from(bucket.dow).ok()?,
            u32::try_from(bucket.hour).ok()?,
        ))
    }));

    let scheduled_rows =
        postwise_db::list_scheduled_slots(&state.pool, channel.id, &channel.timezone, from, to)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let scheduled: HashSet<(NaiveDate, u32)> = scheduled_rows
        .iter()
        .filter_map(|slot| Some((slot.date, u32::try_from(slot.hour).ok()?)))
        .collect();

    let holiday_map: HashMap<NaiveDate, Holiday> = holidays
        .iter()
        .cloned()
        .map(|holiday| (holiday.date, holiday))
        .collect();

    let slots = compute_slots(&ScoringInputs {
        histogram: &histogram,
        platforms: &platforms,
        holidays: &holiday_map,
        scheduled: &scheduled,
        from,
        to,
    });

    Ok(Json(ApiResponse {
        data: BestTimesData {
            slots,
            holidays,
            country,
            published_count,
            min_required: MIN_PUBLISHED_POSTS,
            message: None,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// The channel's configured platforms, falling back to all supported
/// platforms for channels with nothing connected yet.
async fn channel_platforms(
    pool: &sqlx::PgPool,
    channel_id: i64,
    request_id: &str,
) -> Result<Vec<Platform>, ApiError> {
    let names = postwise_db::list_channel_platforms(pool, channel_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?;

    let platforms: Vec<Platform> = names
        .iter()
        .filter_map(|name| match name.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(_) => {
                tracing::warn!(platform = %name, channel_id, "skipping unknown platform row");
                None
            }
        })
        .collect();

    if platforms.is_empty() {
        Ok(Platform::ALL.to_vec())
    } else {
        Ok(platforms)
    }
}

fn parse_required_uuid(
    request_id: &str,
    name: &str,
    value: Option<&str>,
) -> Result<Uuid, ApiError> {
    let raw = value.ok_or_else(|| missing_param(request_id, name))?;
    raw.parse::<Uuid>().map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("'{name}' must be a UUID"),
        )
    })
}

fn parse_required_date(
    request_id: &str,
    name: &str,
    value: Option<&str>,
) -> Result<NaiveDate, ApiError> {
    let raw = value.ok_or_else(|| missing_param(request_id, name))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("'{name}' must be an ISO date (YYYY-MM-DD)"),
        )
    })
}

/// Parse the optional comma-separated platform filter. `None` means the
/// caller wants the channel's configured platforms.
fn parse_platform_list(
    request_id: &str,
    value: Option<&str>,
) -> Result<Option<Vec<Platform>>, ApiError> {
    let Some(raw) = value else { return Ok(None) };

    let mut platforms = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let platform = part.parse::<Platform>().map_err(|e| {
            ApiError::new(request_id, "validation_error", e.to_string())
        })?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }

    if platforms.is_empty() {
        Ok(None)
    } else {
        Ok(Some(platforms))
    }
}

fn parse_country(request_id: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    let Some(raw) = value else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(Some(trimmed.to_ascii_uppercase()))
    } else {
        Err(ApiError::new(
            request_id,
            "validation_error",
            "'country' must be an ISO 3166-1 alpha-2 code",
        ))
    }
}

fn missing_param(request_id: &str, name: &str) -> ApiError {
    ApiError::new(
        request_id,
        "validation_error",
        format!("missing required query parameter '{name}'"),
    )
}
