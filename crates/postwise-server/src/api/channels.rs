//! `GET /api/v1/channels` and `GET /api/v1/channels/:public_id`.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ChannelItem {
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub platforms: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Resolve a channel public id to a `ChannelRow`, returning 404 if not found.
pub(super) async fn resolve_channel(
    pool: &sqlx::PgPool,
    public_id: Uuid,
    request_id: &str,
) -> Result<postwise_db::ChannelRow, ApiError> {
    postwise_db::get_channel_by_public_id(pool, public_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "not_found",
                format!("channel '{public_id}' not found"),
            )
        })
}

pub(super) async fn list_channels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ChannelItem>>>, ApiError> {
    let channels = postwise_db::list_active_channels(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut data = Vec::with_capacity(channels.len());
    for channel in channels {
        let platforms = postwise_db::list_channel_platforms(&state.pool, channel.id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

        data.push(ChannelItem {
            public_id: channel.public_id,
            name: channel.name,
            slug: channel.slug,
            timezone: channel.timezone,
            platforms,
            created_at: channel.created_at,
        });
    }

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_channel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(public_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ChannelItem>>, ApiError> {
    let channel = resolve_channel(&state.pool, public_id, &req_id.0).await?;

    let platforms = postwise_db::list_channel_platforms(&state.pool, channel.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ChannelItem {
            public_id: channel.public_id,
            name: channel.name,
            slug: channel.slug,
            timezone: channel.timezone,
            platforms,
            created_at: channel.created_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
