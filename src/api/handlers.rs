use super::ApiState;
use crate::error::CacheError;
use crate::group::GroupStats;

use axum::{
    Json,
    extract::{Extension, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct GetParams {
    #[serde(default)]
    pub key: String,
    pub group: Option<String>,
}

pub async fn handle_get(
    Extension(state): Extension<ApiState>,
    Query(params): Query<GetParams>,
) -> Response {
    let name = params.group.as_deref().unwrap_or(&state.default_group);

    let Some(group) = state.cluster.group(name) else {
        tracing::warn!("API request for unknown group {}", name);
        return (
            StatusCode::NOT_FOUND,
            CacheError::UnknownNamespace(name.to_string()).to_string(),
        )
            .into_response();
    };

    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(CacheError::InvalidKey) => {
            (StatusCode::BAD_REQUEST, CacheError::InvalidKey.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!("API get {} failed: {}", params.key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn handle_stats(Extension(state): Extension<ApiState>) -> Json<Vec<GroupStats>> {
    Json(state.cluster.stats())
}
