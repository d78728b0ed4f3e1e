//! `GET /api/directory?id=<directoryId>`

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use tracing::info;

use crate::{
    config::tables,
    envelope::{json_ok, CachePolicy, DataEnvelope},
    error::{ApiError, Result},
    filter::Filter,
    handlers::{required, QueryParams},
    models::DirectoryRecord,
    state::AppState,
    transform::transform_directory,
};

/// Look up one directory by identifier
pub async fn get_directory(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = QueryParams::parse(query.as_deref());
    let directory_id = required(params.first("id"), "Directory ID is required")?;
    let backend = state.backend()?;

    let records: Vec<DirectoryRecord> = backend
        .list_records(
            tables::DIRECTORIES,
            &Filter::eq("Identifier", &directory_id),
            Some(1),
        )
        .await
        .map_err(|e| e.during("directory request"))?;

    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found(format!("Directory not found: {}", directory_id)))?;

    info!(directory = %directory_id, "Directory resolved");

    Ok(json_ok(
        DataEnvelope::new(transform_directory(record)),
        CachePolicy::Standard,
    ))
}
