//! `GET /api/listings?directory=<directoryId>`

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use tracing::info;

use crate::{
    config::tables,
    envelope::{json_ok, CachePolicy, DataEnvelope},
    error::Result,
    filter::Filter,
    handlers::{required, QueryParams},
    models::ListingRecord,
    state::AppState,
    transform::{transform_listing, ListingView},
};

/// All listings of a directory.
///
/// The read is unbounded on this side; whatever page size the backend
/// applies is what the sites receive.
pub async fn list_listings(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = QueryParams::parse(query.as_deref());
    let directory_id = required(params.first("directory"), "Directory ID is required")?;
    let backend = state.backend()?;

    let records: Vec<ListingRecord> = backend
        .list_records(
            tables::LISTINGS,
            &Filter::eq("Directory Identifier", &directory_id),
            None,
        )
        .await
        .map_err(|e| e.during("listings request"))?;

    let listings: Vec<_> = records
        .into_iter()
        .map(|record| transform_listing(record, &directory_id, ListingView::Listings))
        .collect();

    info!(directory = %directory_id, count = listings.len(), "Listings fetched");

    Ok(json_ok(DataEnvelope::new(listings), CachePolicy::Standard))
}
