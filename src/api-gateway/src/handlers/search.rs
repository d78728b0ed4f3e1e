//! `GET /api/search?directory=<directoryId>&q=<term>`

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use tracing::{debug, info};

use crate::{
    config::tables,
    envelope::{json_ok, CachePolicy, ResultsEnvelope},
    error::Result,
    filter::Filter,
    handlers::{required, QueryParams},
    models::ListingRecord,
    state::AppState,
    transform::{transform_listing, Listing, ListingView},
};

/// Fields a search term is matched against
const SEARCH_FIELDS: [&str; 3] = ["Title", "Description", "Content"];

/// `(Directory Identifier,eq,<dir>)~and((Title,like,%q%)~or(...))`
pub fn search_filter(directory_id: &str, term: &str) -> Filter {
    Filter::and([
        Filter::eq("Directory Identifier", directory_id),
        Filter::or(
            SEARCH_FIELDS
                .iter()
                .map(|field| Filter::contains(*field, term)),
        ),
    ])
}

/// Free-text search within one directory. A blank term yields no results
/// without touching the backend.
pub async fn search_listings(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let params = QueryParams::parse(query.as_deref());
    let directory_id = required(params.first("directory"), "Directory ID is required")?;

    let q = params.first("q");
    let term = q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        debug!(directory = %directory_id, "Empty search term");
        return Ok(json_ok(
            ResultsEnvelope::<Listing>::new(Vec::new()),
            CachePolicy::None,
        ));
    }

    let backend = state.backend()?;

    let records: Vec<ListingRecord> = backend
        .list_records(tables::LISTINGS, &search_filter(&directory_id, term), None)
        .await
        .map_err(|e| e.during("search request"))?;

    let results: Vec<Listing> = records
        .into_iter()
        .map(|record| transform_listing(record, &directory_id, ListingView::Search))
        .collect();

    info!(directory = %directory_id, count = results.len(), "Search completed");

    Ok(json_ok(ResultsEnvelope::new(results), CachePolicy::Search))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_sanitizes_term() {
        assert_eq!(
            search_filter("acme", "100% off_deal's").to_string(),
            r"(Directory Identifier,eq,acme)~and((Title,like,%100\% off\_deals%)~or(Description,like,%100\% off\_deals%)~or(Content,like,%100\% off\_deals%))"
        );
    }
}
