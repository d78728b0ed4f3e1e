//! Request handlers

use axum::http::StatusCode;

use crate::error::{ApiError, Result};

pub mod directory;
pub mod health;
pub mod listings;
pub mod search;
pub mod webhook;

/// Plain-text 404 for anything no route accepts
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Decoded query string. A repeated key resolves to its first value.
#[derive(Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        Self(
            raw.map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
                .unwrap_or_default(),
        )
    }

    pub fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }
}

/// A query parameter that must be present and non-blank
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_parameter(message))
}
