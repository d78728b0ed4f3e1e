//! Success envelopes and response cache hints

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `Cache-Control` hint attached to a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Directory and listing reads: five minutes
    Standard,
    /// Search results go stale faster
    Search,
    None,
}

impl CachePolicy {
    pub fn max_age(self) -> Option<u32> {
        match self {
            CachePolicy::Standard => Some(300),
            CachePolicy::Search => Some(60),
            CachePolicy::None => None,
        }
    }
}

/// `{success: true, data}`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

/// `{success: true, results}`
#[derive(Debug, Serialize)]
pub struct ResultsEnvelope<T> {
    pub success: bool,
    pub results: Vec<T>,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggeredEnvelope {
    pub success: bool,
    pub message: String,
    pub deployment_id: String,
    pub directory: String,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T> ResultsEnvelope<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self {
            success: true,
            results,
        }
    }
}

/// Serialize `body` as a 200 JSON response with the given cache hint
pub fn json_ok<T: Serialize>(body: T, cache: CachePolicy) -> Response {
    let mut response = (StatusCode::OK, Json(body)).into_response();
    if let Some(max_age) = cache.max_age() {
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age)) {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
    }
    response
}
