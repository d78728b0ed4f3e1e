//! Client for the low-code database backend (NocoDB v2 REST API)

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{ApiError, Result},
    filter::Filter,
    models::RecordList,
};

const SERVICE_NAME: &str = "NocoDB";

/// Filtered reads against backend tables, authenticated with `xc-token`
#[derive(Debug, Clone)]
pub struct BackendClient<'a> {
    http: &'a Client,
    api_url: &'a str,
    token: &'a str,
}

impl<'a> BackendClient<'a> {
    pub fn new(http: &'a Client, api_url: &'a str, token: &'a str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/'),
            token,
        }
    }

    /// Fetch the records of `table` matching `filter`.
    ///
    /// `limit` is forwarded as-is; `None` leaves paging to the backend.
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &Filter,
        limit: Option<u32>,
    ) -> Result<Vec<T>> {
        let url = format!("{}/tables/{}/records", self.api_url, table);
        let mut query = vec![("where", filter.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        debug!(table = table, filter = %filter, "Querying backend records");

        let response = self
            .http
            .get(&url)
            .header("xc-token", self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default();
            return Err(ApiError::upstream(
                SERVICE_NAME,
                format!("{} {}", status.as_u16(), reason).trim_end(),
            ));
        }

        let body = response.bytes().await?;
        let page: RecordList<T> = serde_json::from_slice(&body)?;

        debug!(table = table, count = page.list.len(), "Backend records received");
        Ok(page.list)
    }
}
