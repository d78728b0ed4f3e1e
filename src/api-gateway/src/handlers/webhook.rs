//! `POST /api/directory-webhook`
//!
//! Receives backend change notifications and triggers a rebuild of the
//! affected directory site.

use axum::{body::Bytes, extract::State, response::Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::{deployment_project_name, tables},
    envelope::{json_ok, BuildTriggeredEnvelope, CachePolicy},
    error::{ApiError, Result},
    models::WebhookPayload,
    state::AppState,
};

/// Backend table a notification originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Directories,
    Listings,
    LandingPages,
    Unknown,
}

impl SourceTable {
    pub fn from_id(table_id: Option<&str>) -> Self {
        match table_id {
            Some(tables::DIRECTORIES) => SourceTable::Directories,
            Some(tables::LISTINGS) => SourceTable::Listings,
            Some(tables::LANDING_PAGES) => SourceTable::LandingPages,
            _ => SourceTable::Unknown,
        }
    }

    /// Row field holding the directory identifier
    pub fn identifier_field(self) -> &'static str {
        match self {
            SourceTable::Directories => "Identifier",
            SourceTable::Listings | SourceTable::LandingPages | SourceTable::Unknown => {
                "Directory Identifier"
            }
        }
    }
}

/// Directory affected by a change notification, read from the first row
pub fn extract_directory_id(payload: &WebhookPayload) -> Option<String> {
    let table = SourceTable::from_id(payload.table_id());
    if table == SourceTable::Unknown {
        warn!(
            table = ?payload.table_id(),
            "Webhook from unrecognized table, falling back to Directory Identifier"
        );
    }
    payload.first_row_text(table.identifier_field())
}

pub async fn directory_webhook(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let raw: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::from(e).during("webhook"))?;
    debug!(payload = %raw, "Received webhook payload");

    let payload: WebhookPayload = serde_json::from_value(raw).unwrap_or_default();
    let directory_id = extract_directory_id(&payload).ok_or(ApiError::UnresolvedDirectory)?;
    info!(directory = %directory_id, "Identified directory");

    let hosting = state.hosting()?;
    let project = deployment_project_name(&directory_id);

    let result = hosting.trigger_deployment(&project).await;
    if !result.success {
        return Err(ApiError::build_trigger(
            project,
            result.error.unwrap_or(Value::Null),
        ));
    }

    Ok(json_ok(
        BuildTriggeredEnvelope {
            success: true,
            message: format!("Build triggered for {}", project),
            deployment_id: result.deployment_id.unwrap_or_else(|| "unknown".to_string()),
            directory: directory_id,
        },
        CachePolicy::None,
    ))
}
