//! Client for the static-site hosting platform (Cloudflare Pages)

use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

/// Outcome of a deployment trigger
#[derive(Debug, Clone, PartialEq)]
pub struct BuildTriggerResult {
    pub success: bool,
    pub deployment_id: Option<String>,
    pub error: Option<Value>,
}

impl BuildTriggerResult {
    fn failed(error: Value) -> Self {
        Self {
            success: false,
            deployment_id: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesApiResponse {
    success: bool,
    errors: Option<Value>,
    result: Option<PagesDeployment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PagesDeployment {
    id: Option<String>,
}

/// Deployment trigger for one hosting account
#[derive(Debug, Clone)]
pub struct HostingClient<'a> {
    http: &'a Client,
    api_base_url: &'a str,
    api_token: &'a str,
    account_id: &'a str,
}

impl<'a> HostingClient<'a> {
    pub fn new(
        http: &'a Client,
        api_base_url: &'a str,
        api_token: &'a str,
        account_id: &'a str,
    ) -> Self {
        Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/'),
            api_token,
            account_id,
        }
    }

    /// Start a production deployment of `project`.
    ///
    /// Success is decided by the platform's `success` flag, not the HTTP
    /// status. Transport and decoding failures are reported as a failed result.
    pub async fn trigger_deployment(&self, project: &str) -> BuildTriggerResult {
        let url = format!(
            "{}/accounts/{}/pages/projects/{}/deployments",
            self.api_base_url, self.account_id, project
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&json!({ "production": { "enabled": true } }))
            .send()
            .await;

        let body = match response {
            Ok(response) => response.bytes().await,
            Err(e) => Err(e),
        };

        let body = match body {
            Ok(body) => body,
            Err(e) => {
                error!(project = project, error = %e, "Error triggering Pages build");
                return BuildTriggerResult::failed(Value::String(e.to_string()));
            }
        };

        let parsed: PagesApiResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(project = project, error = %e, "Unreadable response from Cloudflare API");
                return BuildTriggerResult::failed(Value::String(e.to_string()));
            }
        };

        if !parsed.success {
            let errors = parsed
                .errors
                .filter(|errors| !errors.is_null())
                .unwrap_or_else(|| Value::String("Unknown error from Cloudflare API".into()));
            error!(project = project, errors = %errors, "Cloudflare API error");
            return BuildTriggerResult::failed(errors);
        }

        let deployment_id = parsed
            .result
            .and_then(|deployment| deployment.id)
            .unwrap_or_else(|| "unknown".to_string());

        info!(project = project, deployment_id = %deployment_id, "Pages build triggered");

        BuildTriggerResult {
            success: true,
            deployment_id: Some(deployment_id),
            error: None,
        }
    }
}
