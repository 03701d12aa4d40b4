//! Sentry HTTP client

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::config::SentryConfig;


const MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_SECS: u64 = 5;
const USER_AGENT: &str = concat!("sentry-mcp/", env!("CARGO_PKG_VERSION"));

/// Non-success HTTP response from the Sentry API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    #[error("Sentry auth_token not configured")]
    MissingToken,
}

/// Sentry API trait for testability
///
/// Every method returns the decoded JSON body untouched.
pub trait SentryApi: Send + Sync {
    /// List projects of an organization
    fn list_projects(&self, org: &str) -> impl Future<Output = Result<Value>> + Send;

    /// List issues for a specific project
    fn list_project_issues(
        &self,
        org: &str,
        project: &str,
        query: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Get a single issue by ID or short ID
    fn get_issue(&self, org: &str, issue_id: &str) -> impl Future<Output = Result<Value>> + Send;

    /// List events for an issue, with full payloads
    fn list_issue_events(
        &self,
        org: &str,
        issue_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Get one event of an issue (`latest`, `oldest` or an event ID)
    fn get_issue_event(
        &self,
        org: &str,
        issue_id: &str,
        event_id: &str,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Sentry API client
pub struct SentryClient {
    config: SentryConfig,
    http: Client,
}

impl SentryClient {
    /// Create a client for an already-loaded configuration
    pub fn new(config: SentryConfig) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { config, http })
    }

    /// Get config reference
    pub fn config(&self) -> &SentryConfig {
        &self.config
    }

    fn auth_token(&self) -> Result<&str> {
        self.config
            .auth_token
            .as_deref()
            .ok_or_else(|| ApiError::MissingToken.into())
    }

    fn url(&self, segments: &[&str]) -> String {
        build_url(&self.config.api_base(), segments)
    }

    /// Make a GET request with parameters
    async fn get_with_params(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let token = self.auth_token()?.to_string();
        tracing::debug!(url, "sentry request");

        self.execute_with_retry(|| {
            self.http
                .get(url)
                .bearer_auth(&token)
                .query(params)
                .send()
        })
        .await
    }

    /// Execute request with retry on rate limit
    async fn execute_with_retry<F, Fut>(&self, request_fn: F) -> Result<Value>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retries = 0;

        loop {
            let response = request_fn().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retries >= MAX_RETRIES {
                    return Err(ApiError::RateLimited(MAX_RETRIES).into());
                }

                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_retry_after)
                    .unwrap_or(DEFAULT_RETRY_SECS);

                tracing::warn!(
                    retry_after,
                    attempt = retries + 1,
                    max = MAX_RETRIES,
                    "rate limited by Sentry, waiting"
                );
                sleep(Duration::from_secs(retry_after)).await;
                retries += 1;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            let text = response.text().await?;
            return serde_json::from_str(&text).map_err(|e| {
                anyhow::anyhow!("Parse error: {}: {}", e, truncate_body(&text, 200))
            });
        }
    }
}

impl SentryApi for SentryClient {
    async fn list_projects(&self, org: &str) -> Result<Value> {
        let url = self.url(&["organizations", org, "projects"]);
        self.get_with_params(&url, &[]).await
    }

    async fn list_project_issues(
        &self,
        org: &str,
        project: &str,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Value> {
        let url = self.url(&["projects", org, project, "issues"]);
        self.get_with_params(&url, &issue_params(query, limit)).await
    }

    async fn get_issue(&self, org: &str, issue_id: &str) -> Result<Value> {
        let url = self.url(&["organizations", org, "issues", issue_id]);
        self.get_with_params(&url, &[]).await
    }

    async fn list_issue_events(&self, org: &str, issue_id: &str, limit: usize) -> Result<Value> {
        let url = self.url(&["organizations", org, "issues", issue_id, "events"]);
        self.get_with_params(&url, &event_params(limit)).await
    }

    async fn get_issue_event(&self, org: &str, issue_id: &str, event_id: &str) -> Result<Value> {
        let url = self.url(&["organizations", org, "issues", issue_id, "events", event_id]);
        self.get_with_params(&url, &[]).await
    }
}

/// Join percent-encoded path segments onto the API base, with trailing slash
fn build_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url.push('/');
    url
}

fn issue_params(query: Option<&str>, limit: usize) -> Vec<(&'static str, String)> {
    let mut params = vec![("limit", limit.to_string()), ("statsPeriod", "24h".to_string())];
    if let Some(q) = query {
        params.push(("query", q.to_string()));
    }
    params
}

fn event_params(limit: usize) -> Vec<(&'static str, String)> {
    vec![("limit", limit.to_string()), ("full", "true".to_string())]
}

fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn truncate_body(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
