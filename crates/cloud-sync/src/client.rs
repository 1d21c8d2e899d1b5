//! REST client for the PostgREST-style remote backend.
//!
//! Rows live under `{base}/rest/v1/{table}`; rows are addressed with
//! `id=eq.X&user_id=eq.Y` filters so a client can only ever touch its owner's
//! rows.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::RemoteConfig;
use crate::engine::{RemoteBackend, RemoteResult, RemoteRow, SyncIdentity};
use crate::error::{CloudSyncError, Result};
use crate::translator::{OWNER_COLUMN, REMOTE_ID_COLUMN};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

const APIKEY_HEADER: HeaderName = HeaderName::from_static("apikey");
const PREFER_HEADER: HeaderName = HeaderName::from_static("prefer");

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

#[derive(Debug, Clone)]
pub struct RestBackendClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestBackendClient {
    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("[Sync] API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("[Sync] API response error ({}): {}", status, preview);
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Project URL of the backend (e.g., "https://abc.supabase.co")
    /// * `api_key` - Public API key sent with every request
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(&config.api_url, &config.api_key)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn eq_filter(column: &str, value: &str) -> String {
        format!("{}=eq.{}", column, urlencoding::encode(value))
    }

    /// URL addressing one owned row.
    fn row_url(&self, table: &str, remote_id: &str, owner_id: &str) -> String {
        format!(
            "{}?{}&{}",
            self.table_url(table),
            Self::eq_filter(REMOTE_ID_COLUMN, remote_id),
            Self::eq_filter(OWNER_COLUMN, owner_id)
        )
    }

    /// Create headers for an API request.
    fn headers(&self, identity: &SyncIdentity, prefer: Option<&'static str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let key_value = HeaderValue::from_str(&self.api_key)
            .map_err(|_| CloudSyncError::config("Invalid API key format"))?;
        headers.insert(APIKEY_HEADER, key_value);

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", identity.access_token))
            .map_err(|_| CloudSyncError::invalid_request("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        if let Some(prefer) = prefer {
            headers.insert(PREFER_HEADER, HeaderValue::from_static(prefer));
        }

        Ok(headers)
    }

    /// Read the body, turning error statuses into `CloudSyncError::Api`.
    async fn response_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                let message = match error.code {
                    Some(code) => format!("{}: {}", code, error.message),
                    None => error.message,
                };
                return Err(CloudSyncError::api(status.as_u16(), message));
            }
            return Err(CloudSyncError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        Ok(body)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let body = Self::response_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "[Sync] Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            CloudSyncError::from(e)
        })
    }

    /// Insert one row and return the id the backend assigned.
    ///
    /// POST /rest/v1/{table}
    pub async fn insert_row(
        &self,
        identity: &SyncIdentity,
        table: &str,
        row: &RemoteRow,
    ) -> Result<String> {
        let url = self.table_url(table);
        debug!("[Sync] Inserting into {}", table);

        let response = self
            .client
            .post(&url)
            .headers(self.headers(identity, Some("return=representation"))?)
            .json(row)
            .send()
            .await?;

        let rows: Vec<RemoteRow> = Self::parse_response(response).await?;
        let id = rows
            .first()
            .and_then(|created| created.get(REMOTE_ID_COLUMN))
            .and_then(|id| match id {
                Value::String(id) => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .ok_or_else(|| {
                CloudSyncError::invalid_request(format!("Insert into {} returned no id", table))
            })?;
        Ok(id)
    }

    /// Update one owned row.
    ///
    /// PATCH /rest/v1/{table}?id=eq.{id}&user_id=eq.{owner}
    pub async fn update_row(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
        row: &RemoteRow,
    ) -> Result<()> {
        let url = self.row_url(table, remote_id, &identity.owner_id);

        let response = self
            .client
            .patch(&url)
            .headers(self.headers(identity, Some("return=minimal"))?)
            .json(row)
            .send()
            .await?;

        Self::response_body(response).await.map(|_| ())
    }

    /// Delete one owned row.
    ///
    /// DELETE /rest/v1/{table}?id=eq.{id}&user_id=eq.{owner}
    pub async fn delete_row(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
    ) -> Result<()> {
        let url = self.row_url(table, remote_id, &identity.owner_id);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers(identity, None)?)
            .send()
            .await?;

        Self::response_body(response).await.map(|_| ())
    }

    /// Every row of `table` owned by the identity.
    ///
    /// GET /rest/v1/{table}?select=*&user_id=eq.{owner}
    pub async fn select_rows(&self, identity: &SyncIdentity, table: &str) -> Result<Vec<RemoteRow>> {
        let url = format!(
            "{}?select=*&{}",
            self.table_url(table),
            Self::eq_filter(OWNER_COLUMN, &identity.owner_id)
        );

        let response = self
            .client
            .get(&url)
            .headers(self.headers(identity, None)?)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

#[async_trait]
impl RemoteBackend for RestBackendClient {
    async fn insert(
        &self,
        identity: &SyncIdentity,
        table: &str,
        row: &RemoteRow,
    ) -> RemoteResult<String> {
        Ok(self.insert_row(identity, table, row).await?)
    }

    async fn update(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
        row: &RemoteRow,
    ) -> RemoteResult<()> {
        Ok(self.update_row(identity, table, remote_id, row).await?)
    }

    async fn delete(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
    ) -> RemoteResult<()> {
        Ok(self.delete_row(identity, table, remote_id).await?)
    }

    async fn select_owned(
        &self,
        identity: &SyncIdentity,
        table: &str,
    ) -> RemoteResult<Vec<RemoteRow>> {
        Ok(self.select_rows(identity, table).await?)
    }
}
