//! Google Drive v3 API client.
//!
//! A thin authenticated wrapper over the `files` endpoint exposing the four
//! primitives the content pipeline needs: folder-scoped listing, single-file
//! metadata, buffered download, and streamed download. Every non-2xx
//! response is parsed as the standard Google error body and mapped onto
//! [`StoreError`]. Drive signals permission problems two ways — a plain
//! HTTP 403, or an error array entry with `"reason": "forbidden"` — and
//! both surface as [`StoreError::AccessDenied`].
//!
//! # Configuration
//!
//! ```toml
//! [drive]
//! key_file = "./service-account.json"
//! # endpoint_url = "http://localhost:9000"   # test double / proxy
//! # access_token = "ya29...."                # skip the OAuth flow
//! ```
//!
//! # Endpoint Override
//!
//! `[drive].endpoint_url` replaces the `https://www.googleapis.com` origin,
//! the same way S3-compatible services take a custom endpoint. Paths and
//! query parameters are unchanged, so any stand-in only has to speak the
//! `drive/v3/files` shapes used here.

use bytes::Bytes;
use futures::Stream;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::auth::{DriveAuth, ServiceAccountKey};
use crate::config::Config;
use crate::error::StoreError;
use crate::models::DriveFile;

/// Default Google API origin.
const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com";

pub struct DriveClient {
    http: reqwest::Client,
    auth: DriveAuth,
    endpoint: String,
}

impl DriveClient {
    /// Build a client from configuration. Fails when credentials cannot be
    /// loaded — a process without working credentials must not start.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let auth = match &config.drive.access_token {
            Some(token) => DriveAuth::fixed_token(token.clone()),
            None => {
                let key = ServiceAccountKey::load(config.drive.key_file.as_deref())?;
                DriveAuth::service_account(key)?
            }
        };
        Ok(Self::new(auth, config.drive.endpoint_url.clone()))
    }

    pub fn new(auth: DriveAuth, endpoint_url: Option<String>) -> Self {
        let endpoint = endpoint_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self {
            http: reqwest::Client::new(),
            auth,
            endpoint,
        }
    }

    /// List files under a parent folder.
    ///
    /// `filter` is an extra Drive query fragment ANDed with the parent
    /// clause (usually a mimeType constraint). `fields` names the file
    /// attributes to request beyond `id` and `name`, which are always
    /// included. Returns a single page of at most `page_size` records; a
    /// `nextPageToken` in the response is ignored.
    pub async fn list_files(
        &self,
        parent_folder_id: &str,
        filter: Option<&str>,
        fields: &[&str],
        order_by: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<DriveFile>, StoreError> {
        require_file_id(parent_folder_id)?;

        let q = match filter {
            Some(expr) => format!(
                "'{}' in parents and ({})",
                escape_query_value(parent_folder_id),
                expr
            ),
            None => format!("'{}' in parents", escape_query_value(parent_folder_id)),
        };

        let mut query: Vec<(&str, String)> = vec![
            ("q", q),
            ("fields", file_list_fields(fields)),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(order) = order_by {
            query.push(("orderBy", order.to_string()));
        }

        let url = format!("{}/drive/v3/files", self.endpoint);
        let resp = self.get(&url, &query).await?;
        let listing: FileList = resp.json().await?;
        Ok(listing.files)
    }

    /// Fetch a single file's metadata, restricted to `fields`.
    pub async fn get_metadata(
        &self,
        file_id: &str,
        fields: &[&str],
    ) -> Result<DriveFile, StoreError> {
        require_file_id(file_id)?;
        let url = format!("{}/drive/v3/files/{}", self.endpoint, file_id);
        let resp = self.get(&url, &[("fields", fields.join(", "))]).await?;
        Ok(resp.json().await?)
    }

    /// Download a file's content, buffered in memory.
    pub async fn download(&self, file_id: &str) -> Result<Bytes, StoreError> {
        let resp = self.media_request(file_id).await?;
        Ok(resp.bytes().await?)
    }

    /// Download a file's content as a byte stream, relayed chunk by chunk.
    /// Dropping the stream closes the underlying connection, so an aborted
    /// consumer cannot leave a dangling transfer.
    pub async fn download_stream(
        &self,
        file_id: &str,
    ) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>>, StoreError> {
        let resp = self.media_request(file_id).await?;
        Ok(resp.bytes_stream())
    }

    async fn media_request(&self, file_id: &str) -> Result<reqwest::Response, StoreError> {
        require_file_id(file_id)?;
        let url = format!("{}/drive/v3/files/{}", self.endpoint, file_id);
        self.get(&url, &[("alt", "media".to_string())]).await
    }

    /// Issue an authenticated GET and map any non-2xx response onto the
    /// error taxonomy.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, StoreError> {
        let token = self.auth.bearer_token(&self.http).await?;
        let resp = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(classify_response(status, &body))
    }
}

/// One page of a Drive `files.list` response.
#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Map a non-2xx Drive response onto [`StoreError`].
fn classify_response(status: StatusCode, body: &str) -> StoreError {
    let reasons = error_reasons(body);

    if status == StatusCode::NOT_FOUND || reasons.iter().any(|r| r == "notFound") {
        return StoreError::NotFound;
    }
    if status == StatusCode::FORBIDDEN || reasons.iter().any(|r| r == "forbidden") {
        return StoreError::AccessDenied;
    }
    StoreError::Upstream(format!(
        "drive request failed (HTTP {}): {}",
        status,
        body.chars().take(300).collect::<String>()
    ))
}

/// Pull the `reason` codes out of a Google error body, tolerating any
/// deviation from the documented shape.
fn error_reasons(body: &str) -> Vec<String> {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    parsed["error"]["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["reason"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Reject ids that are empty or contain characters a Drive file id cannot
/// hold, before they are interpolated into a request path or query.
pub fn require_file_id(file_id: &str) -> Result<(), StoreError> {
    let valid = !file_id.is_empty()
        && file_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(file_id.to_string()))
    }
}

/// Build a `files(...)` projection, forcing `id` and `name` into it so
/// downstream joins always have both.
fn file_list_fields(fields: &[&str]) -> String {
    let mut names: Vec<&str> = vec!["id", "name"];
    for field in fields {
        if !names.contains(field) {
            names.push(field);
        }
    }
    format!("files({})", names.join(", "))
}

/// Escape a value for interpolation inside single quotes in a Drive query
/// expression.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_FOUND_BODY: &str = r#"{"error":{"code":404,"message":"File not found: abc.","errors":[{"message":"File not found: abc.","domain":"global","reason":"notFound"}]}}"#;
    const FORBIDDEN_BODY: &str = r#"{"error":{"code":403,"message":"The caller does not have permission","errors":[{"message":"The caller does not have permission","domain":"global","reason":"forbidden"}]}}"#;

    #[test]
    fn test_classify_not_found_by_status() {
        let err = classify_response(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_classify_not_found_by_reason() {
        let err = classify_response(StatusCode::BAD_REQUEST, NOT_FOUND_BODY);
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_classify_forbidden_by_status() {
        let err = classify_response(StatusCode::FORBIDDEN, "plain text denial");
        assert!(matches!(err, StoreError::AccessDenied));
    }

    #[test]
    fn test_classify_forbidden_by_reason_only() {
        // Some layers return the forbidden reason under a different status.
        let err = classify_response(StatusCode::BAD_REQUEST, FORBIDDEN_BODY);
        assert!(matches!(err, StoreError::AccessDenied));
    }

    #[test]
    fn test_classify_other_statuses_are_upstream() {
        let err = classify_response(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            StoreError::Upstream(msg) => {
                assert!(msg.contains("HTTP 500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn test_error_reasons_tolerates_malformed_bodies() {
        assert!(error_reasons("not json").is_empty());
        assert!(error_reasons(r#"{"error":"string"}"#).is_empty());
        assert!(error_reasons(r#"{"error":{"errors":{}}}"#).is_empty());
    }

    #[test]
    fn test_require_file_id() {
        assert!(require_file_id("1AbC-d_9").is_ok());
        assert!(require_file_id("").is_err());
        assert!(require_file_id("  ").is_err());
        assert!(require_file_id("../etc/passwd").is_err());
        assert!(require_file_id("abc?alt=media").is_err());
    }

    #[test]
    fn test_file_list_fields_forces_id_and_name() {
        assert_eq!(file_list_fields(&[]), "files(id, name)");
        assert_eq!(
            file_list_fields(&["mimeType", "name"]),
            "files(id, name, mimeType)"
        );
    }

    #[test]
    fn test_escape_query_value() {
        assert_eq!(escape_query_value("plain"), "plain");
        assert_eq!(escape_query_value("it's"), "it\\'s");
        assert_eq!(escape_query_value("back\\slash"), "back\\\\slash");
    }
}
