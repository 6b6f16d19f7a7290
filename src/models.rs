//! Core data models used throughout folio-server.
//!
//! These types represent the file records, listing entries, and parsed
//! documents that flow from the Drive API out to the HTTP layer. All wire
//! names are camelCase to match both the Drive v3 `files` resource and the
//! public API responses.

use serde::{Deserialize, Serialize};

/// Subset of a Drive v3 `files` resource.
///
/// Only the attributes this service ever puts in a `fields` projection;
/// anything else the API returns is ignored. All fields default so a
/// narrow projection (e.g. `name` only) still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}

/// A listed post or project, ready for display.
///
/// `thumbnail_url` is computed by the name join at listing time and never
/// stored anywhere. `modified_time` is the store's RFC 3339 string, passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// A fetched Markdown document split into front matter and body.
///
/// `front_matter` preserves the key order of the original YAML block; it is
/// empty when the document has no well-formed block. The split is re-derived
/// on every fetch — nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub front_matter: serde_json::Map<String, serde_json::Value>,
    pub body: String,
}
