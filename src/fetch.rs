//! Single-item content retrieval.
//!
//! Everything here is request-scoped: fetch, shape, return. A post is
//! downloaded and split into front matter and body; a project is either
//! relayed as a byte stream or reduced to a three-field metadata record;
//! the resume is a buffered download named by the store. Nothing is cached
//! between requests.

use anyhow::Result;
use bytes::Bytes;
use futures::Stream;

use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::StoreError;
use crate::frontmatter;
use crate::models::{DriveFile, ParsedDocument};

/// Projection for the project metadata endpoint.
const METADATA_FIELDS: &[&str] = &["name", "modifiedTime", "webViewLink"];

/// Fetch a Markdown post and split its front matter from the body.
pub async fn fetch_post(client: &DriveClient, file_id: &str) -> Result<ParsedDocument, StoreError> {
    let bytes = client.download(file_id).await?;
    document_from_bytes(&bytes)
}

/// Stream a project document's bytes without buffering.
pub async fn fetch_project_stream(
    client: &DriveClient,
    file_id: &str,
) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>>, StoreError> {
    client.download_stream(file_id).await
}

/// Fetch the name / modified / view-link triple for a project.
pub async fn fetch_project_metadata(
    client: &DriveClient,
    file_id: &str,
) -> Result<DriveFile, StoreError> {
    client.get_metadata(file_id, METADATA_FIELDS).await
}

/// Fetch the resume: the store-reported filename plus buffered bytes.
///
/// The metadata round-trip happens first so a missing file fails before
/// any content transfer starts.
pub async fn fetch_resume(
    client: &DriveClient,
    config: &Config,
) -> Result<(String, Bytes), StoreError> {
    let file_id = config
        .content
        .resume_file_id
        .as_deref()
        .ok_or(StoreError::MissingConfig("Resume file ID"))?;

    let metadata = client.get_metadata(file_id, &["name"]).await?;
    let bytes = client.download(file_id).await?;
    Ok((metadata.name, bytes))
}

/// Decode a downloaded post and split it. Drive serves whatever bytes were
/// uploaded, so non-UTF-8 content is an upstream fault, not a client one.
fn document_from_bytes(bytes: &[u8]) -> Result<ParsedDocument, StoreError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| StoreError::Upstream("post content is not valid UTF-8".to_string()))?;
    let (front_matter, body) = frontmatter::parse(text);
    Ok(ParsedDocument { front_matter, body })
}

/// CLI entry point — fetches a post and prints it to stdout.
pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let client = DriveClient::from_config(config)?;
    let doc = match fetch_post(&client, id).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("--- Front matter ---");
    if doc.front_matter.is_empty() {
        println!("(none)");
    } else {
        println!("{}", serde_json::to_string_pretty(&doc.front_matter)?);
    }
    println!();

    println!("--- Body ---");
    println!("{}", doc.body);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_bytes_splits_front_matter() {
        let doc = document_from_bytes(b"---\ntitle: Hi\n---\nbody here").unwrap();
        assert_eq!(doc.front_matter["title"], "Hi");
        assert_eq!(doc.body, "body here");
    }

    #[test]
    fn test_document_from_bytes_without_block() {
        let doc = document_from_bytes(b"just text").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "just text");
    }

    #[test]
    fn test_document_from_bytes_rejects_invalid_utf8() {
        let err = document_from_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, StoreError::Upstream(_)));
    }
}
