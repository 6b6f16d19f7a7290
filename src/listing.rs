//! Collection listing: posts and projects with thumbnail joins.
//!
//! Both listings follow the same steps: query the primary folder with a
//! MIME filter, drop items the filter let through that still are not the
//! right kind of file, list the sibling thumbnail folder, and join
//! thumbnails to items by extension-stripped name. Ordering comes from the
//! store (`modifiedTime desc`) and is never recomputed locally, so two
//! items sharing a timestamp keep whatever order the store chose.
//!
//! Used by both the HTTP list endpoints and the `foliod list` command.

use std::collections::HashMap;

use anyhow::Result;

use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::StoreError;
use crate::models::{ContentItem, DriveFile};

/// MIME filter for post listings. Plain text is included because the store
/// sniffs uploaded Markdown as `text/plain` often enough to matter; the
/// recovery filter below keeps only the `.md` ones.
const POSTS_MIME_FILTER: &str = "mimeType='text/markdown' or mimeType='text/plain'";

const PROJECTS_MIME_FILTER: &str = "mimeType='application/pdf'";

const LIST_ORDER: &str = "modifiedTime desc";

/// Listing projection beyond the always-included `id` and `name`.
const LIST_FIELDS: &[&str] = &["mimeType", "modifiedTime", "description"];

/// List Markdown posts, newest first, with thumbnails joined by name.
///
/// Post names keep their extension — the item name is the file name as
/// uploaded, and only the thumbnail join looks at the `.md`-stripped stem.
pub async fn list_posts(client: &DriveClient, config: &Config) -> Result<Vec<ContentItem>, StoreError> {
    let folder = config
        .content
        .posts_folder_id
        .as_deref()
        .ok_or(StoreError::MissingConfig("Posts folder ID"))?;
    let thumbs_folder = config
        .content
        .post_thumbnails_folder_id
        .as_deref()
        .ok_or(StoreError::MissingConfig("Post thumbnails folder ID"))?;

    let files = client
        .list_files(
            folder,
            Some(POSTS_MIME_FILTER),
            LIST_FIELDS,
            Some(LIST_ORDER),
            config.drive.page_size,
        )
        .await?;

    let thumbnails = client
        .list_files(thumbs_folder, None, &[], None, config.drive.page_size)
        .await?;

    Ok(join_posts(files, &thumbnail_url_map(&thumbnails)))
}

/// List PDF projects, newest first, with thumbnails joined by name.
///
/// Project names are display names: the `.pdf` extension is stripped.
pub async fn list_projects(
    client: &DriveClient,
    config: &Config,
) -> Result<Vec<ContentItem>, StoreError> {
    let folder = config
        .content
        .projects_folder_id
        .as_deref()
        .ok_or(StoreError::MissingConfig("Projects folder ID"))?;
    let thumbs_folder = config
        .content
        .project_thumbnails_folder_id
        .as_deref()
        .ok_or(StoreError::MissingConfig("Project thumbnails folder ID"))?;

    let files = client
        .list_files(
            folder,
            Some(PROJECTS_MIME_FILTER),
            LIST_FIELDS,
            Some(LIST_ORDER),
            config.drive.page_size,
        )
        .await?;

    let thumbnails = client
        .list_files(thumbs_folder, None, &[], None, config.drive.page_size)
        .await?;

    Ok(join_projects(files, &thumbnail_url_map(&thumbnails)))
}

/// Shape post records: keep names intact, join thumbnails on the
/// `.md`-stripped stem.
fn join_posts(files: Vec<DriveFile>, thumbnail_urls: &HashMap<String, String>) -> Vec<ContentItem> {
    files
        .into_iter()
        .filter(is_markdown_like)
        .map(|file| {
            let thumbnail_url = thumbnail_urls.get(strip_suffix(&file.name, ".md")).cloned();
            ContentItem {
                id: file.id,
                name: file.name,
                modified_time: file.modified_time,
                description: file.description,
                thumbnail_url,
            }
        })
        .collect()
}

/// Shape project records: strip `.pdf` from names, join thumbnails on the
/// stripped name.
fn join_projects(
    files: Vec<DriveFile>,
    thumbnail_urls: &HashMap<String, String>,
) -> Vec<ContentItem> {
    files
        .into_iter()
        .filter(|file| file.mime_type.as_deref() == Some("application/pdf"))
        .map(|file| {
            let name = strip_suffix(&file.name, ".pdf").to_string();
            let thumbnail_url = thumbnail_urls.get(name.as_str()).cloned();
            ContentItem {
                id: file.id,
                name,
                modified_time: file.modified_time,
                description: file.description,
                thumbnail_url,
            }
        })
        .collect()
}

/// `text/markdown`, or `text/plain` with a `.md` name — the latter recovers
/// Markdown the store sniffed as plain text.
fn is_markdown_like(file: &DriveFile) -> bool {
    match file.mime_type.as_deref() {
        Some("text/markdown") => true,
        Some("text/plain") => file.name.ends_with(".md"),
        _ => false,
    }
}

/// Map extension-stripped thumbnail names to direct-view URLs. When two
/// thumbnails share a stem, the later listing entry wins.
fn thumbnail_url_map(thumbnails: &[DriveFile]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for thumb in thumbnails {
        map.insert(strip_extension(&thumb.name).to_string(), thumbnail_url(&thumb.id));
    }
    map
}

/// Direct-view URL for a thumbnail file id.
fn thumbnail_url(id: &str) -> String {
    format!("https://drive.google.com/uc?export=view&id={}", id)
}

/// Drop the final `.ext` segment. The extension must be non-empty and must
/// not contain a slash; otherwise the name passes through unchanged.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// Drop a specific suffix; names without it pass through unchanged.
fn strip_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    name.strip_suffix(suffix).unwrap_or(name)
}

/// CLI entry point — lists a collection and prints a table.
pub async fn run_list(config: &Config, collection: &str) -> Result<()> {
    let client = DriveClient::from_config(config)?;
    let items = match collection {
        "posts" => list_posts(&client, config).await?,
        "projects" => list_projects(&client, config).await?,
        other => anyhow::bail!("unknown collection: '{}' (expected posts or projects)", other),
    };

    println!("{:<36} {:<22} {:<10} ID", "NAME", "MODIFIED", "THUMBNAIL");
    for item in &items {
        println!(
            "{:<36} {:<22} {:<10} {}",
            item.name,
            item.modified_time.as_deref().unwrap_or("-"),
            if item.thumbnail_url.is_some() { "yes" } else { "-" },
            item.id
        );
    }
    println!();
    println!("{} item(s)", items.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(id: &str, name: &str, mime: &str) -> DriveFile {
        DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: Some(mime.to_string()),
            modified_time: Some("2025-06-01T12:00:00.000Z".to_string()),
            description: None,
            web_view_link: None,
        }
    }

    #[test]
    fn test_join_posts_matches_thumbnails_by_stem() {
        let files = vec![
            make_file("p1", "first-post.md", "text/markdown"),
            make_file("p2", "second-post.md", "text/plain"),
        ];
        let thumbs = vec![make_file("t1", "first-post.png", "image/png")];
        let items = join_posts(files, &thumbnail_url_map(&thumbs));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "first-post.md");
        assert_eq!(
            items[0].thumbnail_url.as_deref(),
            Some("https://drive.google.com/uc?export=view&id=t1")
        );
        assert_eq!(items[1].thumbnail_url, None);
    }

    #[test]
    fn test_join_posts_drops_non_markdown_plain_text() {
        let files = vec![
            make_file("p1", "notes.txt", "text/plain"),
            make_file("p2", "real.md", "text/plain"),
        ];
        let items = join_posts(files, &HashMap::new());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "real.md");
    }

    #[test]
    fn test_join_projects_strips_pdf_extension() {
        let files = vec![
            make_file("d1", "compiler.pdf", "application/pdf"),
            make_file("d2", "stray.png", "image/png"),
        ];
        let thumbs = vec![make_file("t1", "compiler.jpg", "image/jpeg")];
        let items = join_projects(files, &thumbnail_url_map(&thumbs));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "compiler");
        assert_eq!(
            items[0].thumbnail_url.as_deref(),
            Some("https://drive.google.com/uc?export=view&id=t1")
        );
    }

    #[test]
    fn test_thumbnail_collision_last_wins() {
        let thumbs = vec![
            make_file("t1", "cover.png", "image/png"),
            make_file("t2", "cover.jpg", "image/jpeg"),
        ];
        let map = thumbnail_url_map(&thumbs);

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("cover").map(String::as_str),
            Some("https://drive.google.com/uc?export=view&id=t2")
        );
    }

    #[test]
    fn test_is_markdown_like() {
        assert!(is_markdown_like(&make_file("a", "x.md", "text/markdown")));
        assert!(is_markdown_like(&make_file("b", "x.md", "text/plain")));
        assert!(!is_markdown_like(&make_file("c", "x.txt", "text/plain")));
        assert!(!is_markdown_like(&make_file("d", "x.md", "image/png")));
    }

    #[test]
    fn test_strip_extension_edges() {
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension("trailing."), "trailing.");
        assert_eq!(strip_extension(".hidden"), "");
        assert_eq!(strip_extension("dir/like.name/x"), "dir/like.name/x");
    }

    #[test]
    fn test_empty_listing_joins_to_empty() {
        let items = join_posts(Vec::new(), &HashMap::new());
        assert!(items.is_empty());
    }
}
