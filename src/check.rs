//! Configuration and connectivity checks for `foliod check`.
//!
//! Verifies that credentials load and that every configured folder and file
//! id is reachable with the smallest possible request: a one-item listing
//! for folders, a name-only metadata fetch for the resume.

use anyhow::Result;

use crate::config::Config;
use crate::drive::DriveClient;

pub async fn run_check(config: &Config) -> Result<()> {
    let client = match DriveClient::from_config(config) {
        Ok(client) => {
            println!("credentials: OK");
            client
        }
        Err(e) => {
            println!("credentials: ERROR ({})", e);
            return Ok(());
        }
    };

    println!();
    println!("{:<28} {:<16} DETAIL", "TARGET", "STATUS");

    let folders = [
        ("posts folder", &config.content.posts_folder_id),
        (
            "post thumbnails folder",
            &config.content.post_thumbnails_folder_id,
        ),
        ("projects folder", &config.content.projects_folder_id),
        (
            "project thumbnails folder",
            &config.content.project_thumbnails_folder_id,
        ),
    ];

    for (label, id) in folders {
        match id {
            Some(folder_id) => match client.list_files(folder_id, None, &[], None, 1).await {
                Ok(_) => println!("{:<28} {:<16} -", label, "OK"),
                Err(e) => println!("{:<28} {:<16} {}", label, "ERROR", e),
            },
            None => println!("{:<28} {:<16} -", label, "NOT CONFIGURED"),
        }
    }

    match &config.content.resume_file_id {
        Some(file_id) => match client.get_metadata(file_id, &["name"]).await {
            Ok(file) => println!("{:<28} {:<16} {}", "resume file", "OK", file.name),
            Err(e) => println!("{:<28} {:<16} {}", "resume file", "ERROR", e),
        },
        None => println!("{:<28} {:<16} -", "resume file", "NOT CONFIGURED"),
    }

    Ok(())
}
