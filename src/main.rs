//! # folio-server CLI (`foliod`)
//!
//! The `foliod` binary runs the content API server and provides a few
//! commands for poking at the configured Drive folders from a terminal.
//!
//! ## Usage
//!
//! ```bash
//! foliod --config ./foliod.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `foliod serve` | Start the content API HTTP server |
//! | `foliod check` | Verify credentials and probe configured folders |
//! | `foliod list <posts\|projects>` | Print a collection listing |
//! | `foliod show <id>` | Print a post's front matter and body |
//!
//! ## Examples
//!
//! ```bash
//! # Verify credentials and folder ids before first deploy
//! foliod check --config ./foliod.toml
//!
//! # See the post listing exactly as the API orders it
//! foliod list posts
//!
//! # Inspect one post's parsed front matter
//! foliod show 1AbCdEfGhIjKlMnOp
//!
//! # Run the server
//! foliod serve --config ./foliod.toml
//! ```

mod auth;
mod check;
mod config;
mod drive;
mod error;
mod fetch;
#[allow(dead_code)]
mod frontmatter;
mod listing;
mod models;
mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// folio-server CLI — a portfolio/blog backend serving Markdown posts and
/// PDF projects straight out of Google Drive.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file holding the server bind address, Drive credentials, and folder ids.
#[derive(Parser)]
#[command(
    name = "foliod",
    about = "folio-server — a portfolio/blog backend serving content straight out of Google Drive",
    version,
    long_about = "folio-server lists Markdown posts and PDF project documents from designated \
    Google Drive folders, joins thumbnails to content by file name, parses YAML front matter, \
    and exposes the result as a small JSON/binary HTTP API plus a few inspection commands."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./foliod.toml`. All server, credential, and folder
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./foliod.toml")]
    config: PathBuf,

    /// Enable debug output.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the content API HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// listing, content, and download endpoints until terminated.
    Serve,

    /// Verify credentials and folder configuration.
    ///
    /// Loads the service-account key, mints a token, and probes each
    /// configured folder with a one-item listing. Useful before a first
    /// deploy or after rotating credentials.
    Check,

    /// List a collection as the API would return it.
    ///
    /// Prints id, name, modified time, and whether a thumbnail matched,
    /// in the store's `modifiedTime desc` order.
    List {
        /// Collection to list: `posts` or `projects`.
        collection: String,
    },

    /// Fetch a post and print its front matter and body.
    Show {
        /// Drive file id of the post.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "foliod=debug,info"
    } else {
        "foliod=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Check => {
            check::run_check(&cfg).await?;
        }
        Commands::List { collection } => {
            listing::run_list(&cfg, &collection).await?;
        }
        Commands::Show { id } => {
            fetch::run_show(&cfg, &id).await?;
        }
    }

    Ok(())
}
