//! # folio-server
//!
//! A portfolio and blog backend that serves content straight out of Google
//! Drive. Authors drop Markdown posts and PDF project documents into
//! designated Drive folders; this service lists them, joins thumbnails by
//! file name, parses front matter, and exposes the result as a small JSON
//! and binary HTTP API for a client-rendered site.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │  Drive API   │◀──│ DriveClient │◀──│ Lister/Fetch │
//! │ (files, JWT) │   │ auth+errors │   │ join + parse │
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                             │
//!                              ┌──────────────┤
//!                              ▼              ▼
//!                        ┌──────────┐   ┌──────────┐
//!                        │   CLI    │   │   HTTP   │
//!                        │ (foliod) │   │  (axum)  │
//!                        └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! foliod check                  # verify credentials and folder ids
//! foliod list posts             # print the post listing
//! foliod show <file-id>         # print one post's front matter and body
//! foliod serve                  # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`auth`] | Service-account JWT flow and token cache |
//! | [`drive`] | Drive v3 API client with error classification |
//! | [`listing`] | Collection listing and thumbnail joins |
//! | [`fetch`] | Single-item retrieval and front-matter split |
//! | [`frontmatter`] | Fenced YAML block parsing |
//! | [`error`] | Pipeline error taxonomy |
//! | [`server`] | Content API HTTP server |
//! | [`check`] | Credential and folder connectivity probes |

pub mod auth;
pub mod check;
pub mod config;
pub mod drive;
pub mod error;
pub mod fetch;
pub mod frontmatter;
pub mod listing;
pub mod models;
pub mod server;
