//! # Shelfmark
//!
//! A local-first aggregator for personal productivity records: browser
//! bookmarks and starred GitHub repositories, collected from multiple
//! sources into a uniform, fuzzy-searchable, locally cached collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Browsers    │──▶│  Normalize    │──▶│             │
//! │ Brave/Chrome │   │ (per query)  │   │   Fuzzy     │
//! └──────────────┘   └──────────────┘   │   filter    │──▶ CLI (shelf)
//! ┌──────────────┐   ┌──────────────┐   │             │
//! │  GitHub API  │──▶│  JSON cache   │──▶│             │
//! └──────────────┘   └──────────────┘   └─────────────┘
//! ```
//!
//! Bookmarks are re-derived from each browser's export file on every call;
//! stars are cached in `~/.cache/shelfmark/stars.json` and refreshed from
//! the network only when the cache has nothing for the requested user.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core record types |
//! | [`store`] | Generic JSON-array record store with merge-update |
//! | [`browser`] | Browser source trait and registry |
//! | [`chromium`] | Chromium-family bookmark normalization |
//! | [`bookmarks`] | Cross-browser filtering and display |
//! | [`github`] | Star ingestion: cache-first policy and REST client |
//! | [`filter`] | Fuzzy-filter adapter |
//! | [`error`] | Library error types |

pub mod bookmarks;
pub mod browser;
pub mod chromium;
pub mod config;
pub mod error;
pub mod filter;
pub mod github;
pub mod models;
pub mod store;

pub use error::{Error, Result};
