//! Core record types.
//!
//! Every record is a flat, serializable value with no cross-record
//! references. Bookmarks are re-derived from the browser export on every
//! call; stars are persisted in the cache file between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single browser bookmark, normalized out of a vendor export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    pub date_added: DateTime<Utc>,
    /// Joined ancestor folder names, rooted at the top-level container
    /// (e.g. `"Bookmark Bar/Work"`).
    pub folder_path: String,
}

/// A starred GitHub repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// The GitHub user who starred the repository.
    pub stargazer: String,
    /// Repository full name, `"owner/name"`.
    pub repo: String,
    /// Empty string when the repository has no description.
    pub description: String,
    pub url: String,
    /// Date-only (`YYYY-MM-DD`) formatting of the starred-at instant.
    pub starred_at: String,
}
