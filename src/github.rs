//! GitHub starred-repository ingestion.
//!
//! Stars are resolved cache-first: the local cache is read and filtered to
//! the requested stargazer, and only an empty result triggers a paginated
//! network fetch followed by a user-scoped merge back into the cache. A
//! user with genuinely zero stars therefore refetches on every call — the
//! cache format has no way to distinguish "no stars" from "never fetched".
//!
//! The network side is behind the [`StarFeed`] trait so tests can
//! substitute an in-memory page feed for the REST client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filter;
use crate::models::Star;
use crate::store::RecordStore;

/// Cache file name for star records.
pub const STARS_CACHE_FILE: &str = "stars.json";

const API_ROOT: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;

/// One entry of the starred-repositories listing.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredEntry {
    pub starred_at: DateTime<Utc>,
    pub repo: StarredRepo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StarredRepo {
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
}

/// A paginated source of starred repositories for a user.
#[async_trait]
pub trait StarFeed: Send + Sync {
    /// Fetch one page (1-based), returning the entries and whether another
    /// page may follow.
    async fn page(&self, user: &str, page: usize) -> Result<(Vec<StarredEntry>, bool)>;
}

/// REST client for the GitHub "list starred repositories" operation.
pub struct GithubStars {
    client: reqwest::Client,
    api_root: String,
    token: Option<String>,
}

impl GithubStars {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shelfmark/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_root: API_ROOT.to_string(),
            token,
        })
    }
}

#[async_trait]
impl StarFeed for GithubStars {
    async fn page(&self, user: &str, page: usize) -> Result<(Vec<StarredEntry>, bool)> {
        let url = format!("{}/users/{}/starred", self.api_root, user);
        let mut request = self
            .client
            .get(&url)
            // The star+json media type includes starred_at alongside the repo
            .header("Accept", "application/vnd.github.star+json")
            .query(&[
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
                ("sort", "created".to_string()),
                ("direction", "asc".to_string()),
            ]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let entries: Vec<StarredEntry> = response.json().await?;

        let has_next = entries.len() == PAGE_SIZE;
        Ok((entries, has_next))
    }
}

/// Cache-first retrieval of star records for a user.
pub struct StarService<F: StarFeed> {
    store: RecordStore<Star>,
    feed: F,
    page_limit: Option<usize>,
}

impl<F: StarFeed> StarService<F> {
    pub fn new(store: RecordStore<Star>, feed: F, page_limit: Option<usize>) -> Self {
        Self {
            store,
            feed,
            page_limit,
        }
    }

    /// All stars for `user`, preferring the local cache.
    ///
    /// An empty post-filter cache triggers a full network fetch and a
    /// merge-update scoped to this user; other users' cached entries are
    /// left untouched.
    pub async fn all_stars(&self, user: &str) -> Result<Vec<Star>> {
        let cached: Vec<Star> = self
            .store
            .read()?
            .into_iter()
            .filter(|star| star.stargazer == user)
            .collect();

        if !cached.is_empty() {
            tracing::debug!(user, count = cached.len(), "star cache hit");
            return Ok(cached);
        }

        tracing::debug!(user, "star cache empty, fetching from GitHub");
        let fetched = self.fetch_stars(user).await?;
        self.store
            .merge_update(|star| star.stargazer == user, fetched.clone())?;
        Ok(fetched)
    }

    /// Page through the remote listing, accumulating one record per
    /// starred repository. A failed page discards the whole fetch.
    pub async fn fetch_stars(&self, user: &str) -> Result<Vec<Star>> {
        let mut stars = Vec::new();
        let mut page = 1;

        loop {
            let (entries, has_next) = self.feed.page(user, page).await?;

            for entry in entries {
                stars.push(Star {
                    stargazer: user.to_string(),
                    repo: entry.repo.full_name,
                    description: entry.repo.description.unwrap_or_default(),
                    url: entry.repo.html_url,
                    starred_at: entry.starred_at.format("%Y-%m-%d").to_string(),
                });
            }

            if !has_next {
                break;
            }
            if let Some(limit) = self.page_limit {
                if page >= limit {
                    tracing::debug!(user, limit, "star page ceiling reached");
                    break;
                }
            }
            page += 1;
        }

        Ok(stars)
    }
}

/// Runs external commands. Injectable so tests can stub out `gh`.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<Vec<u8>>;
}

/// Runs commands via `std::process::Command`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<Vec<u8>> {
        let output = std::process::Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(std::io::Error::other(format!(
                "{} exited with {}",
                program, output.status
            )));
        }
        Ok(output.stdout)
    }
}

/// Obtain an auth token by running `gh auth token` and trimming its stdout.
///
/// The token is not validated or cached here.
pub fn github_token(runner: &dyn CommandRunner) -> Result<String> {
    let output = runner
        .run("gh", &["auth", "token"])
        .map_err(|err| Error::Config(format!("failed to run gh auth token: {}", err)))?;
    Ok(String::from_utf8_lossy(&output).trim().to_string())
}

/// Narrow a star list by a free-text term via the fuzzy filter, matching
/// against repo name, description, and URL.
pub fn filter_stars(stars: &[Star], term: &str) -> Result<Vec<Star>> {
    let lines: Vec<String> = stars
        .iter()
        .enumerate()
        .map(|(i, star)| filter::encode_line(i, &[&star.repo, &star.description, &star.url]))
        .collect();

    let matched = filter::filter_strings(&lines, term)?;
    Ok(matched.into_iter().map(|i| stars[i].clone()).collect())
}

/// Render stars as plain columns.
pub fn format_stars(stars: &[Star]) -> String {
    if stars.is_empty() {
        return "No stars found".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<40} {:<12} {}\n",
        "REPOSITORY", "STARRED", "DESCRIPTION"
    ));
    for star in stars {
        out.push_str(&format!(
            "{:<40} {:<12} {}\n",
            star.repo, star.starred_at, star.description
        ));
    }
    out
}
