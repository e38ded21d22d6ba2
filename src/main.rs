//! # Shelfmark CLI (`shelf`)
//!
//! The `shelf` binary lists and searches aggregated bookmarks and GitHub
//! stars.
//!
//! ## Usage
//!
//! ```bash
//! shelf bookmarks list
//! shelf bookmarks search "rust async"
//! shelf stars list --user rwjblue
//! shelf stars search tokio --user rwjblue
//! shelf cache --clear
//! ```
//!
//! Set `RUST_LOG=shelfmark=debug` for diagnostic output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use shelfmark::bookmarks;
use shelfmark::browser::BrowserRegistry;
use shelfmark::config::{self, Config};
use shelfmark::github::{self, GithubStars, StarService, SystemRunner, STARS_CACHE_FILE};
use shelfmark::store::{self, RecordStore};

/// Shelfmark — aggregate and search browser bookmarks and GitHub stars.
#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Aggregate and search browser bookmarks and GitHub stars",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Falls back to built-in defaults
    /// when the file does not exist.
    #[arg(long, global = true, default_value = "~/.config/shelfmark/shelf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Work with browser bookmarks.
    Bookmarks {
        #[command(subcommand)]
        action: BookmarksAction,
    },

    /// Work with GitHub stars.
    Stars {
        #[command(subcommand)]
        action: StarsAction,
    },

    /// Show the cache location, or clear it.
    Cache {
        /// Remove all cached files.
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum BookmarksAction {
    /// List bookmarks from all detected browsers.
    List {
        /// Browser profile name.
        #[arg(long)]
        profile: Option<String>,
    },
    /// Fuzzy-search bookmarks by title and URL.
    Search {
        /// Term to search for.
        term: String,
        /// Browser profile name.
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
enum StarsAction {
    /// List all starred repositories.
    List {
        /// GitHub user whose stars to list.
        #[arg(long)]
        user: Option<String>,
    },
    /// Fuzzy-search stars by repo, description, and URL.
    Search {
        /// Term to search for.
        term: String,
        /// GitHub user whose stars to search.
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config);

    match cli.command {
        Commands::Bookmarks { action } => match action {
            BookmarksAction::List { profile } => {
                run_bookmarks(&cfg, profile, "")?;
            }
            BookmarksAction::Search { term, profile } => {
                run_bookmarks(&cfg, profile, &term)?;
            }
        },
        Commands::Stars { action } => match action {
            StarsAction::List { user } => {
                run_stars(&cfg, user, "").await?;
            }
            StarsAction::Search { term, user } => {
                run_stars(&cfg, user, &term).await?;
            }
        },
        Commands::Cache { clear } => {
            run_cache(&cfg, clear)?;
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it is absent.
fn load_config(path: &Path) -> Config {
    let expanded = expand_home(path);
    if expanded.exists() {
        config::load_config(&expanded).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring unreadable config, using defaults");
            Config::minimal()
        })
    } else {
        Config::minimal()
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn run_bookmarks(cfg: &Config, profile: Option<String>, term: &str) -> Result<()> {
    let profile = profile.unwrap_or_else(|| cfg.browser.profile.clone());
    let registry = BrowserRegistry::with_defaults();

    let all = registry.all_bookmarks(&profile);
    let filtered = match bookmarks::filter_bookmarks(&all, term) {
        Ok(filtered) => filtered,
        Err(err) => {
            tracing::error!(%err, "bookmark filtering failed");
            Default::default()
        }
    };

    print!("{}", bookmarks::format_bookmarks(&filtered));
    Ok(())
}

async fn run_stars(cfg: &Config, user: Option<String>, term: &str) -> Result<()> {
    let user = user
        .or_else(|| cfg.github.user.clone())
        .ok_or_else(|| anyhow::anyhow!("a GitHub user is required (--user or [github].user)"))?;

    let token = match github::github_token(&SystemRunner) {
        Ok(token) if !token.is_empty() => Some(token),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(%err, "no gh token available, using unauthenticated requests");
            None
        }
    };

    let cache_dir = store::cache_dir(cfg)?;
    let store = RecordStore::open(&cache_dir, STARS_CACHE_FILE)?;
    let service = StarService::new(store, GithubStars::new(token)?, cfg.github.page_limit);

    let all = service.all_stars(&user).await?;
    let filtered = match github::filter_stars(&all, term) {
        Ok(filtered) => filtered,
        Err(err) => {
            tracing::error!(%err, "star filtering failed");
            Vec::new()
        }
    };

    print!("{}", github::format_stars(&filtered));
    Ok(())
}

fn run_cache(cfg: &Config, clear: bool) -> Result<()> {
    let cache_dir = store::cache_dir(cfg)?;

    if clear {
        let removed = store::clear_cache_dir(&cache_dir)?;
        println!("Cache cleared ({} files removed)", removed);
    } else {
        println!("Cache location: {}", cache_dir.display());
    }

    Ok(())
}
