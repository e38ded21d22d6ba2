//! Cross-browser bookmark filtering and display.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::filter;
use crate::models::Bookmark;

/// Narrow an aggregated bookmark map by a free-text term via the fuzzy
/// filter, matching against title and URL.
///
/// Browsers whose bookmarks all miss are dropped from the result map.
pub fn filter_bookmarks(
    bookmarks: &BTreeMap<String, Vec<Bookmark>>,
    term: &str,
) -> Result<BTreeMap<String, Vec<Bookmark>>> {
    if term.is_empty() {
        return Ok(bookmarks.clone());
    }

    let entries: Vec<(&str, &Bookmark)> = bookmarks
        .iter()
        .flat_map(|(browser, list)| list.iter().map(move |b| (browser.as_str(), b)))
        .collect();

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (_, bookmark))| filter::encode_line(i, &[&bookmark.title, &bookmark.url]))
        .collect();

    let matched = filter::filter_strings(&lines, term)?;

    let mut result: BTreeMap<String, Vec<Bookmark>> = BTreeMap::new();
    for index in matched {
        let (browser, bookmark) = entries[index];
        result
            .entry(browser.to_string())
            .or_default()
            .push(bookmark.clone());
    }
    Ok(result)
}

/// Render an aggregated bookmark map as plain columns.
pub fn format_bookmarks(bookmarks: &BTreeMap<String, Vec<Bookmark>>) -> String {
    if bookmarks.values().all(|list| list.is_empty()) {
        return "No bookmarks found".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<32} {:<40} {:<24} {}\n",
        "BROWSER", "TITLE", "URL", "FOLDER", "DATE ADDED"
    ));
    for (browser, list) in bookmarks {
        for bookmark in list {
            out.push_str(&format!(
                "{:<10} {:<32} {:<40} {:<24} {}\n",
                browser,
                bookmark.title,
                bookmark.url,
                bookmark.folder_path,
                bookmark.date_added.format("%Y-%m-%d %H:%M:%S"),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bookmark(title: &str, url: &str) -> Bookmark {
        Bookmark {
            title: title.to_string(),
            url: url.to_string(),
            date_added: Utc::now(),
            folder_path: "Bookmark Bar".to_string(),
        }
    }

    fn sample() -> BTreeMap<String, Vec<Bookmark>> {
        let mut map = BTreeMap::new();
        map.insert(
            "Brave".to_string(),
            vec![
                bookmark("GitHub", "https://github.com"),
                bookmark("Example", "https://example.com"),
            ],
        );
        map.insert(
            "Chrome".to_string(),
            vec![bookmark("GitHub Docs", "https://docs.github.com")],
        );
        map
    }

    #[test]
    fn empty_term_returns_everything() {
        let all = sample();
        let filtered = filter_bookmarks(&all, "").unwrap();
        assert_eq!(filtered, all);
    }

    #[test]
    fn term_filters_across_browsers() {
        let filtered = filter_bookmarks(&sample(), "github").unwrap();

        assert_eq!(filtered["Brave"].len(), 1);
        assert_eq!(filtered["Brave"][0].title, "GitHub");
        assert_eq!(filtered["Chrome"].len(), 1);
        assert_eq!(filtered["Chrome"][0].title, "GitHub Docs");
    }

    #[test]
    fn browsers_with_no_matches_are_dropped() {
        let filtered = filter_bookmarks(&sample(), "example").unwrap();
        assert!(filtered.contains_key("Brave"));
        assert!(!filtered.contains_key("Chrome"));
    }

    #[test]
    fn format_reports_empty_map() {
        assert_eq!(format_bookmarks(&BTreeMap::new()), "No bookmarks found");
    }
}
