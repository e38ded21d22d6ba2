//! Chromium-family bookmark sources.
//!
//! Chromium browsers (Brave, Chrome, Edge) all persist bookmarks as a JSON
//! document named `Bookmarks` inside the profile directory. The document
//! holds two top-level trees (`roots.bookmark_bar` and `roots.other`) of
//! nodes that are either a `"url"` leaf or a `"folder"` with children.
//!
//! Normalization walks both trees depth-first and emits one flat
//! [`Bookmark`] per URL node, annotated with the joined folder path. Vendor
//! timestamps count microseconds since 1601-01-01 (the Windows epoch) and
//! are converted to UTC instants; a node whose timestamp fails to parse is
//! skipped so one malformed entry cannot block the rest of the export.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::browser::BrowserSource;
use crate::error::{Error, Result};
use crate::models::Bookmark;

/// Microseconds between 1601-01-01 and 1970-01-01.
const WINDOWS_TO_UNIX_EPOCH_MICROS: i64 = 11_644_473_600 * 1_000_000;

#[derive(Debug, Deserialize)]
struct ExportDocument {
    roots: ExportRoots,
}

#[derive(Debug, Deserialize)]
struct ExportRoots {
    #[serde(default)]
    bookmark_bar: ExportRoot,
    #[serde(default)]
    other: ExportRoot,
}

#[derive(Debug, Deserialize, Default)]
struct ExportRoot {
    #[serde(default)]
    children: Vec<ExportNode>,
}

#[derive(Debug, Deserialize)]
struct ExportNode {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    date_added: RawTimestamp,
    #[serde(default)]
    children: Vec<ExportNode>,
}

/// The `date_added` field appears as a decimal string in the export, but
/// bare numbers are tolerated too. Any numeric literal deserializes; a
/// value that is not a whole `i64` fails at [`RawTimestamp::as_micros`],
/// where the per-node skip policy applies, never at document parse time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Numeric(serde_json::Number),
}

impl Default for RawTimestamp {
    fn default() -> Self {
        RawTimestamp::Text(String::new())
    }
}

impl RawTimestamp {
    fn as_micros(&self) -> Option<i64> {
        match self {
            RawTimestamp::Text(text) => text.parse().ok(),
            RawTimestamp::Numeric(value) => value.as_i64(),
        }
    }
}

/// Convert a vendor timestamp (microseconds since 1601-01-01) to UTC.
fn convert_vendor_timestamp(vendor_micros: i64) -> Option<DateTime<Utc>> {
    let unix_micros = vendor_micros - WINDOWS_TO_UNIX_EPOCH_MICROS;
    DateTime::from_timestamp_micros(unix_micros)
}

/// Parse a raw export document and flatten it into bookmark records.
pub fn normalize_export(data: &str) -> Result<Vec<Bookmark>> {
    let document: ExportDocument = serde_json::from_str(data)
        .map_err(|err| Error::Decode(format!("malformed bookmarks export: {}", err)))?;

    let mut bookmarks = Vec::new();
    walk_nodes(
        &document.roots.bookmark_bar.children,
        Path::new("Bookmark Bar"),
        &mut bookmarks,
    );
    walk_nodes(
        &document.roots.other.children,
        Path::new("Other Bookmarks"),
        &mut bookmarks,
    );
    Ok(bookmarks)
}

fn walk_nodes(nodes: &[ExportNode], folder: &Path, out: &mut Vec<Bookmark>) {
    for node in nodes {
        match node.kind.as_str() {
            "url" => {
                let Some(vendor_micros) = node.date_added.as_micros() else {
                    tracing::warn!(name = %node.name, "skipping bookmark with unparsable date_added");
                    continue;
                };
                let Some(date_added) = convert_vendor_timestamp(vendor_micros) else {
                    tracing::warn!(name = %node.name, vendor_micros, "skipping bookmark with out-of-range date_added");
                    continue;
                };

                out.push(Bookmark {
                    title: node.name.clone(),
                    url: node.url.clone(),
                    date_added,
                    folder_path: folder.to_string_lossy().into_owned(),
                });
            }
            "folder" if !node.children.is_empty() => {
                // Folder names are literal text: a leading separator must
                // not turn the join into an absolute path that discards
                // the accumulated prefix.
                let segment = node.name.trim_start_matches(['/', '\\']);
                walk_nodes(&node.children, &folder.join(segment), out);
            }
            _ => {}
        }
    }
}

/// One Chromium-family browser installation, identified by the vendor
/// directory it keeps profiles under on each OS family.
pub struct ChromiumBrowser {
    name: &'static str,
    linux_dir: &'static str,
    macos_dir: &'static str,
    windows_dir: &'static str,
    bookmarks_override: Option<PathBuf>,
}

impl ChromiumBrowser {
    pub fn brave() -> Self {
        Self {
            name: "Brave",
            linux_dir: "BraveSoftware/Brave-Browser",
            macos_dir: "BraveSoftware/Brave-Browser",
            windows_dir: "BraveSoftware/Brave-Browser",
            bookmarks_override: None,
        }
    }

    pub fn chrome() -> Self {
        Self {
            name: "Chrome",
            linux_dir: "google-chrome",
            macos_dir: "Google/Chrome",
            windows_dir: "Google/Chrome",
            bookmarks_override: None,
        }
    }

    pub fn edge() -> Self {
        Self {
            name: "Edge",
            linux_dir: "microsoft-edge",
            macos_dir: "Microsoft Edge",
            windows_dir: "Microsoft/Edge",
            bookmarks_override: None,
        }
    }

    /// Read bookmarks from a fixed file path instead of the platform
    /// default. Used in tests.
    pub fn with_bookmarks_path(mut self, path: PathBuf) -> Self {
        self.bookmarks_override = Some(path);
        self
    }

    /// Resolve the bookmarks file path for an explicit platform triple.
    fn bookmarks_path_for_platform(
        &self,
        os: &str,
        home: &Path,
        local_app_data: Option<&Path>,
        profile: &str,
    ) -> Result<PathBuf> {
        let vendor = |base: PathBuf, segments: &str| {
            segments.split('/').fold(base, |path, seg| path.join(seg))
        };

        match os {
            "windows" => {
                let base = local_app_data.ok_or_else(|| {
                    Error::Config("LOCALAPPDATA is not set".to_string())
                })?;
                Ok(vendor(base.to_path_buf(), self.windows_dir)
                    .join("User Data")
                    .join(profile)
                    .join("Bookmarks"))
            }
            "macos" => Ok(vendor(
                home.join("Library").join("Application Support"),
                self.macos_dir,
            )
            .join(profile)
            .join("Bookmarks")),
            "linux" => Ok(vendor(home.join(".config"), self.linux_dir)
                .join(profile)
                .join("Bookmarks")),
            other => Err(Error::Config(format!(
                "unsupported operating system: {}",
                other
            ))),
        }
    }

    fn bookmarks_path(&self, profile: &str) -> Result<PathBuf> {
        if let Some(path) = &self.bookmarks_override {
            return Ok(path.clone());
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;
        let local_app_data = std::env::var_os("LOCALAPPDATA").map(PathBuf::from);

        self.bookmarks_path_for_platform(
            std::env::consts::OS,
            &home,
            local_app_data.as_deref(),
            profile,
        )
    }
}

impl BrowserSource for ChromiumBrowser {
    fn name(&self) -> &str {
        self.name
    }

    fn bookmarks(&self, profile: &str) -> Result<Vec<Bookmark>> {
        let path = self.bookmarks_path(profile)?;
        if !path.exists() {
            return Err(Error::Config(format!(
                "{} bookmarks not found at {}",
                self.name,
                path.display()
            )));
        }

        let data = std::fs::read_to_string(&path)?;
        normalize_export(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_node(name: &str, url: &str, date_added: &str) -> String {
        format!(
            r#"{{ "type": "url", "name": "{}", "url": "{}", "date_added": "{}" }}"#,
            name, url, date_added
        )
    }

    fn export(bar_children: &str, other_children: &str) -> String {
        format!(
            r#"{{ "roots": {{
                "bookmark_bar": {{ "children": [{}] }},
                "other": {{ "children": [{}] }}
            }} }}"#,
            bar_children, other_children
        )
    }

    #[test]
    fn timestamp_conversion_follows_epoch_offset_formula() {
        let vendor_micros: i64 = 13214422057039153;
        let converted = convert_vendor_timestamp(vendor_micros).unwrap();

        let expected_unix_micros = vendor_micros - 11_644_473_600_000_000;
        assert_eq!(converted.timestamp_micros(), expected_unix_micros);
        assert_eq!(
            converted.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2019-10-01 16:47:37"
        );
    }

    #[test]
    fn normalizes_bar_folder_and_other_containers() {
        let data = export(
            &format!(
                "{}, {{ \"type\": \"folder\", \"name\": \"Work\", \"children\": [{}] }}",
                url_node("Example", "https://example.com", "13214422057039153"),
                url_node("GitHub", "https://github.com", "13214422057039153"),
            ),
            &url_node("Site", "https://othersite.com", "13214422057039153"),
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert_eq!(bookmarks.len(), 3);

        assert_eq!(bookmarks[0].title, "Example");
        assert_eq!(bookmarks[0].folder_path, "Bookmark Bar");

        assert_eq!(bookmarks[1].title, "GitHub");
        assert_eq!(
            bookmarks[1].folder_path,
            Path::new("Bookmark Bar").join("Work").to_string_lossy()
        );

        assert_eq!(bookmarks[2].title, "Site");
        assert_eq!(bookmarks[2].folder_path, "Other Bookmarks");
    }

    #[test]
    fn unparsable_timestamp_skips_only_that_node() {
        let data = export(
            &format!(
                "{}, {}",
                url_node("Broken", "https://broken.example", "not-a-number"),
                url_node("Valid", "https://valid.example", "13214422057039153"),
            ),
            "",
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].title, "Valid");
    }

    #[test]
    fn separator_prefixed_folder_name_keeps_the_container_prefix() {
        let data = export(
            &format!(
                "{{ \"type\": \"folder\", \"name\": \"/Sneaky\", \"children\": [{}] }}",
                url_node("Hidden", "https://hidden.example", "13214422057039153"),
            ),
            "",
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(
            bookmarks[0].folder_path,
            Path::new("Bookmark Bar").join("Sneaky").to_string_lossy()
        );
    }

    #[test]
    fn non_integer_numeric_timestamp_skips_only_that_node() {
        let data = export(
            &format!(
                "{}, {}",
                r#"{ "type": "url", "name": "Float", "url": "https://f.example", "date_added": 1.5 }"#,
                url_node("Valid", "https://valid.example", "13214422057039153"),
            ),
            "",
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].title, "Valid");
    }

    #[test]
    fn empty_folder_contributes_nothing() {
        let data = export(
            r#"{ "type": "folder", "name": "Empty", "children": [] }"#,
            "",
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn malformed_document_is_a_decode_error() {
        let err = normalize_export("{ \"roots\": 42 }").unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn numeric_date_added_is_accepted() {
        let data = export(
            r#"{ "type": "url", "name": "Numeric", "url": "https://n.example", "date_added": 13214422057039153 }"#,
            "",
        );

        let bookmarks = normalize_export(&data).unwrap();
        assert_eq!(bookmarks.len(), 1);
    }

    #[test]
    fn platform_paths_cover_three_os_families() {
        let brave = ChromiumBrowser::brave();
        let home = Path::new("/home/user");

        let linux = brave
            .bookmarks_path_for_platform("linux", home, None, "Default")
            .unwrap();
        assert_eq!(
            linux,
            Path::new("/home/user/.config/BraveSoftware/Brave-Browser/Default/Bookmarks")
        );

        let macos = brave
            .bookmarks_path_for_platform("macos", home, None, "Default")
            .unwrap();
        assert_eq!(
            macos,
            Path::new(
                "/home/user/Library/Application Support/BraveSoftware/Brave-Browser/Default/Bookmarks"
            )
        );

        let windows = brave
            .bookmarks_path_for_platform(
                "windows",
                home,
                Some(Path::new("/appdata/local")),
                "Default",
            )
            .unwrap();
        assert_eq!(
            windows,
            Path::new("/appdata/local/BraveSoftware/Brave-Browser/User Data/Default/Bookmarks")
        );
    }

    #[test]
    fn unsupported_platform_is_a_config_error() {
        let brave = ChromiumBrowser::brave();
        let err = brave
            .bookmarks_path_for_platform("freebsd", Path::new("/home/user"), None, "Default")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    }

    #[test]
    fn missing_bookmarks_file_is_a_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let browser = ChromiumBrowser::brave()
            .with_bookmarks_path(tmp.path().join("Bookmarks"));

        let err = browser.bookmarks("Default").unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    }
}
