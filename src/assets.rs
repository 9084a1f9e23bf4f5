//! Static asset allowlist
//!
//! Paths that are served verbatim from the asset root when no route matches.
//! The content type comes from the table, not from the file extension, and
//! no path outside the table is ever read.

use std::path::{Path, PathBuf};
use tokio::fs;

/// One allowlisted asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetEntry {
    pub path: &'static str,
    pub content_type: &'static str,
}

const fn css(path: &'static str) -> AssetEntry {
    AssetEntry {
        path,
        content_type: "text/css",
    }
}

const fn png(path: &'static str) -> AssetEntry {
    AssetEntry {
        path,
        content_type: "image/png",
    }
}

/// The allowlist
///
/// `archlogo.gif` and `favicon.ico` are served as `image/png` on purpose.
pub const ASSETS: &[AssetEntry] = &[
    // Stylesheets
    css("/css/archweb.css"),
    css("/css/aur.css"),
    css("/css/archnavbar/archnavbar.css"),
    // Images
    png("/css/archnavbar/archlogo.gif"),
    png("/images/new.png"),
    png("/css/archnavbar/archlogo.png"),
    png("/images/AUR-logo-80.png"),
    png("/images/AUR-logo.png"),
    png("/images/favicon.ico"),
    png("/images/feed-icon-14x14.png"),
    png("/images/titlelogo.png"),
    png("/images/x.png"),
];

/// Exact-string lookup in the allowlist
pub fn find(path: &str) -> Option<&'static AssetEntry> {
    ASSETS.iter().find(|entry| entry.path == path)
}

impl AssetEntry {
    /// Location of this asset under `root`
    pub fn file_path(&self, root: &Path) -> PathBuf {
        root.join(self.path.trim_start_matches('/'))
    }

    /// Read the asset bytes from under `root`
    pub async fn load(&self, root: &Path) -> std::io::Result<Vec<u8>> {
        fs::read(self.file_path(root)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_exact_only() {
        assert_eq!(find("/css/aur.css").map(|e| e.content_type), Some("text/css"));
        assert!(find("/css/aur.css/").is_none());
        assert!(find("css/aur.css").is_none());
        assert!(find("/css/../css/aur.css").is_none());
        assert!(find("/css/other.css").is_none());
    }

    #[test]
    fn test_fixed_content_types() {
        assert_eq!(
            find("/images/favicon.ico").map(|e| e.content_type),
            Some("image/png")
        );
        assert_eq!(
            find("/css/archnavbar/archlogo.gif").map(|e| e.content_type),
            Some("image/png")
        );
        assert_eq!(
            find("/css/archnavbar/archnavbar.css").map(|e| e.content_type),
            Some("text/css")
        );
    }

    #[test]
    fn test_table_paths_are_unique_and_rooted() {
        for (i, entry) in ASSETS.iter().enumerate() {
            assert!(entry.path.starts_with('/'));
            assert!(!entry.path.contains(".."));
            assert!(ASSETS[i + 1..].iter().all(|other| other.path != entry.path));
        }
        assert_eq!(ASSETS.len(), 12);
    }

    #[test]
    fn test_file_path_stays_under_root() {
        let entry = find("/images/x.png").unwrap();
        assert_eq!(
            entry.file_path(Path::new("/srv/web")),
            PathBuf::from("/srv/web/images/x.png")
        );
    }
}
