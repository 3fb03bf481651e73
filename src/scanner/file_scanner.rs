//! Screenshot directory listing.
//!
//! `FileScanner` walks the screenshot directory and returns one
//! `ScreenshotFile` per recognized image. A missing or unreadable directory is
//! not an error for this feature: it simply yields no screenshots.

use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::models::{is_screenshot_extension, ScreenshotFile};

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum directory depth, 1 = only the directory itself.
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            follow_symlinks: false,
        }
    }
}

/// Lists screenshot files in a directory.
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Creates a new file scanner with default configuration.
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Creates a new file scanner with custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the screenshots in `dir`, sorted by path.
    pub fn scan(&self, dir: &Path) -> Vec<ScreenshotFile> {
        if !dir.is_dir() {
            debug!(?dir, "Screenshot directory missing, listing nothing");
            return Vec::new();
        }

        let files = Self::discover_files(dir, &self.config);
        info!("Found {} screenshots in {:?}", files.len(), dir);
        files
    }

    fn discover_files(dir: &Path, config: &ScanConfig) -> Vec<ScreenshotFile> {
        let walker = WalkDir::new(dir)
            .follow_links(config.follow_symlinks)
            .max_depth(config.max_depth.max(1));

        let mut files = Vec::new();

        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!(error = ?e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !is_screenshot_extension(ext) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!("Failed to read metadata for {:?}: {}", path, e);
                    continue;
                }
            };

            files.push(ScreenshotFile {
                path: path.to_path_buf(),
                size: metadata.len(),
            });
        }

        // Screenshot names start with a timestamp, so path order is capture order
        files.sort_by(|a, b| a.path.cmp(&b.path));

        files
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists the screenshots in `dir` with the default configuration.
pub fn scan_screenshots(dir: &Path) -> Vec<ScreenshotFile> {
    FileScanner::new().scan(dir)
}

/// Default screenshot directory: `screenshots/` under the user's picture
/// directory, or under the working directory when that is unknown.
pub fn default_screenshot_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(|p| p.join("Screenshots")))
        .unwrap_or_else(|| PathBuf::from("screenshots"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert_eq!(config.max_depth, 1);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_missing_dir_yields_nothing() {
        let dir = tempdir().unwrap();
        let files = scan_screenshots(&dir.path().join("does-not-exist"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_filters_to_screenshots() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.png")).unwrap();
        File::create(dir.path().join("a.PNG")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("photo.jpg")).unwrap();
        fs::create_dir(dir.path().join("folder.png")).unwrap();

        let files = scan_screenshots(dir.path());
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn test_not_recursive_by_default() {
        let dir = tempdir().unwrap();
        let subdir = dir.path().join("old");
        fs::create_dir(&subdir).unwrap();
        File::create(dir.path().join("root.png")).unwrap();
        File::create(subdir.join("nested.png")).unwrap();

        assert_eq!(scan_screenshots(dir.path()).len(), 1);

        let scanner = FileScanner::with_config(ScanConfig {
            max_depth: 2,
            ..Default::default()
        });
        assert_eq!(scanner.scan(dir.path()).len(), 2);
    }

    #[test]
    fn test_records_size() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("shot.png"), [0u8; 16]).unwrap();

        let files = scan_screenshots(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 16);
    }
}
