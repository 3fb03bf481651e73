use std::path::PathBuf;

/// File extensions the game writes screenshots with.
pub const SCREENSHOT_EXTENSIONS: &[&str] = &["png"];

pub fn is_screenshot_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    SCREENSHOT_EXTENSIONS.contains(&ext.as_str())
}

/// One screenshot file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ScreenshotFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            size: 0,
        }
    }

    /// File name for display; falls back to the full path when it has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File size rounded for display, e.g. `"1.4 MiB"`.
    pub fn size_label(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} B", self.size)
        } else {
            format!("{:.1} {}", value, UNITS[unit])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching() {
        assert!(is_screenshot_extension("png"));
        assert!(is_screenshot_extension("PNG"));
        assert!(!is_screenshot_extension("jpg"));
        assert!(!is_screenshot_extension(""));
    }

    #[test]
    fn test_file_name() {
        let file = ScreenshotFile::new(PathBuf::from("/shots/2024-01-02_10.11.12.png"));
        assert_eq!(file.file_name(), "2024-01-02_10.11.12.png");
    }

    #[test]
    fn test_size_label() {
        let mut file = ScreenshotFile::new(PathBuf::from("shot.png"));
        assert_eq!(file.size_label(), "0 B");
        file.size = 1023;
        assert_eq!(file.size_label(), "1023 B");
        file.size = 1536;
        assert_eq!(file.size_label(), "1.5 KiB");
        file.size = 3 * 1024 * 1024;
        assert_eq!(file.size_label(), "3.0 MiB");
    }
}
