//! Screenshot discovery.

pub mod file_scanner;

pub use file_scanner::{default_screenshot_dir, scan_screenshots, FileScanner, ScanConfig};
