//! Startup paths and environment.

use std::path::{Path, PathBuf};

use xhs_core::SettingsMap;

pub const ROOT_ENV: &str = "XHS_ROOT";

pub const USERAGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Root directory holding `settings.json`: `$XHS_ROOT`, else the platform
/// config dir.
pub fn root_dir() -> Option<PathBuf> {
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(root));
    }
    dirs::config_dir().map(|d| d.join("xhs-downloader"))
}

/// Download folder named by the settings: `<work_path or root>/<folder_name>`.
pub fn download_dir(root: &Path, settings: &SettingsMap) -> PathBuf {
    let work_path = settings
        .get("work_path")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| root.to_path_buf());
    let folder_name = settings
        .get("folder_name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Download");
    work_path.join(folder_name)
}
