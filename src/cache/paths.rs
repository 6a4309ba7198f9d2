// Cache path utilities.
// Locates the per-user directory holding the cached catalogue, filters and log.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/ecoview on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ecoview").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the cached catalogue document.
pub fn catalog_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("catalog.json"))
}

/// Path to the persisted search/tag filters.
pub fn filters_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("filters.json"))
}

/// Path to the default log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("ecoview.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_paths() {
        // Path construction only, nothing is created on disk
        let Some(dir) = cache_dir() else {
            return;
        };

        assert_eq!(catalog_path().unwrap(), dir.join("catalog.json"));
        assert_eq!(filters_path().unwrap(), dir.join("filters.json"));
        assert!(log_path().unwrap().ends_with("ecoview.log"));
    }
}
