//! Data directory layout.

use std::path::{Path, PathBuf};

/// Default data directory name under the home directory.
pub const DEFAULT_DATA_DIR: &str = ".kitchen-briefing";

/// Location list file inside the data directory.
pub const LOCATIONS_FILE: &str = "locations.json";

/// Feed directory inside the data directory.
pub const FEEDS_DIR: &str = "feeds";

/// Get the default data directory.
///
/// `~/.kitchen-briefing` if a home directory is available, otherwise
/// `.kitchen-briefing` in the current directory.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn locations_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LOCATIONS_FILE)
}

pub fn feeds_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(FEEDS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_name() {
        assert!(default_data_dir().ends_with(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_layout() {
        let base = Path::new("/srv/briefing");
        assert_eq!(locations_file(base), PathBuf::from("/srv/briefing/locations.json"));
        assert_eq!(feeds_dir(base), PathBuf::from("/srv/briefing/feeds"));
    }
}
