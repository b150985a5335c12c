//! Path resolution for the settings and catalog files.
//!
//! Development runs pick up `mailsmith.yaml` and `templates.yaml` from
//! the working directory; otherwise files live in the platform config
//! directory. Explicit command-line paths win over both.

use std::path::PathBuf;

use tracing::debug;

const SETTINGS_FILE: &str = "mailsmith.yaml";
const CATALOG_FILE: &str = "templates.yaml";

/// Directory name used under the platform config and data directories.
const APP_DIR: &str = "mailsmith";

/// Resolved locations for settings, catalog, and log files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings: PathBuf,
    pub catalog: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the application paths.
    ///
    /// Explicit paths are taken as given. For the rest, a file present
    /// in the working directory wins, then the platform config
    /// directory.
    pub fn detect(settings: Option<PathBuf>, catalog: Option<PathBuf>) -> Self {
        let paths = Self {
            settings: settings.unwrap_or_else(|| resolve_file(SETTINGS_FILE)),
            catalog: catalog.unwrap_or_else(|| resolve_file(CATALOG_FILE)),
            logs_dir: dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
        };
        debug!(
            settings = %paths.settings.display(),
            catalog = %paths.catalog.display(),
            "resolved application paths"
        );
        paths
    }
}

fn resolve_file(name: &str) -> PathBuf {
    let local = PathBuf::from(name);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(name))
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let paths = AppPaths::detect(
            Some(PathBuf::from("/tmp/custom-settings.yaml")),
            Some(PathBuf::from("/tmp/custom-templates.yaml")),
        );
        assert_eq!(paths.settings, PathBuf::from("/tmp/custom-settings.yaml"));
        assert_eq!(paths.catalog, PathBuf::from("/tmp/custom-templates.yaml"));
    }

    #[test]
    fn detected_paths_end_with_the_expected_file_names() {
        let paths = AppPaths::detect(None, None);
        assert!(paths.settings.ends_with(SETTINGS_FILE));
        assert!(paths.catalog.ends_with(CATALOG_FILE));
    }
}
