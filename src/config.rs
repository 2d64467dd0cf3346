//! Workflow configuration: where decrypted artifacts land and which file
//! filters the dialogs advertise.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dialog::FileFilter;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Root under which `decrypted/<file_name>` artifacts are written.
    pub cache_root: PathBuf,
    /// Filters offered when picking the package file.
    pub package_filters: Vec<FileFilter>,
    /// Filters offered when picking the license file.
    pub license_filters: Vec<FileFilter>,
}

impl WorkflowConfig {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            package_filters: vec![FileFilter::new("Package file", &["bin", "self", "suprx"])],
            license_filters: vec![FileFilter::new("Software license file", &["bin", "rif"])],
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new("cache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters() {
        let config = WorkflowConfig::default();
        assert_eq!(config.cache_root, PathBuf::from("cache"));
        assert_eq!(config.package_filters.len(), 1);
        assert!(config.package_filters[0]
            .extensions
            .iter()
            .any(|e| e == "suprx"));
        assert!(config.license_filters[0]
            .extensions
            .iter()
            .any(|e| e == "rif"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = WorkflowConfig::new("/tmp/pkg-cache");
        let json = serde_json::to_string(&config).expect("Failed to serialize config");
        let back: WorkflowConfig =
            serde_json::from_str(&json).expect("Failed to deserialize config");
        assert_eq!(back, config);
    }
}
