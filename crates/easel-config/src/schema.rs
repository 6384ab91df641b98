//! Configuration schema types for the Easel shell.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the shell.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    pub packages: PackagesConfig,
    pub window: WindowConfig,
    pub profiles: ProfilesConfig,
    pub watch: WatchConfig,
    pub logging: LoggingConfig,
}

/// Package discovery and startup loading.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PackagesConfig {
    /// Directories scanned for `<name>/package.json` when resolving dependencies.
    pub search_paths: Vec<PathBuf>,
    /// Package roots loaded at startup, in order.
    pub autoload: Vec<PathBuf>,
}

/// Fallback window geometry, used when a layout or manifest gives none
/// (or gives a zero size).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            min_width: 200,
            min_height: 150,
        }
    }
}

/// Overrides for the directories backing each profile scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfilesConfig {
    pub global_dir: Option<PathBuf>,
    pub local_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
}

/// Package hot reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enabled: bool,
    /// Debounce window in milliseconds (valid range: 50-5000).
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShellConfig::default();
        assert!(config.packages.search_paths.is_empty());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert!(!config.watch.enabled);
        assert_eq!(config.watch.debounce_ms, 500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ShellConfig = toml::from_str(
            r#"
[window]
width = 1024
"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = ShellConfig::default();
        config.packages.search_paths.push(PathBuf::from("/opt/easel/packages"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ShellConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.packages.search_paths,
            vec![PathBuf::from("/opt/easel/packages")]
        );
    }
}
