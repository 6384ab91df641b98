//! Locating, reading, and first-run creation of `config.toml`.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use easel_common::ConfigError;
use tracing::{debug, info, warn};

use super::template::default_config_toml;
use crate::schema::ShellConfig;
use crate::validation;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "EASEL_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Where the config lives: `$EASEL_CONFIG` when set, otherwise
/// `<config dir>/easel/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_ENV), dirs::config_dir())
}

pub(super) fn resolve_config_path(
    explicit: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("easel").join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError(format!("no config directory; set {CONFIG_ENV}")))
}

/// Read a config file. Missing fields take their serde defaults; a config
/// that fails validation is still returned, with a warning.
pub fn load_from_path(path: &Path) -> Result<ShellConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!("{}: {e}", path.display())));
        }
    };

    let config: ShellConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config validation warning: {e}");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load the config from [`config_path`].
///
/// On first run the commented template is written there and the defaults
/// are used. A `$EASEL_CONFIG` that names a missing file is an error
/// instead, since the user asked for that file specifically.
pub fn load_default() -> Result<ShellConfig, ConfigError> {
    let explicit = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty());
    let from_env = explicit.is_some();
    let path = resolve_config_path(explicit, dirs::config_dir())?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) if !from_env => {
            write_template(&path)?;
            Ok(ShellConfig::default())
        }
        other => other,
    }
}

/// Write the commented default config to `path`. An existing file is left
/// untouched.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_error = |e: std::io::Error| ConfigError::ParseError(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "config already exists, template not written");
            return Ok(());
        }
        Err(e) => return Err(io_error(e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(io_error)?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}
