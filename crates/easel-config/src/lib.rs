//! Easel configuration system.
//!
//! Provides TOML-based shell configuration, JSON layout profiles with
//! scoped storage, and a file watcher for package hot reload. All config
//! sections use defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use easel_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{:?}", config.packages.search_paths);
//! ```

pub mod profile;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

pub use profile::{Profile, ProfileScope, ProfileStore};
pub use schema::{ShellConfig, CONFIG_SCHEMA_VERSION};
pub use watcher::PackageWatcher;

use easel_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<ShellConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
