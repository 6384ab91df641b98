//! TOML config file loading and creation.

mod loader;
mod template;


pub use loader::{config_path, load_default, load_from_path, write_template, CONFIG_ENV};
