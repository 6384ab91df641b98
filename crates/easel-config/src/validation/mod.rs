//! Full configuration validation.
//!
//! Every check pushes onto a shared error list so a single
//! `ConfigError` reports all problems at once.

mod helpers;


use crate::schema::ShellConfig;
use easel_common::ConfigError;

use helpers::{validate_min, validate_range_u64};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_range_u64(
        &mut errors,
        "watch.debounce_ms",
        config.watch.debounce_ms,
        50,
        5000,
    );

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(format!(
            "logging.level = {:?} must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    for path in &config.packages.search_paths {
        if path.as_os_str().is_empty() {
            errors.push("packages.search_paths contains an empty path".into());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &ShellConfig) {
    let w = &config.window;
    validate_min(errors, "window.width", w.width, 1);
    validate_min(errors, "window.height", w.height, 1);
    if w.min_width > w.width {
        errors.push(format!(
            "window.min_width = {} exceeds window.width = {}",
            w.min_width, w.width
        ));
    }
    if w.min_height > w.height {
        errors.push(format!(
            "window.min_height = {} exceeds window.height = {}",
            w.min_height, w.height
        ));
    }
}
