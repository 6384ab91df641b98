//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Easel Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[packages]
# Directories that hold one package per subdirectory.
# search_paths = ["~/.easel/packages"]
# Package roots loaded at startup, in order.
# autoload = []

[window]
# width = 800
# height = 600
# min_width = 200
# min_height = 150

[profiles]
# global_dir = "..."     # defaults to <config dir>/easel/profiles
# local_dir = "..."      # defaults to <data dir>/easel/profiles
# project_dir = "..."    # defaults to ./.easel/profiles

[watch]
# enabled = false
# debounce_ms = 500      # 50-5000

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
