use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("invalid manifest at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("package '{package}' requires host '{host}', which is not available")]
    MissingHost { package: String, host: String },

    #[error("package '{package}' requires host '{host}' {required}, found {found}")]
    IncompatibleHost {
        package: String,
        host: String,
        required: String,
        found: String,
    },

    #[error("failed to run entry of package '{package}': {reason}")]
    EntryLoadError { package: String, reason: String },

    #[error("dependency '{dependency}' of package '{package}' not found")]
    DependencyNotFound { package: String, dependency: String },

    #[error("cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("window not found: {0}")]
    WindowNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel info not found: {0}")]
    PanelInfoNotFound(String),

    #[error("invalid panel id '{0}': expected <package>.<panel>")]
    InvalidPanelId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EaselError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("window.width must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: window.width must be > 0"
        );
    }

    #[test]
    fn package_error_display() {
        let err = PackageError::MissingHost {
            package: "inspector".into(),
            host: "easel".into(),
        };
        assert_eq!(
            err.to_string(),
            "package 'inspector' requires host 'easel', which is not available"
        );

        let err = PackageError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency detected: a -> b -> a");
    }

    #[test]
    fn window_and_panel_error_display() {
        let err = WindowError::InvalidArgument("channel must not be empty".into());
        assert_eq!(err.to_string(), "invalid argument: channel must not be empty");

        let err = PanelError::PanelInfoNotFound("assets.browser".into());
        assert_eq!(err.to_string(), "panel info not found: assets.browser");
    }

    #[test]
    fn easel_error_from_package() {
        let err: EaselError = PackageError::EntryLoadError {
            package: "console".into(),
            reason: "boom".into(),
        }
        .into();
        assert!(matches!(err, EaselError::Package(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn easel_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EaselError = io_err.into();
        assert!(matches!(err, EaselError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
