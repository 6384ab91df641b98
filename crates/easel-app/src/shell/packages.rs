//! Package load/unload driven through the shell, closing panels as their
//! packages go away.

use std::path::Path;

use easel_common::PackageError;
use easel_panel::PanelEnv;
use tracing::{info, warn};

use super::core::Shell;

impl Shell {
    pub fn load_package(&mut self, path: &Path) -> Result<(), PackageError> {
        let result = self.packages.load(path);
        self.flush();
        result
    }

    /// Unload the package at `path` and everything that depends on it.
    /// Returns the names unloaded.
    pub fn unload_package(&mut self, path: &Path) -> Vec<String> {
        let panels = &mut self.panels;
        let mut env = PanelEnv {
            windows: &mut self.windows,
            profiles: &self.profiles,
        };
        let unloaded: Vec<String> = self
            .packages
            .unload_with(path, |name| {
                panels.close_all(&mut env, name);
            })
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        self.flush();
        if !unloaded.is_empty() {
            info!(packages = ?unloaded, "packages unloaded");
        }
        unloaded
    }

    /// Reload after a change on disk. Panels of unloaded packages close.
    pub fn reload_package(&mut self, path: &Path) -> Result<(), PackageError> {
        let panels = &mut self.panels;
        let mut env = PanelEnv {
            windows: &mut self.windows,
            profiles: &self.profiles,
        };
        let result = self.packages.reload_with(path, |name| {
            panels.close_all(&mut env, name);
        });
        if let Err(e) = &result {
            warn!(path = %path.display(), error = %e, "reload failed");
        }
        self.flush();
        result
    }
}
