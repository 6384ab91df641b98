//! The seam through which package entry scripts are executed.

use std::path::Path;

use tracing::debug;

use crate::manifest::PackageManifest;
use crate::module_cache::{ModuleCache, ModuleId};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScriptError(pub String);

/// Runs package scripts. Every module a script loads must go through
/// [`ModuleCache::require`] so it can be evicted on unload.
pub trait ScriptHost: Send {
    /// Execute the package's entry script.
    fn run_main(
        &mut self,
        package: &PackageManifest,
        entry: &Path,
        cache: &mut ModuleCache,
    ) -> Result<(), ScriptError>;

    /// Give the package a chance to clean up before its modules are evicted.
    fn run_unload(&mut self, package: &PackageManifest) -> Result<(), ScriptError> {
        let _ = package;
        Ok(())
    }
}

/// Host with no script engine: the entry file must exist and becomes the
/// package's only cached module.
#[derive(Debug, Default)]
pub struct FsScriptHost;

impl ScriptHost for FsScriptHost {
    fn run_main(
        &mut self,
        package: &PackageManifest,
        entry: &Path,
        cache: &mut ModuleCache,
    ) -> Result<(), ScriptError> {
        if !entry.is_file() {
            return Err(ScriptError(format!(
                "entry script {} not found",
                entry.display()
            )));
        }
        cache.require(ModuleId::from_path(entry));
        debug!(package = %package.name, entry = %entry.display(), "entry loaded");
        Ok(())
    }
}
