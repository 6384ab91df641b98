//! Loadable feature packages.
//!
//! A package is a directory holding a `package.json` descriptor, an
//! optional entry script, and panel declarations. The registry loads
//! packages after their dependencies, tracks which script modules each
//! one pulled into the module cache, and unloads in reverse dependency
//! order.

pub mod graph;
pub mod host;
pub mod manifest;
pub mod module_cache;
pub mod registry;

pub use graph::DependencyGraph;
pub use host::{FsScriptHost, ScriptError, ScriptHost};
pub use manifest::{PackageManifest, PanelKind, PanelManifest, MANIFEST_FILE};
pub use module_cache::{ModuleCache, ModuleCacheTracker, ModuleId, ScopeRecord};
pub use registry::{LoadedPackage, PackageRegistry, PanelInfo};
