//! The set of loaded packages and everything needed to load more.

mod load;
mod unload;


use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use easel_common::{NotificationBus, PanelId};
use tracing::{debug, info};

use crate::graph::DependencyGraph;
use crate::host::ScriptHost;
use crate::manifest::{PackageManifest, PanelManifest, MANIFEST_FILE};
use crate::module_cache::{ModuleCache, ModuleCacheTracker};

/// Scheme for logical package URLs: `packages://<name>/<relative path>`.
pub const PACKAGE_URL_SCHEME: &str = "packages://";

/// A package that finished loading.
#[derive(Debug, Clone)]
pub struct LoadedPackage {
    pub manifest: PackageManifest,
    /// Loaded by path rather than only as somebody's dependency. Explicit
    /// packages survive their last dependent being unloaded.
    pub explicit: bool,
    /// Monotonic load counter, used to unload in reverse order.
    pub(crate) seq: u64,
}

impl LoadedPackage {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn root(&self) -> &Path {
        self.manifest.root()
    }
}

/// A panel declaration resolved against its loaded package.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelInfo {
    pub id: PanelId,
    pub manifest: PanelManifest,
    /// Absolute path of the panel's view page.
    pub view_path: PathBuf,
}

/// Owns loaded packages, their manifests, dependency edges, module
/// ownership, and the search paths used to find dependencies.
pub struct PackageRegistry {
    packages: BTreeMap<String, LoadedPackage>,
    roots: HashMap<PathBuf, String>,
    search_paths: Vec<PathBuf>,
    hosts: BTreeMap<String, semver::Version>,
    graph: DependencyGraph,
    cache: ModuleCache,
    tracker: ModuleCacheTracker,
    script_host: Box<dyn ScriptHost>,
    bus: NotificationBus,
    next_seq: u64,
}

impl PackageRegistry {
    pub fn new(script_host: Box<dyn ScriptHost>, bus: NotificationBus) -> Self {
        Self {
            packages: BTreeMap::new(),
            roots: HashMap::new(),
            search_paths: Vec::new(),
            hosts: BTreeMap::new(),
            graph: DependencyGraph::new(),
            cache: ModuleCache::new(),
            tracker: ModuleCacheTracker::new(),
            script_host,
            bus,
            next_seq: 0,
        }
    }

    // -- Hosts and search paths --

    /// Make a host component available to packages that declare it.
    pub fn register_host(&mut self, name: impl Into<String>, version: semver::Version) {
        let name = name.into();
        debug!(host = %name, %version, "host registered");
        self.hosts.insert(name, version);
    }

    /// Add a directory holding one package per subdirectory.
    pub fn add_path(&mut self, root: impl Into<PathBuf>) {
        let root = normalize(&root.into());
        if !self.search_paths.contains(&root) {
            info!(path = %root.display(), "package search path added");
            self.search_paths.push(root);
        }
    }

    /// Remove a search path. Packages already loaded from it stay loaded.
    pub fn remove_path(&mut self, root: &Path) -> bool {
        let root = normalize(root);
        let before = self.search_paths.len();
        self.search_paths.retain(|p| p != &root);
        let removed = self.search_paths.len() != before;
        if removed {
            info!(path = %root.display(), "package search path removed");
        }
        removed
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find an unloaded package named `name` under the search paths.
    pub(crate) fn locate(&self, name: &str) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|root| root.join(MANIFEST_FILE).is_file())
            .map(|root| normalize(&root))
    }

    // -- Lookups --

    pub fn find(&self, name: &str) -> Option<&LoadedPackage> {
        self.packages.get(name)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&LoadedPackage> {
        self.roots
            .get(&normalize(path))
            .and_then(|name| self.packages.get(name))
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Loaded package names in load order.
    pub fn loaded_names(&self) -> Vec<String> {
        let mut loaded: Vec<&LoadedPackage> = self.packages.values().collect();
        loaded.sort_by_key(|p| p.seq);
        loaded.into_iter().map(|p| p.name().to_string()).collect()
    }

    /// Number of loaded packages that depend on `name`.
    pub fn ref_count(&self, name: &str) -> usize {
        self.graph.dependents(name).len()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn module_cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Shared access to the cache for modules loaded outside any package.
    pub fn module_cache_mut(&mut self) -> &mut ModuleCache {
        &mut self.cache
    }

    pub fn tracker(&self) -> &ModuleCacheTracker {
        &self.tracker
    }

    /// Declared panel fragment for `<package>.<panel>`, if its package is loaded.
    pub fn panel_info(&self, id: &PanelId) -> Option<PanelInfo> {
        let package = self.packages.get(id.package())?;
        let manifest = package.manifest.panel(id.panel())?.clone();
        let view_path = package.manifest.dest_path().join(&manifest.view);
        Some(PanelInfo {
            id: id.clone(),
            manifest,
            view_path,
        })
    }

    /// Every panel declared by loaded packages.
    pub fn panels(&self) -> Vec<PanelId> {
        self.packages
            .values()
            .flat_map(|p| {
                p.manifest
                    .panels
                    .keys()
                    .filter_map(|panel| PanelId::new(p.name(), panel.as_str()).ok())
            })
            .collect()
    }

    /// Resolve `packages://<name>/<path>` to a file path under the
    /// package's destination root.
    pub fn resolve_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(PACKAGE_URL_SCHEME)?;
        let (name, relative) = rest.split_once('/').unwrap_or((rest, ""));
        let package = self.packages.get(name)?;
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        Some(package.manifest.dest_path().join(relative))
    }
}

/// Canonical form used as the identity of a package root.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
