//! Loading: discover the dependency tree, order it, run each entry.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use easel_common::{Notification, PackageError};
use semver::VersionReq;
use tracing::{debug, info, warn};

use super::{normalize, LoadedPackage, PackageRegistry};
use crate::graph::DependencyGraph;
use crate::manifest::PackageManifest;

impl PackageRegistry {
    /// Load the package at `path` after all of its dependencies.
    ///
    /// Loading a package that is already loaded from the same path is a
    /// no-op. On failure, dependencies that finished loading stay loaded.
    pub fn load(&mut self, path: &Path) -> Result<(), PackageError> {
        let root = normalize(path);

        if let Some(name) = self.roots.get(&root).cloned() {
            if let Some(package) = self.packages.get_mut(&name) {
                package.explicit = true;
            }
            debug!(package = %name, "already loaded");
            return Ok(());
        }

        let manifest = PackageManifest::load(&root)?;
        let target = manifest.name.clone();

        let (mut pending, graph) = self.discover(manifest)?;
        let order = graph.load_order(&target)?;
        debug!(package = %target, ?order, "load order resolved");

        for name in order {
            let Some(manifest) = pending.remove(&name) else {
                continue;
            };
            let explicit = name == target;
            self.load_one(manifest, explicit)?;
        }
        Ok(())
    }

    /// Unload then load again. Explicit dependents unloaded along the way
    /// are loaded back afterwards.
    pub fn reload(&mut self, path: &Path) -> Result<(), PackageError> {
        self.reload_with(path, |_| {})
    }

    /// [`reload`](Self::reload), calling `before(name)` ahead of each unload.
    pub fn reload_with<F>(&mut self, path: &Path, before: F) -> Result<(), PackageError>
    where
        F: FnMut(&str),
    {
        let root = normalize(path);
        let Some(name) = self.roots.get(&root).cloned() else {
            return self.load(&root);
        };

        let mut restore: Vec<(u64, PathBuf)> = Vec::new();
        let unloaded = self.unload_with(&root, before);
        info!(package = %name, count = unloaded.len(), "reloading");
        for package in &unloaded {
            if package.explicit && package.name() != name {
                restore.push((package.seq, package.root().to_path_buf()));
            }
        }
        restore.sort_by_key(|(seq, _)| *seq);

        self.load(&root)?;
        for (_, dependent) in restore {
            if let Err(e) = self.load(&dependent) {
                warn!(path = %dependent.display(), error = %e, "failed to restore dependent");
            }
        }
        Ok(())
    }

    /// Collect manifests for every not-yet-loaded package reachable from
    /// `manifest`, with their dependency edges.
    fn discover(
        &self,
        manifest: PackageManifest,
    ) -> Result<(HashMap<String, PackageManifest>, DependencyGraph), PackageError> {
        let mut pending: HashMap<String, PackageManifest> = HashMap::new();
        let mut graph = DependencyGraph::new();
        let mut queue = vec![manifest];

        while let Some(manifest) = queue.pop() {
            if let Some(existing) = self.packages.get(&manifest.name) {
                return Err(PackageError::InvalidManifest {
                    path: manifest.root().to_path_buf(),
                    reason: format!(
                        "package '{}' is already loaded from {}",
                        manifest.name,
                        existing.root().display()
                    ),
                });
            }

            for dep in &manifest.dependencies {
                if self.packages.contains_key(dep) || pending.contains_key(dep) {
                    continue;
                }
                if queue.iter().any(|m| &m.name == dep) || dep == &manifest.name {
                    continue;
                }
                let dep_root =
                    self.locate(dep)
                        .ok_or_else(|| PackageError::DependencyNotFound {
                            package: manifest.name.clone(),
                            dependency: dep.clone(),
                        })?;
                let dep_manifest = PackageManifest::load(&dep_root)?;
                if &dep_manifest.name != dep {
                    return Err(PackageError::InvalidManifest {
                        path: dep_root,
                        reason: format!(
                            "expected package '{dep}', descriptor names '{}'",
                            dep_manifest.name
                        ),
                    });
                }
                queue.push(dep_manifest);
            }

            graph.insert(manifest.name.clone(), manifest.dependencies.clone());
            pending.insert(manifest.name.clone(), manifest);
        }

        Ok((pending, graph))
    }

    fn check_hosts(&self, manifest: &PackageManifest) -> Result<(), PackageError> {
        for (host, requirement) in &manifest.hosts {
            let Some(version) = self.hosts.get(host) else {
                return Err(PackageError::MissingHost {
                    package: manifest.name.clone(),
                    host: host.clone(),
                });
            };
            let req = VersionReq::parse(requirement).map_err(|e| PackageError::InvalidManifest {
                path: manifest.root().to_path_buf(),
                reason: e.to_string(),
            })?;
            if !req.matches(version) {
                return Err(PackageError::IncompatibleHost {
                    package: manifest.name.clone(),
                    host: host.clone(),
                    required: requirement.clone(),
                    found: version.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Run one package's entry script and record it. Its dependencies are
    /// already loaded.
    fn load_one(&mut self, manifest: PackageManifest, explicit: bool) -> Result<(), PackageError> {
        let name = manifest.name.clone();
        self.check_hosts(&manifest)?;

        if manifest.build && !manifest.dest_path().is_dir() {
            return Err(PackageError::EntryLoadError {
                package: name,
                reason: format!(
                    "build output missing at {}",
                    manifest.dest_path().display()
                ),
            });
        }

        let mut modules = BTreeSet::new();
        if let Some(entry) = manifest.entry_path() {
            self.cache.begin_scope();
            let result = self.script_host.run_main(&manifest, &entry, &mut self.cache);
            let record = self.cache.end_scope();

            if let Err(e) = result {
                // Leave the cache as it was: drop only what the failed
                // script introduced.
                for id in &record.introduced {
                    self.cache.evict(id);
                }
                warn!(package = %name, error = %e, "entry script failed");
                return Err(PackageError::EntryLoadError {
                    package: name,
                    reason: e.to_string(),
                });
            }

            // Own what this load introduced, plus shared modules another
            // package introduced. Modules cached outside any package load
            // stay unowned and are never evicted.
            modules = record
                .required
                .into_iter()
                .filter(|id| record.introduced.contains(id) || self.tracker.is_owned(id))
                .collect();
        }

        self.tracker.record(&name, modules);
        self.graph
            .insert(name.clone(), manifest.dependencies.clone());
        self.roots.insert(manifest.root().to_path_buf(), name.clone());

        let seq = self.next_seq;
        self.next_seq += 1;
        self.packages.insert(
            name.clone(),
            LoadedPackage {
                manifest,
                explicit,
                seq,
            },
        );

        info!(package = %name, explicit, "package loaded");
        self.bus.publish(Notification::package_loaded(&name));
        Ok(())
    }
}
