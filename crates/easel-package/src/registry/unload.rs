//! Unloading: dependents first, then the package, then orphaned dependencies.

use std::path::Path;

use easel_common::Notification;
use tracing::{debug, info, warn};

use super::{normalize, LoadedPackage, PackageRegistry};

impl PackageRegistry {
    /// Unload the package loaded from `path`. Unknown paths are a no-op.
    pub fn unload(&mut self, path: &Path) -> Vec<LoadedPackage> {
        self.unload_with(path, |_| {})
    }

    /// Like [`unload`](Self::unload), calling `before(name)` for each
    /// package right before it goes away (the shell closes its panels
    /// there). Returns every package unloaded, in unload order.
    pub fn unload_with<F>(&mut self, path: &Path, mut before: F) -> Vec<LoadedPackage>
    where
        F: FnMut(&str),
    {
        let root = normalize(path);
        let Some(name) = self.roots.get(&root).cloned() else {
            debug!(path = %root.display(), "unload of unknown package ignored");
            return Vec::new();
        };

        let mut unloaded = Vec::new();
        self.unload_named(&name, &mut before, &mut unloaded);
        unloaded
    }

    /// Unload every package, most recently loaded first.
    pub fn unload_all(&mut self) -> Vec<LoadedPackage> {
        let mut order: Vec<(u64, String)> = self
            .packages
            .values()
            .map(|p| (p.seq, p.name().to_string()))
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0));

        let mut unloaded = Vec::new();
        let mut noop = |_: &str| {};
        for (_, name) in order {
            self.unload_named(&name, &mut noop, &mut unloaded);
        }
        unloaded
    }

    fn unload_named(
        &mut self,
        name: &str,
        before: &mut dyn FnMut(&str),
        out: &mut Vec<LoadedPackage>,
    ) {
        if !self.packages.contains_key(name) {
            return;
        }

        for dependent in self.graph.dependents(name) {
            self.unload_named(&dependent, before, out);
        }
        // A dependent's cleanup may already have taken this package with it.
        if !self.packages.contains_key(name) {
            return;
        }

        before(name);
        let Some(package) = self.packages.remove(name) else {
            return;
        };

        if let Err(e) = self.script_host.run_unload(&package.manifest) {
            warn!(package = %name, error = %e, "unload script failed");
        }
        let evicted = self.tracker.release(name, &mut self.cache);
        let dependencies = self.graph.remove(name).unwrap_or_default();
        self.roots.remove(package.root());

        info!(package = %name, evicted = evicted.len(), "package unloaded");
        self.bus.publish(Notification::package_unloaded(name));
        out.push(package);

        for dep in dependencies {
            let orphaned = self
                .packages
                .get(&dep)
                .is_some_and(|p| !p.explicit && self.graph.dependents(&dep).is_empty());
            if orphaned {
                debug!(package = %dep, "unloading unused dependency");
                self.unload_named(&dep, before, out);
            }
        }
    }
}
