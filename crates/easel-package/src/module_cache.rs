//! Script-module cache and per-package ownership tracking.
//!
//! The [`ModuleCache`] is the process-wide set of loaded script modules.
//! While a package's entry script runs, the cache records every module
//! that script requires and which of those were not cached before. The
//! [`ModuleCacheTracker`] turns those records into ownership so unloading a
//! package evicts exactly the modules it introduced that no other loaded
//! package still uses. Modules cached outside any package load are never
//! evicted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

/// Identity of a loaded script module (its resolved path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Modules required while a recording scope was open.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScopeRecord {
    /// Every module required, cached or not.
    pub required: BTreeSet<ModuleId>,
    /// The subset that was not cached before the scope required it.
    pub introduced: BTreeSet<ModuleId>,
}

/// Set of cached modules plus an optional recording scope.
#[derive(Debug, Default)]
pub struct ModuleCache {
    loaded: BTreeSet<ModuleId>,
    scope: Option<ScopeRecord>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a module. Returns `true` when it was not cached before.
    pub fn require(&mut self, id: ModuleId) -> bool {
        let fresh = self.loaded.insert(id.clone());
        if let Some(scope) = self.scope.as_mut() {
            if fresh {
                scope.introduced.insert(id.clone());
            }
            scope.required.insert(id);
        }
        trace!(fresh, "module required");
        fresh
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.loaded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.loaded.iter()
    }

    pub(crate) fn evict(&mut self, id: &ModuleId) -> bool {
        self.loaded.remove(id)
    }

    /// Start recording required modules. A scope already open is replaced.
    pub(crate) fn begin_scope(&mut self) {
        self.scope = Some(ScopeRecord::default());
    }

    /// Stop recording and return everything required since `begin_scope`.
    pub(crate) fn end_scope(&mut self) -> ScopeRecord {
        self.scope.take().unwrap_or_default()
    }
}

/// Which loaded packages reference which cached modules.
#[derive(Debug, Default)]
pub struct ModuleCacheTracker {
    owners: BTreeMap<ModuleId, BTreeSet<String>>,
    by_package: BTreeMap<String, BTreeSet<ModuleId>>,
}

impl ModuleCacheTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `package` references `modules`.
    pub fn record(&mut self, package: &str, modules: BTreeSet<ModuleId>) {
        for id in &modules {
            self.owners
                .entry(id.clone())
                .or_default()
                .insert(package.to_string());
        }
        debug!(package, count = modules.len(), "modules recorded");
        self.by_package
            .entry(package.to_string())
            .or_default()
            .extend(modules);
    }

    pub fn modules_of(&self, package: &str) -> Option<&BTreeSet<ModuleId>> {
        self.by_package.get(package)
    }

    pub fn owners_of(&self, id: &ModuleId) -> Option<&BTreeSet<String>> {
        self.owners.get(id)
    }

    pub fn is_owned(&self, id: &ModuleId) -> bool {
        self.owners.get(id).is_some_and(|o| !o.is_empty())
    }

    /// Drop `package`'s references and evict modules left without owners.
    /// Returns the evicted modules.
    pub fn release(&mut self, package: &str, cache: &mut ModuleCache) -> Vec<ModuleId> {
        let Some(modules) = self.by_package.remove(package) else {
            return Vec::new();
        };

        let mut evicted = Vec::new();
        for id in modules {
            let orphaned = match self.owners.get_mut(&id) {
                Some(owners) => {
                    owners.remove(package);
                    owners.is_empty()
                }
                None => true,
            };
            if orphaned {
                self.owners.remove(&id);
                if cache.evict(&id) {
                    evicted.push(id);
                }
            }
        }
        debug!(package, evicted = evicted.len(), "modules released");
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> BTreeSet<ModuleId> {
        names.iter().map(|n| ModuleId::new(*n)).collect()
    }

    #[test]
    fn require_reports_fresh_modules() {
        let mut cache = ModuleCache::new();
        assert!(cache.require(ModuleId::new("a.js")));
        assert!(!cache.require(ModuleId::new("a.js")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn scope_separates_cached_and_introduced_requires() {
        let mut cache = ModuleCache::new();
        cache.require(ModuleId::new("shared.js"));

        cache.begin_scope();
        cache.require(ModuleId::new("shared.js"));
        cache.require(ModuleId::new("own.js"));
        cache.require(ModuleId::new("own.js"));
        let record = cache.end_scope();

        assert_eq!(record.required, ids(&["own.js", "shared.js"]));
        assert_eq!(record.introduced, ids(&["own.js"]));
        // Requires after the scope closes are not recorded.
        cache.require(ModuleId::new("late.js"));
        assert_eq!(cache.end_scope(), ScopeRecord::default());
    }

    #[test]
    fn release_evicts_only_orphaned_modules() {
        let mut cache = ModuleCache::new();
        let mut tracker = ModuleCacheTracker::new();
        for id in ["a.js", "b.js", "shared.js"] {
            cache.require(ModuleId::new(id));
        }
        tracker.record("alpha", ids(&["a.js", "shared.js"]));
        tracker.record("beta", ids(&["b.js", "shared.js"]));

        let evicted = tracker.release("alpha", &mut cache);
        assert_eq!(evicted, vec![ModuleId::new("a.js")]);
        assert!(cache.contains(&ModuleId::new("shared.js")));
        assert_eq!(
            tracker.owners_of(&ModuleId::new("shared.js")).unwrap().len(),
            1
        );

        let evicted = tracker.release("beta", &mut cache);
        assert_eq!(evicted, vec![ModuleId::new("b.js"), ModuleId::new("shared.js")]);
        assert!(cache.is_empty());
    }

    #[test]
    fn release_unknown_package_is_noop() {
        let mut cache = ModuleCache::new();
        cache.require(ModuleId::new("a.js"));
        let mut tracker = ModuleCacheTracker::new();
        assert!(tracker.release("ghost", &mut cache).is_empty());
        assert_eq!(cache.len(), 1);
    }
}
