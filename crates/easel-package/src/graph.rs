//! Package dependency graph: node = package name, edge = "depends on".

use std::collections::{BTreeMap, HashSet};

use easel_common::PackageError;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node with its dependencies in declaration order.
    pub fn insert(&mut self, name: impl Into<String>, dependencies: Vec<String>) {
        self.edges.insert(name.into(), dependencies);
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.edges.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes that list `name` as a direct dependency, sorted by name.
    pub fn dependents(&self, name: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == name))
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Post-order walk from `root`: every dependency precedes its dependent
    /// and siblings keep declaration order. Dependencies without a node in
    /// this graph are skipped (they are already satisfied elsewhere).
    pub fn load_order(&self, root: &str) -> Result<Vec<String>, PackageError> {
        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut path = Vec::new();
        self.visit(root, &mut path, &mut done, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        name: &str,
        path: &mut Vec<String>,
        done: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<(), PackageError> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = path.iter().position(|n| n == name) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(PackageError::CyclicDependency { cycle });
        }

        path.push(name.to_string());
        for dep in self.dependencies(name) {
            if self.contains(dep) {
                self.visit(dep, path, done, order)?;
            }
        }
        path.pop();

        done.insert(name.to_string());
        order.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, Vec<&str>)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for (name, deps) in edges {
            g.insert(*name, deps.iter().map(|d| d.to_string()).collect());
        }
        g
    }

    #[test]
    fn chain_is_post_order() {
        let g = graph(&[
            ("package-deps", vec!["dep-01"]),
            ("dep-01", vec!["dep-02"]),
            ("dep-02", vec![]),
        ]);
        assert_eq!(
            g.load_order("package-deps").unwrap(),
            vec!["dep-02", "dep-01", "package-deps"]
        );
    }

    #[test]
    fn siblings_keep_declaration_order() {
        let g = graph(&[("app", vec!["zeta", "alpha"]), ("zeta", vec![]), ("alpha", vec![])]);
        assert_eq!(g.load_order("app").unwrap(), vec!["zeta", "alpha", "app"]);
    }

    #[test]
    fn diamond_visits_shared_dependency_once() {
        let g = graph(&[
            ("app", vec!["left", "right"]),
            ("left", vec!["base"]),
            ("right", vec!["base"]),
            ("base", vec![]),
        ]);
        assert_eq!(
            g.load_order("app").unwrap(),
            vec!["base", "left", "right", "app"]
        );
    }

    #[test]
    fn missing_nodes_are_skipped() {
        let g = graph(&[("app", vec!["already-loaded", "fresh"]), ("fresh", vec![])]);
        assert_eq!(g.load_order("app").unwrap(), vec!["fresh", "app"]);
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let g = graph(&[("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])]);
        match g.load_order("a") {
            Err(PackageError::CyclicDependency { cycle }) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn dependents_lookup() {
        let g = graph(&[("a", vec!["base"]), ("b", vec!["base"]), ("base", vec![])]);
        assert_eq!(g.dependents("base"), vec!["a", "b"]);
        assert!(g.dependents("a").is_empty());
        assert_eq!(g.dependencies("a").to_vec(), vec!["base".to_string()]);
    }
}
