//! Package descriptor (`package.json`) parsing and validation.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use easel_common::{PackageError, WindowKind};
use regex::Regex;
use semver::VersionReq;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MANIFEST_FILE: &str = "package.json";

/// Subdirectory holding build output for packages with `build: true`.
const BUILD_DIR: &str = "bin/dev";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("static regex pattern must compile"));

/// Declared panel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    #[default]
    Dockable,
    Float,
    FixedSize,
    Simple,
    Quick,
}

impl PanelKind {
    /// The kind of window that hosts a panel of this type.
    pub fn window_kind(self) -> WindowKind {
        match self {
            PanelKind::Dockable | PanelKind::Simple => WindowKind::Dockable,
            PanelKind::Float => WindowKind::Float,
            PanelKind::FixedSize => WindowKind::FixedSize,
            PanelKind::Quick => WindowKind::Quick,
        }
    }
}

/// One entry of the descriptor's `panels` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PanelManifest {
    #[serde(default, rename = "type")]
    pub kind: PanelKind,
    /// Page loaded into the hosting window, relative to the package.
    pub view: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub min_height: Option<u32>,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
    /// Overrides the window kind's default.
    #[serde(default)]
    pub resizable: Option<bool>,
    #[serde(default)]
    pub always_on_top: Option<bool>,
    /// Default profile contents keyed by scope name (`global`, `local`, `project`).
    #[serde(default)]
    pub profiles: BTreeMap<String, Value>,
}

/// A parsed, validated package descriptor. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Entry script, relative to the package's destination root.
    #[serde(default)]
    pub main: Option<String>,
    /// Package names, loaded in this order before the package itself.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Host name -> semver requirement.
    #[serde(default)]
    pub hosts: BTreeMap<String, String>,
    /// Whether `main` and panel views live under `bin/dev`.
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub panels: BTreeMap<String, PanelManifest>,
    #[serde(skip)]
    root: PathBuf,
}

impl PackageManifest {
    /// Read and validate `<root>/package.json`.
    pub fn load(root: &Path) -> Result<Self, PackageError> {
        let path = root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| invalid(root, e.to_string()))?;
        Self::parse(root, &content)
    }

    /// Parse descriptor text for a package rooted at `root`.
    pub fn parse(root: &Path, content: &str) -> Result<Self, PackageError> {
        let mut manifest: PackageManifest =
            serde_json::from_str(content).map_err(|e| invalid(root, e.to_string()))?;
        manifest.root = root.to_path_buf();
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), PackageError> {
        if !NAME_RE.is_match(&self.name) {
            return Err(invalid(
                &self.root,
                format!("package name {:?} must match [a-z0-9][a-z0-9_-]*", self.name),
            ));
        }

        if let Some(main) = &self.main {
            if !stays_inside(main) {
                return Err(invalid(
                    &self.root,
                    format!("main {main:?} must be a relative path inside the package"),
                ));
            }
        }

        for dep in &self.dependencies {
            if dep == &self.name {
                return Err(PackageError::CyclicDependency {
                    cycle: vec![self.name.clone(), self.name.clone()],
                });
            }
            if !NAME_RE.is_match(dep) {
                return Err(invalid(&self.root, format!("invalid dependency name {dep:?}")));
            }
        }

        for (host, req) in &self.hosts {
            VersionReq::parse(req).map_err(|e| {
                invalid(&self.root, format!("host {host:?} requirement {req:?}: {e}"))
            })?;
        }

        for (name, panel) in &self.panels {
            if name.is_empty() {
                return Err(invalid(&self.root, "panel name must not be empty".into()));
            }
            if panel.view.is_empty() {
                return Err(invalid(&self.root, format!("panel {name:?} has no view")));
            }
            if !stays_inside(panel.view.trim_start_matches('/')) {
                return Err(invalid(
                    &self.root,
                    format!("panel {name:?} view {:?} leaves the package", panel.view),
                ));
            }
        }

        Ok(())
    }

    /// Directory the descriptor was read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory scripts and views are resolved against.
    pub fn dest_path(&self) -> PathBuf {
        if self.build {
            self.root.join(BUILD_DIR)
        } else {
            self.root.clone()
        }
    }

    pub fn entry_path(&self) -> Option<PathBuf> {
        self.main.as_ref().map(|main| self.dest_path().join(main))
    }

    pub fn panel(&self, name: &str) -> Option<&PanelManifest> {
        self.panels.get(name)
    }
}

/// Non-empty, relative, and free of `..`.
fn stays_inside(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn invalid(root: &Path, reason: String) -> PackageError {
    PackageError::InvalidManifest {
        path: root.to_path_buf(),
        reason,
    }
}
