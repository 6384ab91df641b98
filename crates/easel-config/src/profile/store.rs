use std::collections::HashMap;
use std::path::{Path, PathBuf};

use easel_common::ConfigError;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::schema::ProfilesConfig;

/// Where a profile lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileScope {
    /// Per user, shared by every project.
    Global,
    /// Per machine.
    Local,
    /// Per working directory.
    Project,
}

impl ProfileScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(Self::Global),
            "local" => Some(Self::Local),
            "project" => Some(Self::Project),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
            Self::Project => "project",
        }
    }
}

/// Resolves profile names to files and loads them.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dirs: HashMap<ProfileScope, PathBuf>,
}

impl ProfileStore {
    pub fn new(global: PathBuf, local: PathBuf, project: PathBuf) -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(ProfileScope::Global, global);
        dirs.insert(ProfileScope::Local, local);
        dirs.insert(ProfileScope::Project, project);
        Self { dirs }
    }

    /// Store with every scope rooted under one directory (`<root>/<scope>`).
    pub fn rooted(root: &Path) -> Self {
        Self::new(
            root.join("global"),
            root.join("local"),
            root.join("project"),
        )
    }

    /// Build from config, falling back to platform directories.
    pub fn from_config(config: &ProfilesConfig) -> Self {
        let global = config.global_dir.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("easel")
                .join("profiles")
        });
        let local = config.local_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("easel")
                .join("profiles")
        });
        let project = config
            .project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".easel").join("profiles"));
        Self::new(global, local, project)
    }

    pub fn profile_path(&self, name: &str, scope: ProfileScope) -> Result<PathBuf, ConfigError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ConfigError::ValidationError(format!(
                "invalid profile name {name:?}"
            )));
        }
        let dir = self.dirs.get(&scope).ok_or_else(|| {
            ConfigError::ValidationError(format!("no directory for scope {scope:?}"))
        })?;
        Ok(dir.join(format!("{name}.json")))
    }

    /// Load a profile, filling keys absent on disk from `defaults`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one
    /// yields the defaults with a warning.
    pub fn load_profile(
        &self,
        name: &str,
        scope: ProfileScope,
        defaults: Value,
    ) -> Result<Profile, ConfigError> {
        let path = self.profile_path(name, scope)?;
        let mut data = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    warn!(profile = name, "profile is not a JSON object, using defaults");
                    Map::new()
                }
                Err(e) => {
                    warn!(profile = name, error = %e, "failed to parse profile, using defaults");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };

        if let Value::Object(defaults) = defaults {
            for (key, value) in defaults {
                data.entry(key).or_insert(value);
            }
        }

        debug!(profile = name, path = %path.display(), "profile loaded");
        Ok(Profile { path, data })
    }
}

/// A loaded profile. Mutations stay in memory until [`Profile::save`].
#[derive(Debug, Clone)]
pub struct Profile {
    path: PathBuf,
    data: Map<String, Value>,
}

impl Profile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Replace the whole profile body.
    pub fn replace(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    /// Write the profile to disk (`.tmp` then rename).
    pub fn save(&self) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize profile: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::ParseError(format!(
                    "failed to create profile directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to write profile to {}: {e}",
                tmp_path.display()
            ))
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            warn!("atomic rename failed ({e}), falling back to direct write");
            std::fs::write(&self.path, &json).map_err(|e2| {
                ConfigError::ParseError(format!(
                    "failed to write profile to {}: {e2}",
                    self.path.display()
                ))
            })?;
        }

        debug!(path = %self.path.display(), "profile saved");
        Ok(())
    }
}
