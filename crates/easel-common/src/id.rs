use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PanelError;

/// Registry-assigned identity of an editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// Correlation id for one outstanding request/reply exchange, unique per
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `<package>.<panel>` identifier kept as its two parts.
///
/// Package names never contain `.`, so parsing splits at the first one and
/// the panel part may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId {
    package: String,
    panel: String,
}

impl PanelId {
    pub fn new(package: impl Into<String>, panel: impl Into<String>) -> Result<Self, PanelError> {
        let package = package.into();
        let panel = panel.into();
        if package.is_empty() || panel.is_empty() || package.contains('.') {
            return Err(PanelError::InvalidPanelId(format!("{package}.{panel}")));
        }
        Ok(Self { package, panel })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn panel(&self) -> &str {
        &self.panel
    }

    /// Profile name used to persist this panel's window geometry.
    pub fn layout_profile(&self) -> String {
        format!("layout.{self}")
    }
}

impl FromStr for PanelId {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((package, panel)) => Self::new(package, panel),
            None => Err(PanelError::InvalidPanelId(s.to_string())),
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.panel)
    }
}

impl Serialize for PanelId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PanelId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
