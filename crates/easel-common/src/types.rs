use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How an editor window behaves. Decides resizability, stacking, and what
/// closing it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    Dockable,
    Float,
    FixedSize,
    Quick,
}

impl WindowKind {
    pub fn resizable(self) -> bool {
        !matches!(self, WindowKind::FixedSize)
    }

    pub fn always_on_top(self) -> bool {
        !matches!(self, WindowKind::Dockable)
    }

    /// Quick windows hide on blur and on close; they live until shutdown.
    pub fn hides_instead_of_closing(self) -> bool {
        matches!(self, WindowKind::Quick)
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WindowKind::Dockable => "dockable",
            WindowKind::Float => "float",
            WindowKind::FixedSize => "fixed-size",
            WindowKind::Quick => "quick",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppState {
    Starting,
    Running,
    ShuttingDown,
}
