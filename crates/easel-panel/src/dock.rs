//! Which window hosts which panel.

use std::collections::BTreeMap;

use easel_common::{PanelId, WindowId};
use easel_config::ProfileScope;
use easel_window::ReplyCallback;
use serde_json::Value;
use tracing::{debug, warn};

/// Panel -> hosting window, plus per-panel argv waiting for `panel:ready`
/// and callers waiting for a panel to close.
///
/// Docking is last-writer-wins: docking a panel that another window holds
/// moves it.
pub struct PanelDockTable {
    docked: BTreeMap<PanelId, WindowId>,
    argv: BTreeMap<PanelId, Vec<Value>>,
    waiters: BTreeMap<PanelId, Vec<ReplyCallback>>,
    pub(crate) scope: ProfileScope,
}

impl Default for PanelDockTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelDockTable {
    pub fn new() -> Self {
        Self {
            docked: BTreeMap::new(),
            argv: BTreeMap::new(),
            waiters: BTreeMap::new(),
            scope: ProfileScope::Local,
        }
    }

    /// Profile scope panel geometry is saved in.
    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = scope;
        self
    }

    /// Record that `window` hosts `panel`. Returns the previous host.
    pub fn dock(&mut self, panel: PanelId, window: WindowId) -> Option<WindowId> {
        let previous = self.docked.insert(panel.clone(), window);
        match previous {
            Some(prev) if prev != window => {
                warn!(panel = %panel, from = %prev, to = %window, "panel re-docked, last writer wins");
            }
            _ => debug!(panel = %panel, window = %window, "panel docked"),
        }
        previous
    }

    pub fn undock(&mut self, panel: &PanelId) -> Option<WindowId> {
        let window = self.docked.remove(panel);
        if let Some(window) = window {
            debug!(panel = %panel, window = %window, "panel undocked");
        }
        window
    }

    pub fn is_docked(&self, panel: &PanelId) -> bool {
        self.docked.contains_key(panel)
    }

    pub fn find_window(&self, panel: &PanelId) -> Option<WindowId> {
        self.docked.get(panel).copied()
    }

    /// Windows hosting at least one panel of `package`.
    pub fn find_windows(&self, package: &str) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self
            .docked
            .iter()
            .filter(|(panel, _)| panel.package() == package)
            .map(|(_, window)| *window)
            .collect();
        windows.sort();
        windows.dedup();
        windows
    }

    pub fn find_panels(&self, package: &str) -> Vec<PanelId> {
        self.docked
            .keys()
            .filter(|panel| panel.package() == package)
            .cloned()
            .collect()
    }

    pub fn panels_in(&self, window: WindowId) -> Vec<PanelId> {
        self.docked
            .iter()
            .filter(|(_, w)| **w == window)
            .map(|(panel, _)| panel.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.docked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docked.is_empty()
    }

    pub fn cache_argv(&mut self, panel: PanelId, argv: Vec<Value>) {
        self.argv.insert(panel, argv);
    }

    /// Cached argv for a panel whose page just became ready.
    pub fn take_argv(&mut self, panel: &PanelId) -> Option<Vec<Value>> {
        self.argv.remove(panel)
    }

    /// Call `reply` once `panel` closes; immediately if it is not open.
    pub fn wait_for_close(&mut self, panel: &PanelId, reply: ReplyCallback) -> bool {
        if !self.is_docked(panel) {
            reply(Vec::new());
            return false;
        }
        self.waiters.entry(panel.clone()).or_default().push(reply);
        true
    }

    /// Forget a panel entirely and release everyone waiting on it.
    pub(crate) fn release(&mut self, panel: &PanelId) -> Option<WindowId> {
        let window = self.undock(panel);
        self.argv.remove(panel);
        for reply in self.waiters.remove(panel).unwrap_or_default() {
            reply(Vec::new());
        }
        window
    }
}
