//! Opening and closing panels against the package and window registries.

use easel_common::{channels, PanelError, PanelId, WindowId};
use easel_config::ProfileStore;
use easel_package::PackageRegistry;
use easel_window::{LayoutSnapshot, WindowOptions, WindowQuery, WindowRegistry};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::dock::PanelDockTable;
use crate::geometry;

/// Windows and profiles, borrowed from the shell for one panel operation.
pub struct PanelEnv<'a> {
    pub windows: &'a mut WindowRegistry,
    pub profiles: &'a ProfileStore,
}

/// Logical URL of a panel's view page.
pub fn view_url(panel: &PanelId, view: &str) -> String {
    format!("packages://{}/{}", panel.package(), view.trim_start_matches('/'))
}

impl PanelDockTable {
    /// Open `panel`, or re-run and focus it when already open.
    pub fn open(
        &mut self,
        env: &mut PanelEnv<'_>,
        packages: &PackageRegistry,
        panel: &PanelId,
        argv: Vec<Value>,
    ) -> Result<WindowId, PanelError> {
        if let Some(window) = self.find_window(panel) {
            if env.windows.get(window).is_some() {
                env.windows
                    .send_to_page(window, channels::PANEL_RUN, run_args(panel, argv));
                let _ = env.windows.show(window);
                let _ = env.windows.focus(window);
                debug!(panel = %panel, window = %window, "panel already open, focused");
                return Ok(window);
            }
            warn!(panel = %panel, window = %window, "panel docked in a missing window");
            self.release(panel);
        }

        let info = packages
            .panel_info(panel)
            .ok_or_else(|| PanelError::PanelInfoNotFound(panel.to_string()))?;
        let manifest = &info.manifest;
        let url = view_url(panel, &manifest.view);

        // A closed quick panel keeps its window hidden; dock back into it.
        if let Some(window) = env.windows.find(&WindowQuery::Name(panel.to_string())) {
            self.dock(panel.clone(), window);
            self.cache_argv(panel.clone(), argv.clone());
            if let Err(e) = env.windows.load(window, &url, argv) {
                warn!(panel = %panel, error = %e, "failed to load panel view");
            }
            let _ = env.windows.show(window);
            let _ = env.windows.focus(window);
            info!(panel = %panel, window = %window, "panel reopened in its hidden window");
            return Ok(window);
        }

        let defaults = manifest
            .profiles
            .get(self.scope.as_str())
            .cloned()
            .unwrap_or_else(|| json!({}));
        let saved = self.load_geometry(env.profiles, panel, defaults);
        let options = WindowOptions {
            kind: manifest.kind.window_kind(),
            main: false,
            title: manifest.title.clone(),
            bounds: geometry::initial_bounds(manifest, saved.as_ref()),
            min_size: geometry::min_size(manifest),
            max_size: geometry::max_size(manifest),
            resizable: manifest.resizable,
            always_on_top: manifest.always_on_top,
            show: true,
        };

        let window = env.windows.create(panel.to_string(), options);
        self.dock(panel.clone(), window);
        self.cache_argv(panel.clone(), argv.clone());

        if let Err(e) = env.windows.load(window, &url, argv) {
            warn!(panel = %panel, error = %e, "failed to load panel view");
        }
        info!(panel = %panel, window = %window, "panel opened");
        Ok(window)
    }

    /// Close `panel`: tell its page, save its geometry, undock, and close
    /// the window when nothing else is docked there. Returns `false` if the
    /// panel was not open.
    pub fn close(&mut self, env: &mut PanelEnv<'_>, panel: &PanelId) -> bool {
        let Some(window) = self.find_window(panel) else {
            debug!(panel = %panel, "close of panel that is not open ignored");
            return false;
        };

        env.windows
            .send_to_page(window, channels::PANEL_UNDOCK, vec![json!(panel.to_string())]);
        self.save_geometry(env, panel, window);
        self.release(panel);

        let empty = self.panels_in(window).is_empty();
        if empty && !env.windows.is_main_window(window) && env.windows.get(window).is_some() {
            if let Err(e) = env.windows.close(window) {
                warn!(panel = %panel, window = %window, error = %e, "failed to close panel window");
            }
        }
        info!(panel = %panel, window = %window, "panel closed");
        true
    }

    /// Close every open panel of `package`. Used before the package unloads.
    pub fn close_all(&mut self, env: &mut PanelEnv<'_>, package: &str) -> usize {
        let panels = self.find_panels(package);
        panels.iter().filter(|panel| self.close(env, panel)).count()
    }

    /// The page hosting `panel` is ready: replay the argv it was opened
    /// with.
    pub fn on_panel_ready(&mut self, windows: &mut WindowRegistry, panel: &PanelId) -> bool {
        let Some(window) = self.find_window(panel) else {
            warn!(panel = %panel, "ready from a panel that is not docked");
            return false;
        };
        let _ = windows.mark_loaded(window);
        match self.take_argv(panel) {
            Some(argv) => windows.send_to_page(window, channels::PANEL_RUN, run_args(panel, argv)),
            None => false,
        }
    }

    /// A window is about to close: save the geometry of everything it hosts.
    pub fn on_window_closing(&mut self, env: &mut PanelEnv<'_>, window: WindowId) {
        for panel in self.panels_in(window) {
            self.save_geometry(env, &panel, window);
        }
    }

    /// A window closed: forget its panels. Returns them.
    pub fn on_window_closed(&mut self, window: WindowId) -> Vec<PanelId> {
        let panels = self.panels_in(window);
        for panel in &panels {
            self.release(panel);
        }
        panels
    }

    /// Saved geometry for `panel`, falling back to the defaults its
    /// manifest declares for this scope.
    fn load_geometry(
        &self,
        profiles: &ProfileStore,
        panel: &PanelId,
        defaults: Value,
    ) -> Option<LayoutSnapshot> {
        let profile = match profiles.load_profile(&panel.layout_profile(), self.scope, defaults) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(panel = %panel, error = %e, "failed to load panel layout");
                return None;
            }
        };
        let data = profile.data();
        if !data.contains_key("width") || !data.contains_key("height") {
            return None;
        }
        match serde_json::from_value(Value::Object(data.clone())) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(panel = %panel, error = %e, "ignoring malformed panel layout");
                None
            }
        }
    }

    fn save_geometry(&self, env: &PanelEnv<'_>, panel: &PanelId, window: WindowId) {
        let Some(editor) = env.windows.get(window) else {
            return;
        };
        let bounds = editor.bounds();
        let result = env
            .profiles
            .load_profile(&panel.layout_profile(), self.scope, json!({}))
            .and_then(|mut profile| {
                profile.set("x", json!(bounds.x));
                profile.set("y", json!(bounds.y));
                profile.set("width", json!(bounds.width));
                profile.set("height", json!(bounds.height));
                profile.save()
            });
        if let Err(e) = result {
            warn!(panel = %panel, error = %e, "failed to save panel layout");
        }
    }
}

fn run_args(panel: &PanelId, argv: Vec<Value>) -> Vec<Value> {
    let mut args = Vec::with_capacity(argv.len() + 1);
    args.push(json!(panel.to_string()));
    args.extend(argv);
    args
}
