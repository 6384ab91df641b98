//! All open editor windows, the main-window slot, and saved window states.

mod layout;
mod lifecycle;
mod messaging;


use std::collections::BTreeMap;

use easel_common::{Rect, WindowError, WindowId};
use tracing::info;

use crate::native::{WindowFactory, WindowOptions};
use crate::window::{EditorWindow, LayoutSnapshot};

pub use layout::WINDOW_LAYOUT_PROFILE;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// How to look a window up.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowQuery {
    Id(WindowId),
    Name(String),
}

/// What [`WindowRegistry::close`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// A quick window was hidden; it stays registered.
    Hidden,
    Closed,
    /// The main window closed; the shell should shut down.
    MainClosed,
}

pub struct WindowRegistry {
    windows: BTreeMap<WindowId, EditorWindow>,
    main: Option<WindowId>,
    next_id: u64,
    factory: Box<dyn WindowFactory>,
    /// Last known state per window name, including windows since closed.
    states: BTreeMap<String, LayoutSnapshot>,
    default_size: (f64, f64),
}

impl WindowRegistry {
    pub fn new(factory: Box<dyn WindowFactory>) -> Self {
        Self {
            windows: BTreeMap::new(),
            main: None,
            next_id: 0,
            factory,
            states: BTreeMap::new(),
            default_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }

    /// Size for windows with neither explicit nor restored bounds.
    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = (width, height);
        self
    }

    /// Open a window. A saved state for `name` supplies the bounds and dock
    /// layout when `options.bounds` is unset.
    pub fn create(&mut self, name: impl Into<String>, mut options: WindowOptions) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        let name = name.into();

        let restored = self.states.get(&name).cloned();
        if options.bounds.is_none() {
            let (width, height) = self.default_size;
            options.bounds = Some(
                restored
                    .as_ref()
                    .map(LayoutSnapshot::bounds)
                    .unwrap_or_else(|| Rect::new(0.0, 0.0, width, height)),
            );
        }
        if options.title.is_none() {
            options.title = Some(name.clone());
        }

        let native = self.factory.create(id, &options);
        let mut window = EditorWindow::new(
            id,
            name,
            options.kind,
            native,
            options.min_size,
            options.max_size,
        );
        window.layout = restored.and_then(|s| s.layout);
        if options.show {
            window.native.show();
        }

        if self.main.is_none() && (options.main || self.next_id == 1) {
            self.main = Some(id);
        }

        info!(
            window = %id,
            name = window.name(),
            kind = %options.kind,
            main = self.main == Some(id),
            "window created"
        );
        self.windows.insert(id, window);
        id
    }

    pub fn get(&self, id: WindowId) -> Option<&EditorWindow> {
        self.windows.get(&id)
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Result<&mut EditorWindow, WindowError> {
        self.windows.get_mut(&id).ok_or_else(|| not_found(id))
    }

    pub fn find(&self, query: &WindowQuery) -> Option<WindowId> {
        match query {
            WindowQuery::Id(id) => self.windows.contains_key(id).then_some(*id),
            WindowQuery::Name(name) => self
                .windows
                .values()
                .find(|w| w.name() == name)
                .map(EditorWindow::id),
        }
    }

    pub fn find_by_url(&self, url: &str) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.url() == Some(url))
            .map(EditorWindow::id)
    }

    pub fn main_window(&self) -> Option<WindowId> {
        self.main
    }

    pub fn is_main_window(&self, id: WindowId) -> bool {
        self.main == Some(id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn windows(&self) -> impl Iterator<Item = &EditorWindow> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

pub(crate) fn not_found(id: WindowId) -> WindowError {
    WindowError::WindowNotFound(id.to_string())
}
