//! The seam between the registry and a platform window toolkit.

use easel_common::{Rect, WindowError, WindowId, WindowKind};

use crate::ipc::IpcMessage;

/// Options for a new window. Unset fields fall back to the kind's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub kind: WindowKind,
    /// Claim the main-window slot if it is free.
    pub main: bool,
    pub title: Option<String>,
    pub bounds: Option<Rect>,
    pub min_size: Option<(f64, f64)>,
    pub max_size: Option<(f64, f64)>,
    pub resizable: Option<bool>,
    pub always_on_top: Option<bool>,
    pub show: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            kind: WindowKind::Dockable,
            main: false,
            title: None,
            bounds: None,
            min_size: None,
            max_size: None,
            resizable: None,
            always_on_top: None,
            show: true,
        }
    }
}

impl WindowOptions {
    pub fn of_kind(kind: WindowKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn resizable(&self) -> bool {
        self.resizable.unwrap_or(self.kind.resizable())
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top.unwrap_or(self.kind.always_on_top())
    }
}

/// A native top-level window hosting one page.
pub trait NativeWindow: Send {
    fn show(&mut self);
    fn hide(&mut self);
    fn focus(&mut self);
    fn close(&mut self);
    fn is_visible(&self) -> bool;

    fn bounds(&self) -> Rect;
    fn set_bounds(&mut self, bounds: Rect);
    /// Move to the middle of the screen, keeping the size.
    fn center(&mut self);

    fn load_url(&mut self, url: &str);
    fn url(&self) -> Option<&str>;

    /// Deliver a message to the page. Fails once the window is closed.
    fn send(&mut self, message: &IpcMessage) -> Result<(), WindowError>;

    /// Open developer tools on the element at `(x, y)`.
    fn inspect_at(&mut self, x: f64, y: f64);
}

/// Creates native windows for the registry.
pub trait WindowFactory: Send {
    fn create(&mut self, id: WindowId, options: &WindowOptions) -> Box<dyn NativeWindow>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_kind_unless_overridden() {
        let float = WindowOptions::of_kind(WindowKind::Float);
        assert!(float.resizable());
        assert!(float.always_on_top());

        let fixed = WindowOptions::of_kind(WindowKind::FixedSize);
        assert!(!fixed.resizable());

        let pinned = WindowOptions {
            always_on_top: Some(true),
            ..WindowOptions::default()
        };
        assert!(pinned.always_on_top());
        assert!(!WindowOptions::default().always_on_top());
    }
}
