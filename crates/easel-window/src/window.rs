use easel_common::{Rect, WindowId, WindowKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::native::NativeWindow;
use crate::session::SessionTable;

/// Persisted geometry plus the page's opaque dock tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
}

impl LayoutSnapshot {
    pub fn new(bounds: Rect, layout: Option<Value>) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            layout,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Replace a non-positive width or height with the default. Returns
    /// whether anything changed.
    pub fn correct_size(&mut self, default_width: f64, default_height: f64) -> bool {
        let mut corrected = false;
        if self.width <= 0.0 {
            self.width = default_width;
            corrected = true;
        }
        if self.height <= 0.0 {
            self.height = default_height;
            corrected = true;
        }
        corrected
    }
}

/// One open editor window and the state the registry keeps for it.
pub struct EditorWindow {
    id: WindowId,
    name: String,
    kind: WindowKind,
    pub(crate) native: Box<dyn NativeWindow>,
    pub(crate) sessions: SessionTable,
    pub(crate) loaded: bool,
    pub(crate) argv: Vec<Value>,
    pub(crate) layout: Option<Value>,
    min_size: Option<(f64, f64)>,
    max_size: Option<(f64, f64)>,
}

impl EditorWindow {
    pub(crate) fn new(
        id: WindowId,
        name: String,
        kind: WindowKind,
        native: Box<dyn NativeWindow>,
        min_size: Option<(f64, f64)>,
        max_size: Option<(f64, f64)>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            native,
            sessions: SessionTable::new(),
            loaded: false,
            argv: Vec::new(),
            layout: None,
            min_size,
            max_size,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Whether the page has reported itself ready since the last load.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_visible(&self) -> bool {
        self.native.is_visible()
    }

    pub fn url(&self) -> Option<&str> {
        self.native.url()
    }

    pub fn bounds(&self) -> Rect {
        self.native.bounds()
    }

    /// Arguments passed with the last `load`.
    pub fn argv(&self) -> &[Value] {
        &self.argv
    }

    /// Last dock tree the page committed.
    pub fn layout(&self) -> Option<&Value> {
        self.layout.as_ref()
    }

    pub fn pending_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::new(self.bounds(), self.layout.clone())
    }

    /// Clamp a requested size to the window's min/max constraints.
    pub(crate) fn clamp_size(&self, width: f64, height: f64) -> (f64, f64) {
        let (mut w, mut h) = (width, height);
        if let Some((min_w, min_h)) = self.min_size {
            w = w.max(min_w);
            h = h.max(min_h);
        }
        if let Some((max_w, max_h)) = self.max_size {
            w = w.min(max_w);
            h = h.min(max_h);
        }
        (w, h)
    }
}

impl std::fmt::Debug for EditorWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorWindow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("loaded", &self.loaded)
            .field("sessions", &self.sessions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_round_trips_through_profile_json() {
        let snap = LayoutSnapshot::new(Rect::new(10.0, 20.0, 640.0, 480.0), Some(json!({"dock": []})));
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["width"], json!(640.0));
        let back: LayoutSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn zero_size_is_corrected() {
        let mut snap = LayoutSnapshot::new(Rect::new(0.0, 0.0, 0.0, 300.0), None);
        assert!(snap.correct_size(800.0, 600.0));
        assert_eq!(snap.bounds(), Rect::new(0.0, 0.0, 800.0, 300.0));
        assert!(!snap.correct_size(800.0, 600.0));
    }
}
