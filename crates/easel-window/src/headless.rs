//! Window backend without a display.
//!
//! Every operation is recorded into a shared [`HeadlessLog`] so callers can
//! see what a real backend would have been asked to do. Used by the CLI and
//! in tests.

use std::sync::{Arc, Mutex};

use easel_common::{Rect, WindowError, WindowId};
use tracing::trace;

use crate::ipc::IpcMessage;
use crate::native::{NativeWindow, WindowFactory, WindowOptions};

const SCREEN_WIDTH: f64 = 1920.0;
const SCREEN_HEIGHT: f64 = 1080.0;
const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessEvent {
    Created { window: WindowId, title: String },
    Shown(WindowId),
    Hidden(WindowId),
    Focused(WindowId),
    Closed(WindowId),
    Centered(WindowId),
    Loaded { window: WindowId, url: String },
    Sent { window: WindowId, message: IpcMessage },
    Inspected { window: WindowId, x: f64, y: f64 },
}

/// Shared sink for [`HeadlessEvent`]s. Cloning shares the same log.
#[derive(Debug, Clone, Default)]
pub struct HeadlessLog {
    events: Arc<Mutex<Vec<HeadlessEvent>>>,
}

impl HeadlessLog {
    fn push(&self, event: HeadlessEvent) {
        trace!(?event, "headless window event");
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<HeadlessEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Take every recorded event.
    pub fn drain(&self) -> Vec<HeadlessEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    /// Messages delivered to `window`, oldest first.
    pub fn sent_to(&self, window: WindowId) -> Vec<IpcMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HeadlessEvent::Sent { window: w, message } if w == window => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Channels delivered to `window`, oldest first.
    pub fn channels_sent_to(&self, window: WindowId) -> Vec<String> {
        self.sent_to(window).into_iter().map(|m| m.channel).collect()
    }
}

pub struct HeadlessWindow {
    id: WindowId,
    bounds: Rect,
    visible: bool,
    closed: bool,
    url: Option<String>,
    log: HeadlessLog,
}

impl HeadlessWindow {
    pub fn new(id: WindowId, options: &WindowOptions, log: HeadlessLog) -> Self {
        let bounds = options
            .bounds
            .unwrap_or_else(|| Rect::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT));
        log.push(HeadlessEvent::Created {
            window: id,
            title: options.title.clone().unwrap_or_default(),
        });
        Self {
            id,
            bounds,
            visible: false,
            closed: false,
            url: None,
            log,
        }
    }
}

impl NativeWindow for HeadlessWindow {
    fn show(&mut self) {
        self.visible = true;
        self.log.push(HeadlessEvent::Shown(self.id));
    }

    fn hide(&mut self) {
        self.visible = false;
        self.log.push(HeadlessEvent::Hidden(self.id));
    }

    fn focus(&mut self) {
        self.log.push(HeadlessEvent::Focused(self.id));
    }

    fn close(&mut self) {
        self.visible = false;
        self.closed = true;
        self.log.push(HeadlessEvent::Closed(self.id));
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn center(&mut self) {
        self.bounds.x = ((SCREEN_WIDTH - self.bounds.width) / 2.0).max(0.0);
        self.bounds.y = ((SCREEN_HEIGHT - self.bounds.height) / 2.0).max(0.0);
        self.log.push(HeadlessEvent::Centered(self.id));
    }

    fn load_url(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.log.push(HeadlessEvent::Loaded {
            window: self.id,
            url: url.to_string(),
        });
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn send(&mut self, message: &IpcMessage) -> Result<(), WindowError> {
        if self.closed {
            return Err(WindowError::WindowNotFound(self.id.to_string()));
        }
        self.log.push(HeadlessEvent::Sent {
            window: self.id,
            message: message.clone(),
        });
        Ok(())
    }

    fn inspect_at(&mut self, x: f64, y: f64) {
        self.log.push(HeadlessEvent::Inspected {
            window: self.id,
            x,
            y,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessFactory {
    log: HeadlessLog,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the log every window from this factory writes to.
    pub fn log(&self) -> HeadlessLog {
        self.log.clone()
    }
}

impl WindowFactory for HeadlessFactory {
    fn create(&mut self, id: WindowId, options: &WindowOptions) -> Box<dyn NativeWindow> {
        Box::new(HeadlessWindow::new(id, options, self.log.clone()))
    }
}
