//! IPC message validation and dispatch from pages to the shell.

use easel_common::{channels, EaselError, Notification, SessionId, WindowError, WindowId, WindowKind};
use easel_config::ProfileScope;
use easel_window::{IpcMessage, WindowOptions};
use serde::Deserialize;
use serde_json::Value;

use super::core::Shell;
use super::ipc_args::{arg_f64, arg_panel, arg_str, require_session, rest};

// =============================================================================
// IPC ALLOWLIST
// =============================================================================

/// Channels a page may post to the main process.
///
/// Anything else is rejected and logged. Main -> page channels
/// (`panel:run`, the request and reply-to-page envelopes, lifecycle
/// notifications) are deliberately absent.
const ALLOWED_IPC_CHANNELS: &[&str] = &[
    channels::REPLY_FROM_PAGE,
    channels::PANEL_READY,
    channels::PANEL_OPEN,
    channels::PANEL_CLOSE,
    channels::PANEL_DOCK,
    channels::PANEL_UNDOCK,
    channels::PANEL_QUERY_INFO,
    channels::PANEL_WAIT_FOR_CLOSE,
    channels::WINDOW_OPEN,
    channels::WINDOW_QUERY_LAYOUT,
    channels::WINDOW_SAVE_LAYOUT,
    channels::WINDOW_FOCUS,
    channels::WINDOW_LOAD,
    channels::WINDOW_RESIZE,
    channels::WINDOW_CENTER,
    channels::WINDOW_INSPECT_AT,
];

pub fn is_channel_allowed(channel: &str) -> bool {
    ALLOWED_IPC_CHANNELS.contains(&channel)
}

/// Second argument of `window:open`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenWindowArgs {
    kind: Option<WindowKind>,
    title: Option<String>,
    url: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    argv: Vec<Value>,
}

// =============================================================================
// DISPATCH
// =============================================================================

impl Shell {
    /// Handle one raw envelope posted by the page in `window`.
    ///
    /// Malformed envelopes, unknown channels, and bad argument shapes are
    /// logged and returned as errors; nothing is changed in that case.
    /// When a failing query carried a session, the page is answered on
    /// `editor:reply-to-page` with `[null, "<error>"]`. Pending notifications
    /// and replies are flushed afterwards either way.
    pub fn dispatch_ipc(&mut self, window: WindowId, raw: &str) -> Result<(), EaselError> {
        let result = match IpcMessage::from_json(raw) {
            Some(msg) => {
                let answerable =
                    is_channel_allowed(&msg.channel) && msg.channel != channels::REPLY_FROM_PAGE;
                let session = msg.session.filter(|_| answerable);
                let result = self.route_ipc(window, msg);
                if let (Err(e), Some(session)) = (&result, session) {
                    self.reply_to(window, session, vec![Value::Null, Value::from(e.to_string())]);
                }
                result
            }
            None => Err(WindowError::InvalidArgument(format!(
                "malformed envelope ({} bytes)",
                raw.len()
            ))
            .into()),
        };
        if let Err(e) = &result {
            tracing::warn!(window = %window, error = %e, "IPC message rejected");
        }
        self.flush();
        result
    }

    fn route_ipc(&mut self, window: WindowId, msg: IpcMessage) -> Result<(), EaselError> {
        if !is_channel_allowed(&msg.channel) {
            return Err(WindowError::InvalidArgument(format!("unknown channel '{}'", msg.channel)).into());
        }
        if self.windows.get(window).is_none() {
            return Err(WindowError::WindowNotFound(window.to_string()).into());
        }

        tracing::debug!(window = %window, channel = %msg.channel, "IPC message dispatched");

        match msg.channel.as_str() {
            channels::REPLY_FROM_PAGE => {
                let session = require_session(&msg)?;
                self.windows.reply(window, session, msg.args);
            }
            channels::PANEL_READY => {
                let panel = arg_panel(&msg, 0)?;
                if self.panels.is_docked(&panel) {
                    self.panels.on_panel_ready(&mut self.windows, &panel);
                    self.bus.publish(Notification::panel_ready(&panel));
                } else {
                    tracing::warn!(window = %window, panel = %panel, "ready from a panel that is not docked");
                }
            }
            channels::PANEL_OPEN => {
                let panel = arg_panel(&msg, 0)?;
                let opened = self.open_panel(&panel, rest(&msg, 1))?;
                if let Some(session) = msg.session {
                    self.reply_to(window, session, vec![Value::from(opened.0)]);
                }
            }
            channels::PANEL_CLOSE => {
                let panel = arg_panel(&msg, 0)?;
                self.close_panel(&panel);
            }
            channels::PANEL_DOCK => {
                let panel = arg_panel(&msg, 0)?;
                self.panels.dock(panel, window);
            }
            channels::PANEL_UNDOCK => {
                let panel = arg_panel(&msg, 0)?;
                self.panels.undock(&panel);
            }
            channels::PANEL_QUERY_INFO => {
                let panel = arg_panel(&msg, 0)?;
                let session = require_session(&msg)?;
                let info = self
                    .packages
                    .panel_info(&panel)
                    .and_then(|info| serde_json::to_value(&info.manifest).ok())
                    .unwrap_or(Value::Null);
                self.reply_to(window, session, vec![info]);
            }
            channels::PANEL_WAIT_FOR_CLOSE => {
                let panel = arg_panel(&msg, 0)?;
                let session = require_session(&msg)?;
                let outbox = self.outbox.clone();
                self.panels.wait_for_close(
                    &panel,
                    Box::new(move |args| outbox.push(window, IpcMessage::reply_to_page(session, args))),
                );
            }
            channels::WINDOW_OPEN => {
                let opened = self.open_window(&msg)?;
                if let Some(session) = msg.session {
                    self.reply_to(window, session, vec![Value::from(opened.0)]);
                }
            }
            channels::WINDOW_QUERY_LAYOUT => {
                let session = require_session(&msg)?;
                let layout = self
                    .windows
                    .get(window)
                    .and_then(|w| w.layout().cloned())
                    .unwrap_or(Value::Null);
                self.reply_to(window, session, vec![layout]);
            }
            channels::WINDOW_SAVE_LAYOUT => {
                let layout = msg.args.first().cloned().filter(|v| !v.is_null());
                self.windows.commit_window_state(window, layout)?;
                self.windows
                    .save_window_states(&self.profiles, ProfileScope::Local)?;
            }
            channels::WINDOW_FOCUS => self.windows.focus(window)?,
            channels::WINDOW_LOAD => {
                let url = arg_str(&msg, 0)?;
                self.windows.load(window, url, rest(&msg, 1))?;
            }
            channels::WINDOW_RESIZE => {
                let (width, height) = (arg_f64(&msg, 0)?, arg_f64(&msg, 1)?);
                self.windows.resize(window, width, height)?;
            }
            channels::WINDOW_CENTER => self.windows.center(window)?,
            channels::WINDOW_INSPECT_AT => {
                let (x, y) = (arg_f64(&msg, 0)?, arg_f64(&msg, 1)?);
                self.windows.inspect_at(window, x, y)?;
            }
            _ => {
                // Allowlist checked above
                tracing::warn!(window = %window, channel = %msg.channel, "unhandled IPC channel");
            }
        }
        Ok(())
    }

    fn reply_to(&mut self, window: WindowId, session: SessionId, args: Vec<Value>) {
        self.windows
            .send_message(window, &IpcMessage::reply_to_page(session, args));
    }

    /// `window:open [name, {kind, title, url, width, height, argv}]`.
    fn open_window(&mut self, msg: &IpcMessage) -> Result<WindowId, WindowError> {
        let name = arg_str(msg, 0)?.to_string();
        let args: OpenWindowArgs = match msg.args.get(1) {
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| WindowError::InvalidArgument(format!("{}: {e}", msg.channel)))?,
            None => OpenWindowArgs::default(),
        };

        let mut options = WindowOptions::of_kind(args.kind.unwrap_or(WindowKind::Dockable));
        options.title = args.title;
        let id = self.windows.create(name, options);
        if let (Some(width), Some(height)) = (args.width, args.height) {
            self.windows.resize(id, width, height)?;
        }
        if let Some(url) = args.url {
            self.windows.load(id, &url, args.argv)?;
        }
        Ok(id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
