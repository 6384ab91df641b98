//! IPC channel names shared by the main process and pages.
//!
//! These strings are part of the compatibility surface with page scripts;
//! do not rename them.

pub const PACKAGE_LOADED: &str = "package:loaded";
pub const PACKAGE_UNLOADED: &str = "package:unloaded";

pub const PANEL_READY: &str = "panel:ready";
pub const PANEL_OPEN: &str = "panel:open";
pub const PANEL_CLOSE: &str = "panel:close";
pub const PANEL_DOCK: &str = "panel:dock";
pub const PANEL_UNDOCK: &str = "panel:undock";
pub const PANEL_RUN: &str = "panel:run";
pub const PANEL_QUERY_INFO: &str = "panel:query-info";
pub const PANEL_WAIT_FOR_CLOSE: &str = "panel:wait-for-close";

pub const WINDOW_OPEN: &str = "window:open";
pub const WINDOW_QUERY_LAYOUT: &str = "window:query-layout";
pub const WINDOW_SAVE_LAYOUT: &str = "window:save-layout";
pub const WINDOW_FOCUS: &str = "window:focus";
pub const WINDOW_LOAD: &str = "window:load";
pub const WINDOW_RESIZE: &str = "window:resize";
pub const WINDOW_CENTER: &str = "window:center";
pub const WINDOW_INSPECT_AT: &str = "window:inspect-at";

/// Main -> page request envelope (carries a session id).
pub const REQUEST_TO_PAGE: &str = "editor:request-to-page";
/// Page -> main reply to a [`REQUEST_TO_PAGE`] envelope.
pub const REPLY_FROM_PAGE: &str = "editor:reply-from-page";
/// Main -> page reply to a query the page sent with a session id.
pub const REPLY_TO_PAGE: &str = "editor:reply-to-page";
