//! Argument extraction for IPC handlers. Every shape error becomes
//! `WindowError::InvalidArgument`.

use easel_common::{PanelId, SessionId, WindowError};
use easel_window::IpcMessage;
use serde_json::Value;

fn invalid(channel: &str, what: impl std::fmt::Display) -> WindowError {
    WindowError::InvalidArgument(format!("{channel}: {what}"))
}

pub(super) fn arg_str<'a>(msg: &'a IpcMessage, index: usize) -> Result<&'a str, WindowError> {
    msg.args
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(&msg.channel, format!("argument {index} must be a string")))
}

pub(super) fn arg_f64(msg: &IpcMessage, index: usize) -> Result<f64, WindowError> {
    msg.args
        .get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid(&msg.channel, format!("argument {index} must be a number")))
}

pub(super) fn arg_panel(msg: &IpcMessage, index: usize) -> Result<PanelId, WindowError> {
    arg_str(msg, index)?
        .parse()
        .map_err(|e| invalid(&msg.channel, e))
}

/// Arguments from `index` on, used as a run payload.
pub(super) fn rest(msg: &IpcMessage, index: usize) -> Vec<Value> {
    msg.args.iter().skip(index).cloned().collect()
}

pub(super) fn require_session(msg: &IpcMessage) -> Result<SessionId, WindowError> {
    msg.session
        .ok_or_else(|| invalid(&msg.channel, "missing session"))
}
