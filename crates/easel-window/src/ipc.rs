//! Message envelope exchanged between the main process and pages.
//!
//! Every message is one JSON object:
//! `{"channel": "<name>", "args": [...], "session": 7}`. `session` is set
//! only on request/reply exchanges.

use easel_common::{channels, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    pub channel: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionId>,
}

impl IpcMessage {
    /// A fire-and-forget message.
    pub fn new(channel: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            channel: channel.into(),
            args,
            session: None,
        }
    }

    /// Main -> page request. The page answers on
    /// [`channels::REPLY_FROM_PAGE`] with the same session.
    pub fn request(channel: &str, args: Vec<Value>, session: SessionId) -> Self {
        let mut wrapped = Vec::with_capacity(args.len() + 1);
        wrapped.push(Value::from(channel));
        wrapped.extend(args);
        Self {
            channel: channels::REQUEST_TO_PAGE.to_string(),
            args: wrapped,
            session: Some(session),
        }
    }

    /// Main -> page answer to a query the page tagged with `session`.
    pub fn reply_to_page(session: SessionId, args: Vec<Value>) -> Self {
        Self {
            channel: channels::REPLY_TO_PAGE.to_string(),
            args,
            session: Some(session),
        }
    }

    /// Parse an envelope posted by a page. `None` for anything that is not
    /// a well-formed envelope.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// For a request envelope, the inner channel the page should handle.
    pub fn request_channel(&self) -> Option<&str> {
        if self.channel != channels::REQUEST_TO_PAGE {
            return None;
        }
        self.args.first().and_then(Value::as_str)
    }
}
