//! Delivery to pages and main -> page request sessions.

use easel_common::{SessionId, WindowError, WindowId};
use serde_json::Value;
use tracing::{debug, warn};

use super::WindowRegistry;
use crate::ipc::IpcMessage;
use crate::session::ReplyCallback;

impl WindowRegistry {
    /// Send `channel` to the page and remember `reply` until the page
    /// answers, the request is cancelled, or the window closes.
    pub fn send_request_to_page(
        &mut self,
        id: WindowId,
        channel: &str,
        args: Vec<Value>,
        reply: ReplyCallback,
    ) -> Result<SessionId, WindowError> {
        if channel.trim().is_empty() {
            return Err(WindowError::InvalidArgument(
                "request channel must not be empty".into(),
            ));
        }
        let window = self.window_mut(id)?;
        let session = window.sessions.open(reply);
        let message = IpcMessage::request(channel, args, session);
        if let Err(e) = window.native.send(&message) {
            window.sessions.cancel(session);
            return Err(e);
        }
        debug!(window = %id, channel, session = session.0, "request sent to page");
        Ok(session)
    }

    /// Drop a pending request without calling its callback.
    pub fn cancel_request_to_page(&mut self, id: WindowId, session: SessionId) -> bool {
        match self.windows.get_mut(&id) {
            Some(window) => window.sessions.cancel(session),
            None => false,
        }
    }

    /// Deliver the page's reply. Replies for unknown or finished sessions
    /// are ignored.
    pub fn reply(&mut self, id: WindowId, session: SessionId, args: Vec<Value>) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            warn!(window = %id, session = session.0, "reply from unknown window ignored");
            return false;
        };
        let resolved = window.sessions.resolve(session, args);
        if !resolved {
            debug!(window = %id, session = session.0, "reply without pending session ignored");
        }
        resolved
    }

    /// Deliver a prepared envelope. Failures are logged, not raised.
    pub fn send_message(&mut self, id: WindowId, message: &IpcMessage) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            warn!(window = %id, channel = %message.channel, "send to unknown window dropped");
            return false;
        };
        match window.native.send(message) {
            Ok(()) => true,
            Err(e) => {
                warn!(window = %id, channel = %message.channel, error = %e, "send failed");
                false
            }
        }
    }

    pub fn send_to_page(&mut self, id: WindowId, channel: &str, args: Vec<Value>) -> bool {
        self.send_message(id, &IpcMessage::new(channel, args))
    }

    /// Broadcast to every window. Returns how many accepted the message.
    pub fn send_to_all(&mut self, channel: &str, args: Vec<Value>) -> usize {
        let message = IpcMessage::new(channel, args);
        self.ids()
            .into_iter()
            .filter(|id| self.send_message(*id, &message))
            .count()
    }

    pub fn send_to_main(&mut self, channel: &str, args: Vec<Value>) -> bool {
        match self.main {
            Some(id) => self.send_to_page(id, channel, args),
            None => {
                warn!(channel, "no main window to send to");
                false
            }
        }
    }
}
