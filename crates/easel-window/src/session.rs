//! Pending main -> page requests for one window.

use std::collections::BTreeMap;
use std::fmt;

use easel_common::SessionId;
use serde_json::Value;
use tracing::trace;

/// Called once with the page's reply arguments (empty when the window
/// closed before answering).
pub type ReplyCallback = Box<dyn FnOnce(Vec<Value>) + Send>;

/// Session id -> reply callback. Ids increase monotonically and are never
/// reused for the lifetime of the table.
#[derive(Default)]
pub struct SessionTable {
    last: u64,
    pending: BTreeMap<SessionId, ReplyCallback>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, reply: ReplyCallback) -> SessionId {
        self.last += 1;
        let id = SessionId(self.last);
        self.pending.insert(id, reply);
        trace!(session = id.0, "session opened");
        id
    }

    /// Forget a session without calling it. Returns whether it was pending.
    pub fn cancel(&mut self, id: SessionId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Call and remove the session's callback. Unknown or already-resolved
    /// sessions are ignored.
    pub fn resolve(&mut self, id: SessionId, args: Vec<Value>) -> bool {
        match self.pending.remove(&id) {
            Some(reply) => {
                reply(args);
                true
            }
            None => false,
        }
    }

    /// Resolve every pending session with empty args, oldest first.
    pub fn resolve_all(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for (_, reply) in pending {
            reply(Vec::new());
        }
        count
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl fmt::Debug for SessionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTable")
            .field("last", &self.last)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}
