//! Forwarding bus notifications and deferred replies to pages.

use std::sync::{Arc, Mutex};

use easel_common::{NotificationBus, WindowId};
use easel_window::IpcMessage;
use tracing::trace;

use super::core::Shell;

/// Messages produced by callbacks that cannot reach the window registry
/// themselves (for example a `panel:wait-for-close` reply). Drained by
/// [`Shell::flush`].
#[derive(Clone, Default)]
pub(crate) struct Outbox {
    queue: Arc<Mutex<Vec<(WindowId, IpcMessage)>>>,
}

impl Outbox {
    pub(crate) fn push(&self, window: WindowId, message: IpcMessage) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push((window, message));
        }
    }

    fn take(&self) -> Vec<(WindowId, IpcMessage)> {
        self.queue
            .lock()
            .map(|mut q| std::mem::take(&mut *q))
            .unwrap_or_default()
    }
}

impl Shell {
    /// Deliver queued replies, then broadcast pending notifications to every
    /// window. Returns the number of notifications forwarded.
    pub fn flush(&mut self) -> usize {
        for (window, message) in self.outbox.take() {
            self.windows.send_message(window, &message);
        }

        let notifications = NotificationBus::drain_forwarded(&mut self.notifications);
        let count = notifications.len();
        for notification in notifications {
            trace!(channel = %notification.channel, "forwarding notification");
            self.windows
                .send_to_all(&notification.channel, notification.args);
        }
        count
    }
}
