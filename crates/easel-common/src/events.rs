use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

use crate::channels;
use crate::id::PanelId;

/// A lifecycle event broadcast to every observer (and, via the shell, to
/// every window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Notification {
    pub fn new(channel: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            channel: channel.into(),
            args,
        }
    }

    pub fn package_loaded(name: &str) -> Self {
        Self::new(channels::PACKAGE_LOADED, vec![Value::from(name)])
    }

    pub fn package_unloaded(name: &str) -> Self {
        Self::new(channels::PACKAGE_UNLOADED, vec![Value::from(name)])
    }

    pub fn panel_ready(panel: &PanelId) -> Self {
        Self::new(channels::PANEL_READY, vec![Value::from(panel.to_string())])
    }

    /// First argument as a string, which is the package or panel name for
    /// every lifecycle notification.
    pub fn subject(&self) -> Option<&str> {
        self.args.first().and_then(Value::as_str)
    }
}

/// Fan-out of [`Notification`]s. Cloning shares the same channel.
///
/// Broadcast subscribers that fall more than `capacity` behind lose the
/// oldest notifications. A bus built with [`NotificationBus::with_forwarding`]
/// also feeds an unbounded queue that never drops.
#[derive(Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
    forward: Option<mpsc::UnboundedSender<Notification>>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            forward: None,
        }
    }

    /// A bus plus the receiving end of its lossless forwarding queue.
    pub fn with_forwarding(capacity: usize) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut bus = Self::new(capacity);
        bus.forward = Some(tx);
        (bus, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers that received the notification.
    pub fn publish(&self, notification: Notification) -> usize {
        tracing::debug!(channel = %notification.channel, "notification published");
        if let Some(forward) = &self.forward {
            if forward.send(notification.clone()).is_err() {
                tracing::trace!("notification forwarding queue closed");
            }
        }
        self.sender.send(notification).unwrap_or(0)
    }

    /// Drain everything currently queued on a receiver without waiting.
    pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(n) => out.push(n),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification receiver lagged");
                }
                Err(_) => break,
            }
        }
        out
    }

    /// Drain the forwarding queue without waiting.
    pub fn drain_forwarded(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = rx.try_recv() {
            out.push(n);
        }
        out
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Notification::package_loaded("console"));

        let n = rx.recv().await.unwrap();
        assert_eq!(n.channel, channels::PACKAGE_LOADED);
        assert_eq!(n.subject(), Some("console"));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = NotificationBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Notification::package_unloaded("console"));

        let n1 = rx1.recv().await.unwrap();
        let n2 = rx2.recv().await.unwrap();
        assert_eq!(n1, n2);
        assert_eq!(n1.channel, channels::PACKAGE_UNLOADED);
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = NotificationBus::new(16);
        assert_eq!(bus.publish(Notification::package_loaded("x")), 0);
    }

    #[test]
    fn clones_share_the_channel() {
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();
        let other = bus.clone();

        other.publish(Notification::package_loaded("a"));
        bus.publish(Notification::package_loaded("b"));

        let subjects: Vec<_> = NotificationBus::drain(&mut rx)
            .into_iter()
            .map(|n| n.subject().unwrap().to_string())
            .collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }

    #[test]
    fn drain_on_empty_receiver() {
        let bus = NotificationBus::new(4);
        let mut rx = bus.subscribe();
        assert!(NotificationBus::drain(&mut rx).is_empty());
    }

    #[test]
    fn forwarding_queue_keeps_what_broadcast_drops() {
        let (bus, mut forwarded) = NotificationBus::with_forwarding(4);
        let mut rx = bus.subscribe();

        for i in 0..10 {
            bus.clone()
                .publish(Notification::package_loaded(&format!("pkg{i}")));
        }

        assert_eq!(NotificationBus::drain(&mut rx).len(), 4);
        let subjects: Vec<_> = NotificationBus::drain_forwarded(&mut forwarded)
            .into_iter()
            .map(|n| n.subject().unwrap().to_string())
            .collect();
        assert_eq!(subjects.len(), 10);
        assert_eq!(subjects.first().map(String::as_str), Some("pkg0"));
        assert_eq!(subjects.last().map(String::as_str), Some("pkg9"));
    }

    #[test]
    fn panel_ready_carries_panel_id() {
        let id: PanelId = "assets.browser".parse().unwrap();
        let n = Notification::panel_ready(&id);
        assert_eq!(n.channel, channels::PANEL_READY);
        assert_eq!(n.subject(), Some("assets.browser"));
    }
}
