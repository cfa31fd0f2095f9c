//! Live Notifier
//!
//! Decouples scoring from real-time broadcast. Publishing is a plain
//! channel send - never blocking, never failing upward - so a slow or
//! disconnected dashboard can never stall a student's next violation
//! check. Delivery is at-most-once, best-effort.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::feed::MonitoringFeed;
use super::types::{LiveAlert, LiveMessage, LiveUpdate, MonitoringAck};

pub const GLOBAL_CHANNEL: &str = "global";

// ============================================================================
// NOTIFIER
// ============================================================================

struct Subscriber {
    id: String,
    tx: mpsc::UnboundedSender<LiveMessage>,
}

/// Fan-out hub with two channel kinds: per-supervisor and global
#[derive(Default)]
pub struct LiveNotifier {
    supervisors: RwLock<HashMap<String, Vec<Subscriber>>>,
    global: RwLock<Vec<Subscriber>>,
}

impl LiveNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the channel scoped to one supervisor's sessions
    pub fn subscribe_supervisor(&self, supervisor_id: &str) -> MonitoringFeed {
        let (subscriber, feed) = Self::make_subscriber(supervisor_id);
        self.supervisors
            .write()
            .entry(supervisor_id.to_string())
            .or_default()
            .push(subscriber);
        feed
    }

    /// Join the platform-wide oversight channel
    pub fn subscribe_global(&self) -> MonitoringFeed {
        let (subscriber, feed) = Self::make_subscriber(GLOBAL_CHANNEL);
        self.global.write().push(subscriber);
        feed
    }

    fn make_subscriber(channel: &str) -> (Subscriber, MonitoringFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber_id = Uuid::new_v4().to_string();
        // Ack delivered through the same channel as everything else
        let _ = tx.send(LiveMessage::Connected(MonitoringAck {
            channel: channel.to_string(),
            subscriber_id: subscriber_id.clone(),
            timestamp: Utc::now(),
        }));
        let feed = MonitoringFeed::new(channel.to_string(), subscriber_id.clone(), rx);
        (Subscriber { id: subscriber_id, tx }, feed)
    }

    pub fn publish_update(&self, update: LiveUpdate) {
        self.publish(LiveMessage::Update(update));
    }

    pub fn publish_alert(&self, alert: LiveAlert) {
        self.publish(LiveMessage::Alert(alert));
    }

    /// Best-effort fan-out. Closed subscribers are pruned silently;
    /// nothing here can fail the caller.
    pub fn publish(&self, message: LiveMessage) {
        if let Some(supervisor_id) = message.supervisor_id().map(str::to_string) {
            let mut map = self.supervisors.write();
            if let Some(subscribers) = map.get_mut(&supervisor_id) {
                Self::send_all(subscribers, &message);
                if subscribers.is_empty() {
                    map.remove(&supervisor_id);
                }
            }
        }
        Self::send_all(&mut self.global.write(), &message);
    }

    fn send_all(subscribers: &mut Vec<Subscriber>, message: &LiveMessage) {
        subscribers.retain(|subscriber| {
            let delivered = subscriber.tx.send(message.clone()).is_ok();
            if !delivered {
                log::debug!("monitoring subscriber {} gone, pruning", subscriber.id);
            }
            delivered
        });
    }

    pub fn global_subscriber_count(&self) -> usize {
        self.global.read().len()
    }

    pub fn supervisor_subscriber_count(&self, supervisor_id: &str) -> usize {
        self.supervisors
            .read()
            .get(supervisor_id)
            .map_or(0, Vec::len)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::session::{ProctoringSession, SessionMetadata};

    fn session(supervisor: Option<&str>) -> ProctoringSession {
        ProctoringSession::new(
            "s1".to_string(),
            "e1".to_string(),
            "stu1".to_string(),
            supervisor.map(str::to_string),
            SessionMetadata::default(),
        )
    }

    #[test]
    fn test_supervisor_scoping() {
        let notifier = LiveNotifier::new();
        let mut sup1 = notifier.subscribe_supervisor("sup1");
        let mut sup2 = notifier.subscribe_supervisor("sup2");
        let mut global = notifier.subscribe_global();

        notifier.publish_update(LiveUpdate::started(&session(Some("sup1"))));

        sup1.pump();
        sup2.pump();
        global.pump();

        assert_eq!(sup1.updates().len(), 1);
        assert_eq!(sup2.updates().len(), 0);
        assert_eq!(global.updates().len(), 1);
    }

    #[test]
    fn test_unsupervised_session_reaches_global_only() {
        let notifier = LiveNotifier::new();
        let mut sup1 = notifier.subscribe_supervisor("sup1");
        let mut global = notifier.subscribe_global();

        notifier.publish_update(LiveUpdate::started(&session(None)));

        sup1.pump();
        global.pump();
        assert_eq!(sup1.updates().len(), 0);
        assert_eq!(global.updates().len(), 1);
    }

    #[test]
    fn test_subscribe_sends_connected_ack() {
        let notifier = LiveNotifier::new();
        let mut feed = notifier.subscribe_supervisor("sup1");
        feed.pump();
        assert!(feed.is_connected());
        assert_eq!(feed.channel(), "sup1");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned_not_fatal() {
        let notifier = LiveNotifier::new();
        let feed = notifier.subscribe_global();
        assert_eq!(notifier.global_subscriber_count(), 1);
        drop(feed);

        // Publish after the subscriber is gone - must not fail
        notifier.publish_update(LiveUpdate::started(&session(None)));
        assert_eq!(notifier.global_subscriber_count(), 0);
    }

    #[test]
    fn test_async_receive() {
        let notifier = LiveNotifier::new();
        let mut feed = notifier.subscribe_global();
        notifier.publish_update(LiveUpdate::started(&session(None)));

        tokio_test::block_on(async {
            // First message is the subscription ack
            assert!(matches!(feed.recv().await, Some(LiveMessage::Connected(_))));
            assert!(matches!(feed.recv().await, Some(LiveMessage::Update(_))));
        });
    }
}
