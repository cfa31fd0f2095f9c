//! Monitoring Feed
//!
//! Subscriber-side view of a live channel: a receiver plus bounded
//! recent-history buffers. Retaining history is a presentation concern of
//! the subscriber - the engine keeps nothing.

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::constants::{FEED_ALERT_CAP, FEED_UPDATE_CAP};

use super::types::{LiveAlert, LiveMessage, LiveUpdate};

// ============================================================================
// FEED
// ============================================================================

pub struct MonitoringFeed {
    channel: String,
    subscriber_id: String,
    rx: mpsc::UnboundedReceiver<LiveMessage>,
    updates: VecDeque<LiveUpdate>,
    alerts: VecDeque<LiveAlert>,
    connected: bool,
}

impl MonitoringFeed {
    pub(crate) fn new(
        channel: String,
        subscriber_id: String,
        rx: mpsc::UnboundedReceiver<LiveMessage>,
    ) -> Self {
        Self {
            channel,
            subscriber_id,
            rx,
            updates: VecDeque::new(),
            alerts: VecDeque::new(),
            connected: false,
        }
    }

    /// Drain everything currently queued into the history buffers.
    /// Returns the number of messages absorbed.
    pub fn pump(&mut self) -> usize {
        let mut absorbed = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.absorb(message);
            absorbed += 1;
        }
        absorbed
    }

    /// Await the next raw message (for push-style consumers)
    pub async fn recv(&mut self) -> Option<LiveMessage> {
        self.rx.recv().await
    }

    fn absorb(&mut self, message: LiveMessage) {
        match message {
            LiveMessage::Update(update) => {
                self.updates.push_front(update);
                self.updates.truncate(FEED_UPDATE_CAP);
            }
            LiveMessage::Alert(alert) => {
                self.alerts.push_front(alert);
                self.alerts.truncate(FEED_ALERT_CAP);
            }
            LiveMessage::Connected(_) => self.connected = true,
        }
    }

    /// Recent updates, newest first
    pub fn updates(&self) -> &VecDeque<LiveUpdate> {
        &self.updates
    }

    /// Recent alerts, newest first
    pub fn alerts(&self) -> &VecDeque<LiveAlert> {
        &self.alerts
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn subscriber_id(&self) -> &str {
        &self.subscriber_id
    }
}

// ============================================================================
// TESTS
// ============================================================================
