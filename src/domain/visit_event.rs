//! Visit event model and queue handle for asynchronous analytics.

use std::net::IpAddr;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// Request metadata captured on the redirect path for later recording.
///
/// Carries only raw inputs; parsing and lookups happen in the worker so the
/// redirect never pays for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    pub key: String,
    pub user_agent: Option<String>,
    pub ip: Option<IpAddr>,
}

impl VisitEvent {
    pub fn new(key: impl Into<String>, user_agent: Option<&str>, ip: Option<IpAddr>) -> Self {
        Self {
            key: key.into(),
            user_agent: user_agent.map(|s| s.to_string()),
            ip,
        }
    }
}

/// Sending half of the bounded visit queue.
///
/// Dispatch never waits: when the queue is full or closed the event is
/// dropped and counted. Losing analytics is acceptable, delaying a redirect
/// is not.
#[derive(Debug, Clone)]
pub struct VisitQueue {
    tx: mpsc::Sender<VisitEvent>,
}

impl VisitQueue {
    /// Creates a queue with the given capacity and returns its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<VisitEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueues an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    pub fn dispatch(&self, event: VisitEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(ev)) => {
                warn!("Visit queue full, dropping visit for {}", ev.key);
                metrics::counter!("visits_dropped_total", "reason" => "queue_full").increment(1);
                false
            }
            Err(TrySendError::Closed(ev)) => {
                warn!("Visit queue closed, dropping visit for {}", ev.key);
                metrics::counter!("visits_dropped_total", "reason" => "queue_closed").increment(1);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}
