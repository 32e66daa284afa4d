//! Status notification port. The tracker emits events through
//! [`StatusNotifier`] and never learns what transport (if any) is listening;
//! the default implementation fans out over an in-process broadcast channel
//! that a socket layer can subscribe to.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::model::account::AccountStatus;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum StatusEvent {
    StatusChanged {
        account_id: u64,
        status: AccountStatus,
        timestamp: DateTime<Utc>,
    },
    CheckedIn {
        account_id: u64,
        timestamp: DateTime<Utc>,
    },
    CheckedOut {
        account_id: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Fire-and-forget event sink. Implementations must not block and must not
/// fail the calling operation.
pub trait StatusNotifier: Send + Sync {
    fn emit(&self, event: StatusEvent);
}

/// Broadcast-channel notifier. With no subscribers connected the send fails
/// and the event is simply dropped.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<StatusEvent>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Attach an observer; this is the integration point for an external
    /// transport.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusNotifier for BroadcastNotifier {
    fn emit(&self, event: StatusEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no status subscribers connected, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let notifier = BroadcastNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.emit(StatusEvent::CheckedIn {
            account_id: 7,
            timestamp: Utc::now(),
        });

        match rx.recv().await.unwrap() {
            StatusEvent::CheckedIn { account_id, .. } => assert_eq!(account_id, 7),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn emit_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::new();
        notifier.emit(StatusEvent::CheckedOut {
            account_id: 1,
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn events_serialize_with_kebab_case_kind() {
        let event = StatusEvent::StatusChanged {
            account_id: 3,
            status: AccountStatus::OnLeave,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "status-changed");
        assert_eq!(json["status"], "on-leave");
    }
}
