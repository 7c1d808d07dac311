//! Notification bus façade (spec §6, §9 "Observer pattern → typed event bus").
//!
//! The original source dispatches notifications by reflecting on their
//! string name; we use a single tagged enum instead so a listener's `match`
//! is exhaustive at compile time. Delivery is broadcast (every subscriber
//! sees every notification for the session it subscribed to), unbounded in
//! subscriber count, FIFO per session — matching the ordering guarantees of
//! spec §5.

use std::fmt;
use std::time::SystemTime;

use tokio::sync::broadcast;

/// A timestamped, session-scoped notification (spec §6).
#[derive(Debug, Clone)]
pub struct Notification {
    pub timestamp: SystemTime,
    pub event: SessionEvent,
}

/// Who caused a state transition or failure: the local application, or the remote peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Originator {
    Local,
    Remote,
}

impl fmt::Display for Originator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Originator::Local => f.write_str("local"),
            Originator::Remote => f.write_str("remote"),
        }
    }
}

/// All notifications a [`crate::session::Session`] may emit.
///
/// Field names mirror spec §6 exactly; this enum is the typed replacement
/// for the original's `SIPSessionDidStart` / `SIPSessionGotHoldRequest` /
/// ... string-keyed notifications.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ChangedState {
        prev: super::session::State,
        state: super::session::State,
    },
    NewOutgoing {
        audio: bool,
    },
    NewIncoming {
        has_audio: bool,
    },
    GotRingIndication,
    WillStart,
    DidStart,
    WillEnd,
    DidFail {
        originator: Originator,
        code: Option<u16>,
        reason: String,
    },
    DidEnd {
        originator: Originator,
    },
    GotHoldRequest {
        originator: Originator,
    },
    GotUnholdRequest {
        originator: Originator,
    },
    GotStreamProposal {
        has_audio: bool,
    },
    RejectedStreamProposal {
        originator: Originator,
    },
    AcceptedStreamProposal,
    GotNoAudio,
    StartedRecordingAudio {
        file_name: String,
    },
    StoppedRecordingAudio {
        file_name: String,
    },
    GotDTMF {
        digit: char,
    },
}

/// Per-session publish/subscribe bus.
///
/// One bus is owned per [`crate::session::Session`]; the manager never
/// shares a bus across sessions. Publishing while no subscriber is attached
/// is not an error (mirrors `broadcast::Sender::send`'s "no receivers"
/// outcome — the event is simply dropped).
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    tx: broadcast::Sender<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publish a notification, stamping it with the current time.
    ///
    /// Called with the session lock held (spec §5: "Locks are held across
    /// notification dispatch... a deliberate choice preserving ordering").
    pub fn publish(&self, event: SessionEvent) {
        let notification = Notification {
            timestamp: SystemTime::now(),
            event,
        };
        // A send error just means there are no subscribers left; that is
        // not a misuse of the bus.
        let _ = self.tx.send(notification);
    }
}
