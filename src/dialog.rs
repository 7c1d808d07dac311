//! The SIP dialog engine seam (spec §1, §6: `Invitation`).
//!
//! Entirely interface-only: SIP wire parsing, transaction retransmission and
//! timers are a non-goal (spec §1, §11) and live in whatever dialog engine
//! the embedder plugs in. This module only names the capability the session
//! state machine drives.
//!
//! Method names are taken verbatim from spec §6's "Consumed from dialog
//! engine" list. Calls are synchronous: spec §5 requires every
//! state-affecting operation to execute "synchronously inside a mutex
//! critical section" with "no internal suspension points" — a plain `fn`
//! boundary is what makes that invariant checkable by the type system
//! rather than by convention. A concrete dialog engine is free to implement
//! these by handing the request to its own worker thread and blocking for
//! the local part of the exchange, the way `sip-ua`'s `Dialog` methods
//! (teacher pack) hand requests to the SIP transaction layer.

use crate::sdp::SdpSession;

/// Where the underlying SIP dialog/transaction currently is. A session only
/// ever observes these through [`DialogEvent::ChangedState`] — it never
/// drives them directly (that's the dialog engine's job).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Null,
    Calling,
    Early,
    Connecting,
    Confirmed,
    Disconnecting,
    Disconnected,
}

/// Data accompanying a dialog-engine event (spec §4.2's failure-reason
/// precedence reads several of these fields).
#[derive(Debug, Clone, Default)]
pub struct DialogEventData {
    pub code: Option<u16>,
    pub reason: Option<String>,
    pub warning: Option<String>,
    pub method: Option<String>,
    /// Raw `User-Agent` header, when present on `Connecting`/`Disconnected`.
    pub user_agent: Option<String>,
    /// Raw `Server` header, when present on `Connecting`/`Disconnected`
    /// (outgoing calls only — spec §3 `remote_user_agent`, precedence
    /// resolved by `session::remote_user_agent_from`).
    pub server: Option<String>,
}

/// An event surfaced by the dialog engine for one dialog (spec §4.2 table's
/// "dialog ..." rows, and SDPUpdate/DTMF from §5).
#[derive(Debug, Clone)]
pub enum DialogEvent {
    ChangedState {
        prev: DialogState,
        state: DialogState,
        data: DialogEventData,
    },
    /// A re-INVITE (or its answer) changed the negotiated SDP.
    SdpUpdate {
        remote: SdpSession,
    },
    Dtmf {
        digit: char,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("dialog engine error: {0}")]
pub struct DialogError(pub String);

/// The dialog engine's INVITE-family capability (spec §6).
///
/// A session owns exactly one `Box<dyn Invitation>` for its whole lifetime
/// (spec §3 `dialog` field), cleared when the session reaches `TERMINATED`.
pub trait Invitation: Send + Sync {
    fn state(&self) -> DialogState;
    fn is_outgoing(&self) -> bool;
    fn caller_uri(&self) -> &str;
    fn remote_uri(&self) -> &str;

    fn send_invite(&self) -> Result<(), DialogError>;
    fn accept_invite(&self) -> Result<(), DialogError>;
    fn respond_to_invite_provisionally(&self, code: u16) -> Result<(), DialogError>;
    fn respond_to_reinvite(&self, code: u16) -> Result<(), DialogError>;
    fn send_reinvite(&self) -> Result<(), DialogError>;
    /// `code: None` means "use the dialog engine's default" (BYE/CANCEL as appropriate).
    fn disconnect(&self, code: Option<u16>) -> Result<(), DialogError>;

    fn set_offered_local_sdp(&self, sdp: SdpSession);
    fn get_offered_remote_sdp(&self) -> Option<SdpSession>;
    fn get_active_local_sdp(&self) -> Option<SdpSession>;
    fn get_active_remote_sdp(&self) -> Option<SdpSession>;
}
