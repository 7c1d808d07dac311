//! Error types for synchronous misuse (spec §7 kind 1).
//!
//! One narrow enum per entry-point family, grounded on `sip-ua`'s own style
//! (`AcceptCallError<M>`, `MakeCallError`, `RegisterError<A>` — teacher
//! pack) rather than a single crate-wide error type. Misuse never mutates
//! session state (spec §7 policy).

use thiserror::Error;

use crate::session::State;

/// Returned by [`crate::session::Session::accept`] when the offered media
/// doesn't match what the caller asked to accept.
#[derive(Debug, Error)]
pub enum AcceptError {
    #[error("session is in state {0:?}, expected INCOMING")]
    WrongState(State),
    #[error("accept requested audio but the remote offer contains no audio line")]
    InvalidMedia,
}

/// Returned by [`crate::session::Session::hold`]/[`crate::session::Session::unhold`].
#[derive(Debug, Error)]
pub enum HoldError {
    #[error("session is in state {0:?}, expected ESTABLISHED")]
    WrongState(State),
}

/// Returned by [`crate::session::Session::start_recording_audio`].
#[derive(Debug, Error)]
pub enum StartRecordingError {
    #[error("no active audio transport to record")]
    NoActiveAudio,
    #[error("recording is already in progress")]
    AlreadyRecording,
}

/// Returned by [`crate::session::Session::stop_recording_audio`].
#[derive(Debug, Error)]
pub enum StopRecordingError {
    #[error("no recording in progress")]
    NotRecording,
}

/// Returned by [`crate::session::Session::send_dtmf`].
#[derive(Debug, Error)]
pub enum SendDtmfError {
    #[error("session is in state {0:?}, expected ESTABLISHED")]
    WrongState(State),
    #[error("no active audio transport")]
    NoActiveAudio,
    #[error("audio transport rejected DTMF: {0}")]
    TransportFailure(String),
}

/// Returned by [`crate::session::Session::reject_proposal`]/`accept_proposal`.
#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("session is in state {0:?}, expected PROPOSED")]
    WrongState(State),
    /// `accept_proposal` is reserved (spec §9: "stubs; treat as reserved,
    /// not implemented") — it never succeeds.
    #[error("accept_proposal is not implemented; use reject_proposal instead")]
    NotImplemented,
}
