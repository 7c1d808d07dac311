//! # SIP session controller
//!
//! A state machine layered on top of a SIP dialog (INVITE transaction
//! family) that coordinates SDP offer/answer negotiation, media-stream
//! lifecycle, hold/unhold re-INVITE sequencing, optional recording, and
//! user-visible event emission. It sits between a lower-level SIP dialog
//! engine and a media-transport subsystem, both of which are modeled as
//! traits ([`dialog::Invitation`], [`media::RtpTransport`],
//! [`media::AudioTransport`], [`media::MediaEngine`]) rather than
//! implemented here.
//!
//! Notable types are
//!
//! - [`session::Session`] — one state machine per SIP dialog.
//! - [`manager::SessionManager`] — demultiplexes dialog/audio-transport
//!   events to the owning session and holds the re-INVITE acceptance policy.
//! - [`media::MediaTransportInitializer`] — fans N transport
//!   initializations in to a single success/failure continuation.
//!
//! The modules [`dialog`], [`media`] and [`players`] are interface-only:
//! SIP wire parsing, SDP text encoding, codec negotiation internals,
//! authentication/registration and non-audio media are out of scope.

pub mod config;
pub mod dialog;
pub mod error;
pub mod manager;
pub mod media;
pub mod notifications;
pub mod players;
pub mod sdp;
pub mod session;

pub use manager::SessionManager;
pub use notifications::{Notification, NotificationCenter, Originator, SessionEvent};
pub use session::{CallDirection, Session, State};
