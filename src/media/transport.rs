//! External media-transport collaborators (spec §1, §6): `RTPTransport`,
//! `AudioTransport` and the media engine. These are interface-only — the
//! spec explicitly places RTP/audio transport primitives out of scope; this
//! crate only defines the seam an embedding application implements.
//!
//! Trait shape grounded on `MediaBackend` (teacher pack,
//! `sip-ua/src/media_backend.rs`), adapted from one async trait per call
//! owned generically by the caller to a set of object-safe, synchronous
//! traits: [`crate::manager::SessionManager`] holds many sessions with
//! possibly-differing transport implementations behind one dialog→session
//! map, and spec §5 requires state mutation to happen with "no internal
//! suspension points" — a plain `fn` is what makes that checkable.

use std::error::Error as StdError;
use std::fmt::Debug;

use crate::sdp::{Direction, MediaDescription};

pub type TransportError = Box<dyn StdError + Send + Sync + 'static>;

/// Called exactly once with the outcome of an [`RtpTransport::init`] call.
pub type InitCompletion = Box<dyn FnOnce(Result<(), TransportError>) + Send>;

/// A single RTP transport: one local port pair, independent of codec or direction.
pub trait RtpTransport: Send + Sync + Debug {
    /// Begin reserving local ports / ICE candidates. Returns immediately;
    /// `on_complete` is invoked later, from any thread, exactly once (spec
    /// §4.1: "Subscribes to per-transport `DidInitialize`/`DidFail` events"
    /// then "Triggers each transport's initialization").
    fn init(&self, on_complete: InitCompletion);
}

/// An active audio stream riding on top of an [`RtpTransport`].
pub trait AudioTransport: Send + Sync + Debug {
    /// `get_local_media(is_offer)` (spec §6). The direction written into the
    /// returned line is overwritten by the session per spec §4.4; callers
    /// only need to set port/transport/formats correctly.
    fn get_local_media(&self, is_offer: bool, direction: Direction) -> MediaDescription;

    /// Start sending/receiving using the negotiated local/remote media lines.
    fn start(
        &self,
        local: &MediaDescription,
        remote: &MediaDescription,
    ) -> Result<(), TransportError>;

    fn stop(&self);

    /// Re-apply a direction change without a full re-negotiation (used while
    /// toggling hold on an already-started transport — spec §4.2 step 2).
    fn update_direction(&self, direction: Direction);

    fn is_active(&self) -> bool;

    fn direction(&self) -> Direction;

    /// Whether at least one RTP packet from the peer has been observed —
    /// the no-media watchdog's `audio_was_received` (spec §4.2).
    fn remote_rtp_address_received(&self) -> bool;

    fn send_dtmf(&self, digit: char) -> Result<(), TransportError>;
}

/// Process-wide media engine: wires/unwires an [`AudioTransport`] into the mixer.
pub trait MediaEngine: Send + Sync + Debug {
    fn connect_audio_transport(&self, transport: &dyn AudioTransport);
    fn disconnect_audio_transport(&self, transport: &dyn AudioTransport);
}
