//! The session manager (spec §2 "Session manager", §4.2 "Re-INVITE
//! acceptance policy").
//!
//! A process-wide singleton demultiplexing dialog-engine and audio-transport
//! events to their owning session (spec §5: "the session manager is a
//! process-wide singleton with init/teardown exactly once"). Grounded on
//! `sip-ua`'s `Endpoint`-held registries (teacher pack, `registration.rs`'s
//! transaction-keyed maps) generalized from a single map to the two spec
//! calls for: dialog handle → session, audio-transport handle → session.
//! Both are back-references only — the [`Session`] owns its dialog and
//! audio transport; the manager just looks them up (spec §9 "back-references
//! with no ownership").

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::sdp::{MediaType, SdpSession};
use crate::session::Session;

/// Opaque key identifying a dialog, assigned by the embedder (e.g. a
/// `Call-ID`/tag pair hashed down, or a simple counter) — this crate never
/// parses SIP identifiers itself (spec §1 non-goal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogKey(pub u64);

/// Opaque key identifying an audio transport instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioTransportKey(pub u64);

/// What the re-INVITE acceptance policy decided to do (spec §4.2). Execute
/// with [`Session::handle_reinvite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReinviteDecision {
    /// `v_p == v_c`, SDPs identical: echo the active local SDP, respond 200.
    EchoActiveAndRespond200,
    /// `v_p == v_c` but SDPs differ, or any other unexpected version delta.
    Reject488,
    /// `v_p == v_c + 1`, `o=` identity matches, and at least one newly
    /// proposed (non-rejected) media line was found.
    StreamProposed { has_audio: bool },
    /// `v_p == v_c + 1`, `o=` identity matches, no newly proposed media:
    /// build the next answer SDP and respond 200.
    BuildAnswerAndRespond200,
}

/// Pure re-INVITE acceptance policy (spec §4.2 "Re-INVITE acceptance policy
/// (manager, REINVITED event)"). Kept as a free function, independent of the
/// manager's registries, so it is testable without constructing a session.
pub fn evaluate_reinvite(current: &SdpSession, proposed: &SdpSession) -> ReinviteDecision {
    let v_c = current.origin.version;
    let v_p = proposed.origin.version;

    if v_p == v_c {
        if current == proposed {
            ReinviteDecision::EchoActiveAndRespond200
        } else {
            ReinviteDecision::Reject488
        }
    } else if v_p == v_c + 1 {
        if !current.origin.identity_matches(&proposed.origin) {
            return ReinviteDecision::Reject488;
        }
        let newly_proposed = crate::sdp::newly_proposed_media(current, proposed);
        if newly_proposed.is_empty() {
            ReinviteDecision::BuildAnswerAndRespond200
        } else {
            let has_audio = newly_proposed
                .iter()
                .any(|line| line.media_type == MediaType::Audio);
            ReinviteDecision::StreamProposed { has_audio }
        }
    } else {
        ReinviteDecision::Reject488
    }
}

#[derive(Default)]
struct Registries {
    dialogs: HashMap<DialogKey, Session>,
    audio_transports: HashMap<AudioTransportKey, Session>,
}

/// Process-wide singleton (spec §5). Construct exactly once and share via
/// `Arc` or a capability passed at startup (spec §9: "do not rely on hidden
/// construction").
#[derive(Default)]
pub struct SessionManager {
    registries: Mutex<Registries>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_dialog(&self, key: DialogKey, session: Session) {
        self.registries.lock().dialogs.insert(key, session);
    }

    pub fn unregister_dialog(&self, key: DialogKey) {
        self.registries.lock().dialogs.remove(&key);
    }

    pub fn register_audio_transport(&self, key: AudioTransportKey, session: Session) {
        self.registries.lock().audio_transports.insert(key, session);
    }

    pub fn unregister_audio_transport(&self, key: AudioTransportKey) {
        self.registries.lock().audio_transports.remove(&key);
    }

    pub fn session_for_dialog(&self, key: DialogKey) -> Option<Session> {
        self.registries.lock().dialogs.get(&key).cloned()
    }

    pub fn session_for_audio_transport(&self, key: AudioTransportKey) -> Option<Session> {
        self.registries.lock().audio_transports.get(&key).cloned()
    }

    /// Route a dialog-engine event to its session, if one is registered.
    /// Returns `false` if `key` is unknown (e.g. already torn down).
    pub fn dispatch_dialog_event(&self, key: DialogKey, event: crate::dialog::DialogEvent) -> bool {
        let Some(session) = self.session_for_dialog(key) else {
            return false;
        };
        session.handle_dialog_event(event);
        true
    }

    /// Evaluate and apply the re-INVITE acceptance policy for a dialog's
    /// currently active vs. newly proposed remote SDP, then route the
    /// decision to the owning session for execution.
    pub fn dispatch_reinvite(
        &self,
        key: DialogKey,
        current_remote: &SdpSession,
        proposed_remote: SdpSession,
    ) -> bool {
        let Some(session) = self.session_for_dialog(key) else {
            return false;
        };
        let decision = evaluate_reinvite(current_remote, &proposed_remote);
        session.handle_reinvite(decision, proposed_remote);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdp::{Direction, MediaDescription, Origin};
    use std::net::IpAddr;

    fn origin(version: u64) -> Origin {
        Origin {
            user: "alice".into(),
            id: 1,
            version,
            net_type: "IN".into(),
            address_type: "IP4".into(),
            address: "10.0.0.1".into(),
        }
    }

    fn audio_line(port: u16) -> MediaDescription {
        MediaDescription {
            media_type: MediaType::Audio,
            port,
            transport: "RTP/AVP".into(),
            formats: vec!["0".into()],
            direction: Direction::SendRecv,
            attributes: vec![],
        }
    }

    fn sdp(version: u64, port: u16) -> SdpSession {
        SdpSession {
            origin: origin(version),
            connection_address: "10.0.0.1".parse::<IpAddr>().unwrap(),
            start_time: 0,
            stop_time: 0,
            media: vec![audio_line(port)],
        }
    }

    #[test]
    fn same_version_identical_sdp_echoes_and_responds_200() {
        let current = sdp(1, 4000);
        let proposed = current.clone();
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::EchoActiveAndRespond200
        );
    }

    #[test]
    fn same_version_different_sdp_is_rejected() {
        let current = sdp(1, 4000);
        let proposed = sdp(1, 4002);
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::Reject488
        );
    }

    #[test]
    fn next_version_with_differing_origin_identity_is_rejected() {
        let current = sdp(1, 4000);
        let mut proposed = sdp(2, 4000);
        proposed.origin.address = "10.0.0.2".into();
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::Reject488
        );
    }

    #[test]
    fn next_version_no_new_media_builds_answer() {
        let current = sdp(1, 4000);
        let proposed = sdp(2, 4000);
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::BuildAnswerAndRespond200
        );
    }

    #[test]
    fn next_version_new_media_line_is_stream_proposed() {
        let current = sdp(1, 4000);
        let mut proposed = sdp(2, 4000);
        proposed.media.push(audio_line(4010));
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::StreamProposed { has_audio: true }
        );
    }

    #[test]
    fn unexpected_version_delta_is_rejected() {
        let current = sdp(1, 4000);
        let proposed = sdp(5, 4000);
        assert_eq!(
            evaluate_reinvite(&current, &proposed),
            ReinviteDecision::Reject488
        );
    }
}
