//! The session state machine (spec §4.2) — the core of this crate.
//!
//! Grounded on `sip-ua`'s `Call`/`InboundCall` pair (teacher pack,
//! `src/call.rs`, `src/inbound_call.rs`): a cheap `Clone`-able handle
//! wrapping an `Arc` around a lock-guarded inner struct, with construction
//! split into a "shell" (dialog attached, state `NULL`→first real state)
//! followed by an async continuation once media is ready. Unlike the
//! teacher, every method here runs synchronously to the point of emitting
//! its notifications (spec §5): the only background work is the no-media
//! watchdog and whatever thread the embedder's `RtpTransport`/`Invitation`
//! implementations use internally.

mod actions;
mod inner;
mod recording;
mod state;
mod watchdog;

pub use state::{CallDirection, State};

use std::net::IpAddr;
use std::sync::Arc;
use std::time::SystemTime;

use log::warn;
use parking_lot::Mutex;

use crate::config::{RingtoneConfig, RtpConfig};
use crate::dialog::{DialogEvent, DialogEventData, DialogState, Invitation};
use crate::error::{
    AcceptError, HoldError, ProposalError, SendDtmfError, StartRecordingError, StopRecordingError,
};
use crate::manager::ReinviteDecision;
use crate::media::{AudioTransport, MediaEngine, MediaTransportInitializer, RtpTransport};
use crate::notifications::{Notification, NotificationCenter, Originator, SessionEvent};
use crate::players::{RecordingPlayer, RingtonePlayer};
use crate::sdp::{build_answer, build_offer, Direction, Origin, SdpSession};

use actions::Action;
use inner::{remote_user_agent_from, SessionInner};

struct Core {
    rtp_config: RtpConfig,
    engine: Arc<dyn MediaEngine>,
    notifications: NotificationCenter,
    inner: Mutex<SessionInner>,
}

/// A handle to one SIP session. Cheap to clone; every clone refers to the
/// same underlying state and lock (spec §3: "Session (one per dialog)").
#[derive(Clone)]
pub struct Session(Arc<Core>);

impl Session {
    fn from_core(core: Arc<Core>) -> Session {
        Session(core)
    }

    /// Begin a new outgoing call (spec §4.2 `NULL --new(audio=true)--> CALLING`).
    ///
    /// `build_audio` is invoked once every transport in `transports` has
    /// finished initializing (spec §4.1); it turns the raw RTP handles into
    /// the concrete [`AudioTransport`] the embedder wants to use, kept out
    /// of this crate's scope (spec §1: codec negotiation internals).
    ///
    /// Returns the handle together with a receiver already subscribed to
    /// its notification bus, so the very first `NewOutgoing` and
    /// `ChangedState` events (published before this call returns) are not
    /// lost to a subscriber that only attaches afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new_outgoing(
        dialog: Box<dyn Invitation>,
        caller_user: impl Into<String>,
        caller_host: impl Into<String>,
        transports: Vec<(String, Arc<dyn RtpTransport>)>,
        build_audio: impl FnOnce(Vec<Arc<dyn RtpTransport>>) -> Arc<dyn AudioTransport> + Send + 'static,
        ringback_for_path: impl FnOnce(&str) -> Arc<dyn RingtonePlayer>,
        rtp_config: RtpConfig,
        ringtone_config: RingtoneConfig,
        engine: Arc<dyn MediaEngine>,
    ) -> (Session, tokio::sync::broadcast::Receiver<Notification>) {
        let caller_user = caller_user.into();
        let caller_host = caller_host.into();
        let ringback = ringback_for_path(&ringtone_config.outbound_ringback);

        let mut inner = SessionInner::new(
            CallDirection::Outgoing,
            caller_user.clone(),
            caller_host.clone(),
        );
        inner.dialog = Some(dialog);
        inner.ringtone = Some(ringback);

        let core = Arc::new(Core {
            rtp_config,
            engine,
            notifications: NotificationCenter::new(),
            inner: Mutex::new(inner),
        });

        let rx = core.notifications.subscribe();

        core.notifications
            .publish(SessionEvent::NewOutgoing { audio: true });
        {
            let mut guard = core.inner.lock();
            guard.transition(&core, State::Calling);
            if let Some(ringtone) = guard.ringtone.as_ref() {
                ringtone.start();
            }
        }

        let session = Session(core);
        let success = session.0.clone();
        let failure = session.0.clone();
        MediaTransportInitializer::start(
            transports,
            move |handles| {
                Session::from_core(success).on_outgoing_initializer_success(
                    handles,
                    build_audio,
                    caller_user,
                )
            },
            move |reason| Session::from_core(failure).on_outgoing_initializer_failure(reason),
        );

        (session, rx)
    }

    fn on_outgoing_initializer_success(
        &self,
        handles: Vec<Arc<dyn RtpTransport>>,
        build_audio: impl FnOnce(Vec<Arc<dyn RtpTransport>>) -> Arc<dyn AudioTransport>,
        caller_user: String,
    ) {
        let core = self.0.clone();
        let audio = build_audio(handles);
        let local_media = audio.get_local_media(true, Direction::SendRecv);
        let offer = build_offer(
            core.rtp_config.local_rtp_address,
            fresh_origin(&caller_user, core.rtp_config.local_rtp_address),
            local_media,
        );

        let mut inner = core.inner.lock();
        let audio_index = offer.audio_index();
        inner.audio_transport = Some(audio);
        inner.audio_sdp_index = audio_index;
        if let Some(dialog) = inner.dialog.as_ref() {
            dialog.set_offered_local_sdp(offer);
            if let Err(e) = dialog.send_invite() {
                let reason = format!("send_invite failed: {e}");
                warn!("{reason}");
                fail_and_end(&core, &mut inner, reason);
            }
        }
    }

    fn on_outgoing_initializer_failure(&self, reason: String) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        fail_and_end(&core, &mut inner, reason);
    }

    /// Construct the session for an already-accepted-as-having-audio
    /// incoming invitation (spec §4.2 `NULL --INCOMING w/ audio--> INCOMING`).
    ///
    /// The "no acceptable media → no session, dialog rejected 415" branch
    /// (spec §4.2) is the caller's responsibility — typically
    /// [`crate::manager::SessionManager`], which decides whether to call
    /// this at all before a `Session` exists to mutate.
    /// `ringtone_for_path` builds the actual player for whichever file
    /// [`RingtoneConfig::inbound_for`] resolves for this caller — the
    /// per-(user, host) lookup (spec §3 "set on ... INCOMING (inbound from
    /// per-peer mapping)") is this crate's own responsibility; only turning
    /// a file path into a running player is the embedder's.
    #[allow(clippy::too_many_arguments)]
    pub fn new_incoming(
        dialog: Box<dyn Invitation>,
        caller_user: impl Into<String>,
        caller_host: impl Into<String>,
        remote_user_agent: Option<String>,
        ringtone_for_path: impl FnOnce(&str) -> Arc<dyn RingtonePlayer>,
        rtp_config: RtpConfig,
        ringtone_config: RingtoneConfig,
        engine: Arc<dyn MediaEngine>,
    ) -> (Session, tokio::sync::broadcast::Receiver<Notification>) {
        let caller_user = caller_user.into();
        let caller_host = caller_host.into();
        let ringtone = ringtone_for_path(ringtone_config.inbound_for(&caller_user, &caller_host));

        let mut inner = SessionInner::new(CallDirection::Incoming, caller_user, caller_host);
        inner.dialog = Some(dialog);
        inner.ringtone = Some(ringtone);
        inner.remote_user_agent = remote_user_agent;

        let core = Arc::new(Core {
            rtp_config,
            engine,
            notifications: NotificationCenter::new(),
            inner: Mutex::new(inner),
        });

        let rx = core.notifications.subscribe();

        {
            let mut guard = core.inner.lock();
            if let Some(dialog) = guard.dialog.as_ref() {
                if let Err(e) = dialog.respond_to_invite_provisionally(180) {
                    warn!("provisional response failed: {e}");
                }
            }
            guard.transition(&core, State::Incoming);
            if let Some(ringtone) = guard.ringtone.as_ref() {
                ringtone.start();
            }
        }
        core.notifications
            .publish(SessionEvent::NewIncoming { has_audio: true });

        (Session(core), rx)
    }

    /// Accept an incoming call (spec §4.2 `INCOMING --accept(audio=true)--> ACCEPTING`).
    pub fn accept(
        &self,
        transports: Vec<(String, Arc<dyn RtpTransport>)>,
        build_audio: impl FnOnce(Vec<Arc<dyn RtpTransport>>) -> Arc<dyn AudioTransport> + Send + 'static,
    ) -> Result<(), AcceptError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if inner.state != State::Incoming {
            return Err(AcceptError::WrongState(inner.state));
        }
        let offered = inner
            .dialog
            .as_ref()
            .and_then(|d| d.get_offered_remote_sdp())
            .ok_or(AcceptError::InvalidMedia)?;
        let audio_index = offered.audio_index().ok_or(AcceptError::InvalidMedia)?;
        let caller_user = inner.caller_user.clone();

        inner.transition(&core, State::Accepting);
        drop(inner);

        let success = self.0.clone();
        let failure = self.0.clone();
        MediaTransportInitializer::start(
            transports,
            move |handles| {
                Session::from_core(success).on_accept_initializer_success(
                    handles,
                    build_audio,
                    offered,
                    audio_index,
                    caller_user,
                )
            },
            move |reason| Session::from_core(failure).on_accept_initializer_failure(reason),
        );

        Ok(())
    }

    fn on_accept_initializer_success(
        &self,
        handles: Vec<Arc<dyn RtpTransport>>,
        build_audio: impl FnOnce(Vec<Arc<dyn RtpTransport>>) -> Arc<dyn AudioTransport>,
        offered: SdpSession,
        audio_index: usize,
        caller_user: String,
    ) {
        let core = self.0.clone();
        let audio = build_audio(handles);
        let local_media = audio.get_local_media(false, Direction::SendRecv);
        let remote_line = offered.media.get(audio_index).cloned();
        let answer = build_answer(
            fresh_origin(&caller_user, core.rtp_config.local_rtp_address),
            &offered,
            Some(audio_index),
            Some(local_media.clone()),
        );

        let mut inner = core.inner.lock();
        inner.audio_transport = Some(audio.clone());
        inner.audio_sdp_index = Some(audio_index);
        if let Some(dialog) = inner.dialog.as_ref() {
            dialog.set_offered_local_sdp(answer);
            if let Some(remote_line) = &remote_line {
                match audio.start(&local_media, remote_line) {
                    Ok(()) => core.engine.connect_audio_transport(audio.as_ref()),
                    Err(e) => warn!("audio transport start failed: {e}"),
                }
            }
            if let Err(e) = dialog.accept_invite() {
                let reason = format!("accept_invite failed: {e}");
                warn!("{reason}");
                if let Err(e) = dialog.disconnect(Some(500)) {
                    warn!("disconnect after failed accept failed: {e}");
                }
                fail_and_end(&core, &mut inner, reason);
                return;
            }
        }
        let generation = watchdog::rearm(&mut inner);
        drop(inner);
        watchdog::spawn(core, generation);
    }

    fn on_accept_initializer_failure(&self, reason: String) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if let Some(dialog) = inner.dialog.as_ref() {
            if let Err(e) = dialog.disconnect(Some(500)) {
                warn!("disconnect after failed accept failed: {e}");
            }
        }
        fail_and_end(&core, &mut inner, reason);
    }

    /// Reject an incoming call before accepting it, or hang up otherwise —
    /// an alias for [`Session::terminate`] (spec §4.2 "INCOMING | reject() /
    /// terminate() | TERMINATING").
    pub fn reject(&self) {
        self.terminate();
    }

    /// `terminate()` (spec §4.2 "Termination flow"). Idempotent once the
    /// session is NULL, TERMINATING or TERMINATED.
    pub fn terminate(&self) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if matches!(
            inner.state,
            State::Null | State::Terminating | State::Terminated
        ) {
            return;
        }
        if let Some(dialog) = inner.dialog.as_ref() {
            if dialog.state() != DialogState::Disconnecting {
                if let Err(e) = dialog.disconnect(None) {
                    warn!("disconnect failed: {e}");
                }
            }
        }
        inner.transition(&core, State::Terminating);
        core.notifications.publish(SessionEvent::WillEnd);
    }

    pub fn hold(&self) -> Result<(), HoldError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        actions::enqueue(&mut inner, &core, Action::Hold)
    }

    pub fn unhold(&self) -> Result<(), HoldError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        actions::enqueue(&mut inner, &core, Action::Unhold)
    }

    pub fn start_recording_audio(
        &self,
        recorder: Arc<dyn RecordingPlayer>,
        file_name: Option<String>,
    ) -> Result<String, StartRecordingError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        recording::start(&mut inner, &core, recorder, file_name)
    }

    pub fn stop_recording_audio(&self) -> Result<(), StopRecordingError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        recording::stop(&mut inner, &core)
    }

    pub fn send_dtmf(&self, digit: char) -> Result<(), SendDtmfError> {
        let core = self.0.clone();
        let inner = core.inner.lock();
        if inner.state != State::Established {
            return Err(SendDtmfError::WrongState(inner.state));
        }
        let transport = inner
            .audio_transport
            .clone()
            .ok_or(SendDtmfError::NoActiveAudio)?;
        drop(inner);
        transport
            .send_dtmf(digit)
            .map_err(|e| SendDtmfError::TransportFailure(e.to_string()))
    }

    /// `reject_proposal()` (spec §4.2 `PROPOSED --reject_proposal()--> ESTABLISHED`).
    pub fn reject_proposal(&self) -> Result<(), ProposalError> {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if inner.state != State::Proposed {
            return Err(ProposalError::WrongState(inner.state));
        }
        if let Some(dialog) = inner.dialog.as_ref() {
            if let Err(e) = dialog.respond_to_reinvite(488) {
                warn!("respond_to_reinvite(488) failed: {e}");
            }
        }
        inner.transition(&core, State::Established);
        core.notifications
            .publish(SessionEvent::RejectedStreamProposal {
                originator: Originator::Local,
            });
        Ok(())
    }

    /// `accept_proposal()` — reserved (spec §9: "`add_audio`, `accept_proposal`
    /// are stubs; treat as reserved, not implemented"). Always fails without
    /// touching the dialog or session state: responding 200 OK for a stream
    /// that never actually gets wired up would misrepresent the protocol
    /// outcome to the peer, so this stays a true no-op rather than a partial
    /// implementation. Callers needing the proposal handled at all must use
    /// [`Session::reject_proposal`].
    pub fn accept_proposal(&self) -> Result<(), ProposalError> {
        Err(ProposalError::NotImplemented)
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Notification> {
        self.0.notifications.subscribe()
    }

    pub fn state(&self) -> State {
        self.0.inner.lock().state
    }

    pub fn on_hold(&self) -> bool {
        self.0.inner.lock().on_hold()
    }

    pub fn remote_user_agent(&self) -> Option<String> {
        self.0.inner.lock().remote_user_agent.clone()
    }

    pub fn start_time(&self) -> Option<SystemTime> {
        self.0.inner.lock().start_time
    }

    pub fn stop_time(&self) -> Option<SystemTime> {
        self.0.inner.lock().stop_time
    }

    pub fn audio_active(&self) -> bool {
        self.0
            .inner
            .lock()
            .audio_transport
            .as_ref()
            .is_some_and(|t| t.is_active())
    }

    /// Entry point for dialog-engine events (spec §5: "event handlers...
    /// acquire this lock for the duration of their work").
    pub fn handle_dialog_event(&self, event: DialogEvent) {
        match event {
            DialogEvent::ChangedState { prev, state, data } => {
                self.on_dialog_state_changed(prev, state, data)
            }
            DialogEvent::SdpUpdate { remote } => self.detect_remote_hold_change(remote),
            DialogEvent::Dtmf { digit } => {
                self.0
                    .notifications
                    .publish(SessionEvent::GotDTMF { digit });
            }
        }
    }

    /// Apply a re-INVITE acceptance decision computed by
    /// [`crate::manager::evaluate_reinvite`] (spec §4.2 "Re-INVITE acceptance
    /// policy (manager, REINVITED event)" — the manager owns the policy
    /// decision, the session executes it against its own dialog handle
    /// under its own lock).
    pub fn handle_reinvite(&self, decision: ReinviteDecision, proposed_remote: SdpSession) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if inner.dialog.is_none() {
            return;
        }

        match decision {
            ReinviteDecision::EchoActiveAndRespond200 => {
                if let Some(dialog) = inner.dialog.as_ref() {
                    if let Some(local) = dialog.get_active_local_sdp() {
                        dialog.set_offered_local_sdp(local);
                    }
                    let _ = dialog.respond_to_reinvite(200);
                }
            }
            ReinviteDecision::Reject488 => {
                if let Some(dialog) = inner.dialog.as_ref() {
                    let _ = dialog.respond_to_reinvite(488);
                }
            }
            ReinviteDecision::StreamProposed { has_audio } => {
                if let Some(dialog) = inner.dialog.as_ref() {
                    let _ = dialog.respond_to_invite_provisionally(180);
                }
                inner.transition(&core, State::Proposed);
                core.notifications
                    .publish(SessionEvent::GotStreamProposal { has_audio });
            }
            ReinviteDecision::BuildAnswerAndRespond200 => {
                if let Some(transport) = inner.audio_transport.clone() {
                    let direction = transport.direction();
                    let local_media = transport.get_local_media(false, direction);
                    let caller_user = inner.caller_user.clone();
                    let local_address = core.rtp_config.local_rtp_address;
                    if let Some(dialog) = inner.dialog.as_ref() {
                        let answer = build_answer(
                            fresh_origin(&caller_user, local_address),
                            &proposed_remote,
                            proposed_remote.audio_index(),
                            Some(local_media),
                        );
                        dialog.set_offered_local_sdp(answer);
                        let _ = dialog.respond_to_reinvite(200);
                    }
                }
            }
        }

        self.detect_remote_hold_change_locked(&mut inner, &core, &proposed_remote);
    }

    fn detect_remote_hold_change(&self, remote: SdpSession) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        self.detect_remote_hold_change_locked(&mut inner, &core, &remote);
    }

    /// Spec §4.2 "Remote-initiated hold".
    fn detect_remote_hold_change_locked(
        &self,
        inner: &mut SessionInner,
        core: &Core,
        remote: &SdpSession,
    ) {
        let Some(index) = remote.audio_index() else {
            return;
        };
        let Some(line) = remote.media.get(index) else {
            return;
        };
        let remote_not_sending = line.direction.is_not_sending();
        if remote_not_sending != inner.on_hold_by_remote {
            inner.on_hold_by_remote = remote_not_sending;
            let event = if remote_not_sending {
                SessionEvent::GotHoldRequest {
                    originator: Originator::Remote,
                }
            } else {
                SessionEvent::GotUnholdRequest {
                    originator: Originator::Remote,
                }
            };
            core.notifications.publish(event);
            recording::gate(inner);
        }
    }

    fn on_dialog_state_changed(
        &self,
        prev: DialogState,
        state: DialogState,
        data: DialogEventData,
    ) {
        match state {
            DialogState::Early => self.on_dialog_early(data),
            DialogState::Connecting => self.on_dialog_connecting(data),
            DialogState::Confirmed => self.on_dialog_confirmed(),
            DialogState::Disconnected => self.on_dialog_disconnected(data, prev),
            _ => {}
        }
    }

    fn on_dialog_early(&self, data: DialogEventData) {
        let core = self.0.clone();
        let inner = core.inner.lock();
        if inner.state == State::Calling && data.code == Some(180) {
            if let Some(ringtone) = inner.ringtone.as_ref() {
                ringtone.start();
            }
            core.notifications.publish(SessionEvent::GotRingIndication);
        }
    }

    fn on_dialog_connecting(&self, data: DialogEventData) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if inner.state != State::Calling {
            return;
        }
        inner.start_time = Some(SystemTime::now());
        if let Some(ua) =
            remote_user_agent_from(data.user_agent.as_deref(), data.server.as_deref(), true)
        {
            inner.remote_user_agent = Some(ua);
        }
        core.notifications.publish(SessionEvent::WillStart);
    }

    fn on_dialog_confirmed(&self) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        match inner.state {
            State::Calling => {
                let mut to_spawn = None;
                if let Some(dialog) = inner.dialog.as_ref() {
                    if let (Some(local), Some(remote)) = (
                        dialog.get_active_local_sdp(),
                        dialog.get_active_remote_sdp(),
                    ) {
                        if let Some(transport) = inner.audio_transport.clone() {
                            if !transport.is_active() {
                                if let (Some(li), Some(ri)) =
                                    (local.audio_index(), remote.audio_index())
                                {
                                    if let (Some(ll), Some(rl)) = (
                                        local.media.get(li).cloned(),
                                        remote.media.get(ri).cloned(),
                                    ) {
                                        match transport.start(&ll, &rl) {
                                            Ok(()) => {
                                                core.engine
                                                    .connect_audio_transport(transport.as_ref());
                                                to_spawn = Some(watchdog::rearm(&mut inner));
                                            }
                                            Err(e) => warn!("audio transport start failed: {e}"),
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                inner.transition(&core, State::Established);
                core.notifications.publish(SessionEvent::DidStart);
                drop(inner);
                if let Some(generation) = to_spawn {
                    watchdog::spawn(core, generation);
                }
            }
            State::Accepting => {
                inner.transition(&core, State::Established);
                core.notifications.publish(SessionEvent::DidStart);
            }
            State::Established => {
                actions::on_confirmed(&mut inner, &core);
            }
            _ => {}
        }
    }

    fn on_dialog_disconnected(&self, data: DialogEventData, dialog_prev_state: DialogState) {
        let core = self.0.clone();
        let mut inner = core.inner.lock();
        if inner.state == State::Terminated {
            return;
        }
        let prev_session_state = inner.state;
        let is_outgoing = inner.call_direction == CallDirection::Outgoing;
        if let Some(ua) = remote_user_agent_from(
            data.user_agent.as_deref(),
            data.server.as_deref(),
            is_outgoing,
        ) {
            inner.remote_user_agent = Some(ua);
        }

        inner.teardown_audio(&core);
        inner.dialog = None;
        inner.transition(&core, State::Terminated);
        inner.stop_time = Some(SystemTime::now());

        let suppress_fail =
            prev_session_state == State::Terminating && dialog_prev_state == DialogState::Confirmed;
        let originator = if dialog_prev_state == DialogState::Disconnecting {
            Originator::Local
        } else {
            Originator::Remote
        };

        if !suppress_fail {
            if let Some((code, reason)) = failure_reason(
                &data,
                dialog_prev_state,
                inner.sdpneg_failure_reason.as_deref(),
            ) {
                core.notifications.publish(SessionEvent::DidFail {
                    originator,
                    code,
                    reason,
                });
            }
        }
        core.notifications
            .publish(SessionEvent::DidEnd { originator });
    }
}

/// Local setup failure (spec §7 kind 2: "transport init failed, SDP
/// construction raised ... produces `DidFail` with local originator ...
/// transitions to TERMINATED"). Shared by every place a synchronous local
/// operation (transport init, `send_invite`, `accept_invite`) fails before
/// the dialog has reached CONFIRMED — mirrors the original's `_do_fail`
/// (`examples/original_source/sipsimple/session.py:193-200`).
fn fail_and_end(core: &Core, inner: &mut SessionInner, reason: String) {
    inner.dialog = None;
    inner.teardown_audio(core);
    inner.transition(core, State::Terminated);
    core.notifications.publish(SessionEvent::DidFail {
        originator: Originator::Local,
        code: None,
        reason,
    });
    core.notifications.publish(SessionEvent::DidEnd {
        originator: Originator::Local,
    });
}

/// A fresh `o=` line for a new offer or answer: identity fields the
/// re-INVITE acceptance policy (spec §4.2) compares across exchanges.
fn fresh_origin(user: &str, local_address: IpAddr) -> Origin {
    Origin {
        user: user.to_owned(),
        id: rand::random::<u64>(),
        version: 0,
        net_type: "IN".to_owned(),
        address_type: if local_address.is_ipv6() {
            "IP6".to_owned()
        } else {
            "IP4".to_owned()
        },
        address: local_address.to_string(),
    }
}

/// Failure-reason precedence (spec §4.2 "Failure reason precedence",
/// including the documented 408 assignment-not-comparison bug fix, spec §9).
fn failure_reason(
    data: &DialogEventData,
    dialog_prev_state: DialogState,
    sdpneg_failure_reason: Option<&str>,
) -> Option<(Option<u16>, String)> {
    if let Some(code) = data.code {
        let mut reason = if code == 408 && dialog_prev_state == DialogState::Connecting {
            "No ACK received".to_owned()
        } else {
            data.reason.clone().unwrap_or_default()
        };
        if let Some(warning) = &data.warning {
            reason = format!("{reason} ({warning})");
        }
        return Some((Some(code), reason));
    }
    if data.method.as_deref() == Some("CANCEL") {
        return Some((None, "Request cancelled".to_owned()));
    }
    sdpneg_failure_reason.map(|r| (None, r.to_owned()))
}
