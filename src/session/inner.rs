//! Mutable session state (spec §3 "Data model") and the single transition
//! helper every state change routes through.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use crate::dialog::Invitation;
use crate::media::AudioTransport;
use crate::notifications::SessionEvent;
use crate::players::{RecordingPlayer, RingtonePlayer};

use super::actions::Action;
use super::state::{CallDirection, State};
use super::Core;

pub(super) struct SessionInner {
    pub state: State,
    pub call_direction: CallDirection,
    pub on_hold_by_local: bool,
    pub on_hold_by_remote: bool,
    pub start_time: Option<SystemTime>,
    pub stop_time: Option<SystemTime>,
    pub remote_user_agent: Option<String>,
    pub dialog: Option<Box<dyn Invitation>>,
    pub audio_transport: Option<Arc<dyn AudioTransport>>,
    pub audio_sdp_index: Option<usize>,
    pub action_queue: VecDeque<Action>,
    pub action_in_flight: bool,
    pub ringtone: Option<Arc<dyn RingtonePlayer>>,
    pub audio_recorder: Option<Arc<dyn RecordingPlayer>>,
    pub recording_file_name: Option<String>,
    pub watchdog_generation: u64,
    pub sdpneg_failure_reason: Option<String>,
    pub caller_user: String,
    pub caller_host: String,
}

impl SessionInner {
    pub(super) fn new(
        call_direction: CallDirection,
        caller_user: String,
        caller_host: String,
    ) -> Self {
        SessionInner {
            state: State::Null,
            call_direction,
            on_hold_by_local: false,
            on_hold_by_remote: false,
            start_time: None,
            stop_time: None,
            remote_user_agent: None,
            dialog: None,
            audio_transport: None,
            audio_sdp_index: None,
            action_queue: VecDeque::new(),
            action_in_flight: false,
            ringtone: None,
            audio_recorder: None,
            recording_file_name: None,
            watchdog_generation: 0,
            sdpneg_failure_reason: None,
            caller_user,
            caller_host,
        }
    }

    /// `on_hold` (spec §3: "derived `on_hold = local ∨ remote`").
    pub(super) fn on_hold(&self) -> bool {
        self.on_hold_by_local || self.on_hold_by_remote
    }

    /// The single point every state change routes through (spec §8: "For
    /// every transition, exactly one `SessionChangedState` is emitted").
    /// A no-op if `new_state` matches the current state.
    pub(super) fn transition(&mut self, core: &Core, new_state: State) {
        if self.state == new_state {
            return;
        }
        let prev = self.state;
        self.leave_state(prev);
        self.state = new_state;
        core.notifications.publish(SessionEvent::ChangedState {
            prev,
            state: new_state,
        });
    }

    /// Stop the ringtone/ringback player on every exit from `Calling`
    /// `Incoming`, not only on the "expected" edges (SPEC_FULL §10 item 5).
    fn leave_state(&mut self, prev: State) {
        if matches!(prev, State::Calling | State::Incoming) {
            if let Some(ringtone) = self.ringtone.take() {
                ringtone.stop();
            }
        }
    }

    /// Tear down the audio side: cancel the watchdog, disconnect from the
    /// media engine, stop the transport, and force-stop any recorder (spec
    /// §3 invariants 3/4, §8 "after any terminal transition, `audio_transport
    /// is none` and `no_audio_timer is none` and `audio_recorder is none`").
    pub(super) fn teardown_audio(&mut self, core: &Core) {
        super::watchdog::cancel(self);
        super::recording::force_stop(self, core);
        if let Some(transport) = self.audio_transport.take() {
            core.engine.disconnect_audio_transport(transport.as_ref());
            transport.stop();
        }
        self.audio_sdp_index = None;
    }
}

/// `remote_user_agent` capture precedence (SPEC_FULL §10 item 2): incoming
/// calls read `User-Agent`; outgoing calls read `Server`, falling back to
/// `User-Agent`.
pub(super) fn remote_user_agent_from(
    user_agent: Option<&str>,
    server: Option<&str>,
    is_outgoing: bool,
) -> Option<String> {
    if is_outgoing {
        server.or(user_agent).map(str::to_owned)
    } else {
        user_agent.map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_user_agent_precedence() {
        assert_eq!(
            remote_user_agent_from(Some("ua"), Some("srv"), true),
            Some("srv".to_owned())
        );
        assert_eq!(
            remote_user_agent_from(Some("ua"), None, true),
            Some("ua".to_owned())
        );
        assert_eq!(
            remote_user_agent_from(Some("ua"), Some("srv"), false),
            Some("ua".to_owned())
        );
        assert_eq!(remote_user_agent_from(None, None, false), None);
    }
}
