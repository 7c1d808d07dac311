//! Hold/unhold action queue (spec §4.2 "Hold/unhold action queue").
//!
//! At most one action is ever in flight; a second `hold()`/`unhold()` call
//! made while one is already running enqueues and is processed once the
//! dialog reports CONFIRMED again (spec §3 invariant 5, §8 "two consecutive
//! `hold()` calls collapse to one SDP re-invite").

use log::warn;

use crate::error::HoldError;
use crate::notifications::{Originator, SessionEvent};
use crate::sdp::Direction;

use super::inner::SessionInner;
use super::recording;
use super::state::State;
use super::Core;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Hold,
    Unhold,
}

pub(super) fn enqueue(
    inner: &mut SessionInner,
    core: &Core,
    action: Action,
) -> Result<(), HoldError> {
    if inner.state != State::Established {
        return Err(HoldError::WrongState(inner.state));
    }
    inner.action_queue.push_back(action);
    if !inner.action_in_flight {
        start_next(inner, core);
    }
    Ok(())
}

/// Called when the dialog reaches CONFIRMED again after a re-INVITE sent
/// from the queue (spec §4.2 step 7).
pub(super) fn on_confirmed(inner: &mut SessionInner, core: &Core) {
    inner.action_in_flight = false;
    start_next(inner, core);
}

fn start_next(inner: &mut SessionInner, core: &Core) {
    while !inner.action_in_flight {
        let Some(action) = inner.action_queue.pop_front() else {
            return;
        };
        let target_hold = action == Action::Hold;

        if inner.on_hold_by_local == target_hold {
            // Step 1: effect already current — skip to next, but recording
            // gating is still re-evaluated (SPEC_FULL §10 item 4).
            recording::gate(inner);
            continue;
        }

        run(inner, core, target_hold);
        inner.action_in_flight = true;
        return;
    }
}

fn run(inner: &mut SessionInner, core: &Core, target_hold: bool) {
    if let Some(transport) = inner.audio_transport.clone() {
        // "outgoing-capable" per spec §4.2 step 3: derived from the
        // transport's *current* direction, not assumed true.
        let can_send = !transport.direction().is_not_sending();
        let direction = Direction::for_hold_state(can_send, target_hold);

        if target_hold {
            core.engine.disconnect_audio_transport(transport.as_ref());
        } else {
            core.engine.connect_audio_transport(transport.as_ref());
        }
        transport.update_direction(direction);

        if let Some(dialog) = &inner.dialog {
            match dialog.get_active_local_sdp() {
                Some(mut next_sdp) => {
                    next_sdp.bump_version();
                    if let Some(index) = inner.audio_sdp_index {
                        if let Some(line) = next_sdp.media.get_mut(index) {
                            *line = transport.get_local_media(true, direction);
                        }
                    }
                    dialog.set_offered_local_sdp(next_sdp);
                    if let Err(e) = dialog.send_reinvite() {
                        warn!("send_reinvite failed while processing hold/unhold: {e}");
                    }
                }
                None => warn!("hold/unhold requested with no active local SDP; skipping re-invite"),
            }
        }
    }

    inner.on_hold_by_local = target_hold;
    let event = if target_hold {
        SessionEvent::GotHoldRequest {
            originator: Originator::Local,
        }
    } else {
        SessionEvent::GotUnholdRequest {
            originator: Originator::Local,
        }
    };
    core.notifications.publish(event);
    recording::gate(inner);
}
