//! Recording gate (spec §4.3).
//!
//! Physical file playback pauses/resumes with the `on_hold` flag but the
//! logical "is recording" bit (spec: "Recording is logically on once the
//! user calls `start_recording_audio`") only changes on explicit
//! start/stop or implicit stop at audio teardown.

use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::error::{StartRecordingError, StopRecordingError};
use crate::notifications::SessionEvent;
use crate::players::RecordingPlayer;

use super::inner::SessionInner;
use super::Core;

/// `YYYYMMDD-HHMMSS-<user>@<host>-<direction>.wav` (spec §4.3 default policy).
pub(super) fn default_file_name(
    now: SystemTime,
    user: &str,
    host: &str,
    direction: &str,
) -> String {
    let stamp: DateTime<Utc> = now.into();
    format!(
        "{}-{user}@{host}-{direction}.wav",
        stamp.format("%Y%m%d-%H%M%S")
    )
}

pub(super) fn start(
    inner: &mut SessionInner,
    core: &Core,
    recorder: Arc<dyn RecordingPlayer>,
    file_name: Option<String>,
) -> Result<String, StartRecordingError> {
    if inner.audio_transport.is_none() {
        return Err(StartRecordingError::NoActiveAudio);
    }
    if inner.audio_recorder.is_some() {
        return Err(StartRecordingError::AlreadyRecording);
    }

    let file_name = file_name.unwrap_or_else(|| {
        default_file_name(
            SystemTime::now(),
            &inner.caller_user,
            &inner.caller_host,
            inner.call_direction.as_str(),
        )
    });

    recorder.start(&file_name);
    if inner.on_hold() {
        recorder.pause();
    }
    inner.audio_recorder = Some(recorder);
    inner.recording_file_name = Some(file_name.clone());
    core.notifications
        .publish(SessionEvent::StartedRecordingAudio {
            file_name: file_name.clone(),
        });
    Ok(file_name)
}

pub(super) fn stop(inner: &mut SessionInner, core: &Core) -> Result<(), StopRecordingError> {
    if inner.audio_recorder.is_none() {
        return Err(StopRecordingError::NotRecording);
    }
    force_stop(inner, core);
    Ok(())
}

/// Unconditional stop used by audio teardown (spec §4.3: stopped "when
/// audio is torn down"); a no-op if nothing is recording.
pub(super) fn force_stop(inner: &mut SessionInner, core: &Core) {
    let Some(recorder) = inner.audio_recorder.take() else {
        return;
    };
    let file_name = inner.recording_file_name.take().unwrap_or_default();
    recorder.stop();
    core.notifications
        .publish(SessionEvent::StoppedRecordingAudio { file_name });
}

/// Re-apply pause/resume against the current hold flags (spec §4.2 step 6,
/// SPEC_FULL §10 item 4: re-evaluated even when the hold command itself was
/// a no-op with respect to SDP).
pub(super) fn gate(inner: &SessionInner) {
    if let Some(recorder) = &inner.audio_recorder {
        if inner.on_hold() {
            recorder.pause();
        } else {
            recorder.resume();
        }
    }
}
