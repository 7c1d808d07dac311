//! Ringtone and recording-file players (spec §1: "out of scope / external
//! collaborators"). Interface-only, same treatment as [`crate::dialog`] and
//! [`crate::media::transport`] — an embedding application supplies the real
//! audio-file playback.

use std::fmt::Debug;

/// Plays a local ringtone (inbound) or ringback (outbound) file on a loop
/// until stopped. Owned by the session only while in `CALLING`/`INCOMING`
/// (spec §3 `ringtone` field lifecycle).
pub trait RingtonePlayer: Send + Sync + Debug {
    fn start(&self);
    fn stop(&self);
}

/// Writes an active audio transport's stream to a file. Pausing must not
/// lose buffered audio across a hold/unhold round-trip (spec §4.3: "physical
/// playback-to-file is paused... resumed").
pub trait RecordingPlayer: Send + Sync + Debug {
    fn start(&self, file_name: &str);
    fn pause(&self);
    fn resume(&self);
    fn stop(&self);
}
