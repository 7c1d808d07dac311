//! SDP construction helpers (spec §4.4).
//!
//! This is deliberately *not* a full SDP implementation — wire encoding and
//! parsing are non-goals (spec §1, §11). The types here model exactly the
//! fields the session state machine and the re-INVITE acceptance policy
//! need to read, compare and mutate. Field names and shapes are grounded on
//! `sdp-types::{Origin, MediaDescription}` (teacher pack, `media/sdp-types`)
//! with everything the negotiation logic never touches (ICE, crypto,
//! extmap, ...) left out.

use std::net::IpAddr;

/// `a=sendrecv` / `a=sendonly` / `a=recvonly` / `a=inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    SendRecv,
    SendOnly,
    RecvOnly,
    Inactive,
}

impl Direction {
    /// Direction to offer given whether we can still send and whether the
    /// stream should be on hold (spec §4.2 "Hold/unhold action queue" step 3).
    pub fn for_hold_state(can_send: bool, on_hold: bool) -> Self {
        match (can_send, on_hold) {
            (true, false) => Direction::SendRecv,
            (true, true) => Direction::SendOnly,
            (false, false) => Direction::RecvOnly,
            (false, true) => Direction::Inactive,
        }
    }

    /// `true` for `sendonly`/`inactive` — the states that mean "the sender is holding".
    pub fn is_not_sending(self) -> bool {
        matches!(self, Direction::SendOnly | Direction::Inactive)
    }
}

/// `o=` line identity, compared field-by-field by the re-INVITE acceptance
/// policy (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub user: String,
    pub id: u64,
    pub version: u64,
    pub net_type: String,
    pub address_type: String,
    pub address: String,
}

impl Origin {
    /// Fields other than `version` — what the re-INVITE policy calls "o= line fields".
    pub fn identity_matches(&self, other: &Origin) -> bool {
        self.user == other.user
            && self.id == other.id
            && self.net_type == other.net_type
            && self.address_type == other.address_type
            && self.address == other.address
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Message,
}

/// One `m=` section, with the attributes the negotiation logic reads or
/// writes (`transport`, `formats`, `direction`, `port`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescription {
    pub media_type: MediaType,
    pub port: u16,
    pub transport: String,
    pub formats: Vec<String>,
    pub direction: Direction,
    /// Opaque attribute lines preserved verbatim when mirroring a rejected stream.
    pub attributes: Vec<String>,
}

impl MediaDescription {
    /// Port-0 mirror of this media line: same type/transport/formats/attributes,
    /// port zeroed out (spec §4.4 "every other index is a rejected mirror").
    pub fn rejected_mirror(&self) -> MediaDescription {
        MediaDescription {
            media_type: self.media_type,
            port: 0,
            transport: self.transport.clone(),
            formats: self.formats.clone(),
            direction: Direction::Inactive,
            attributes: self.attributes.clone(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.port == 0
    }
}

/// A full session description: origin + connection address + media lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpSession {
    pub origin: Origin,
    pub connection_address: IpAddr,
    pub start_time: u64,
    pub stop_time: u64,
    pub media: Vec<MediaDescription>,
}

impl SdpSession {
    /// Bump `o=` version by one (spec §4.2 step 3: "Increment SDP version").
    pub fn bump_version(&mut self) {
        self.origin.version += 1;
    }

    pub fn audio_index(&self) -> Option<usize> {
        self.media
            .iter()
            .position(|m| m.media_type == MediaType::Audio && !m.is_rejected())
    }
}

/// Build a fresh offer SDP for a new outbound call or a hold/unhold re-INVITE
/// (spec §4.4 "Offer").
pub fn build_offer(local_address: IpAddr, origin: Origin, audio: MediaDescription) -> SdpSession {
    SdpSession {
        origin,
        connection_address: local_address,
        start_time: 0,
        stop_time: 0,
        media: vec![audio],
    }
}

/// Build an answer SDP mirroring the remote offer's session timestamps and
/// media-line count (spec §4.4 "Answer").
///
/// `audio_index` identifies which line in `remote_offer.media` is the
/// accepted audio line; `local_audio` is what we populate it with. Every
/// other line is rejected via [`MediaDescription::rejected_mirror`].
pub fn build_answer(
    local_origin: Origin,
    remote_offer: &SdpSession,
    audio_index: Option<usize>,
    local_audio: Option<MediaDescription>,
) -> SdpSession {
    let media = remote_offer
        .media
        .iter()
        .enumerate()
        .map(|(index, remote_line)| {
            if Some(index) == audio_index {
                local_audio
                    .clone()
                    .unwrap_or_else(|| remote_line.rejected_mirror())
            } else {
                remote_line.rejected_mirror()
            }
        })
        .collect();

    SdpSession {
        origin: local_origin,
        connection_address: remote_offer.connection_address,
        start_time: remote_offer.start_time,
        stop_time: remote_offer.stop_time,
        media,
    }
}

/// Newly-proposed media: present in `proposed` with a non-zero port but
/// absent (or rejected) in `current` at the same index (spec §4.2 re-INVITE
/// acceptance policy, "detect newly proposed media").
pub fn newly_proposed_media<'a>(
    current: &SdpSession,
    proposed: &'a SdpSession,
) -> Vec<&'a MediaDescription> {
    proposed
        .media
        .iter()
        .enumerate()
        .filter(|(index, line)| {
            !line.is_rejected()
                && current
                    .media
                    .get(*index)
                    .is_none_or(MediaDescription::is_rejected)
        })
        .map(|(_, line)| line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(version: u64) -> Origin {
        Origin {
            user: "alice".into(),
            id: 1,
            version,
            net_type: "IN".into(),
            address_type: "IP4".into(),
            address: "127.0.0.1".into(),
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

    #[test]
    fn answer_mirrors_offer_length_and_rejects_unmatched_lines() {
        let offer = SdpSession {
            origin: origin(0),
            connection_address: "10.0.0.1".parse().unwrap(),
            start_time: 0,
            stop_time: 0,
            media: vec![audio_line(4000), audio_line(4002)],
        };

        let answer = build_answer(origin(0), &offer, Some(0), Some(audio_line(5000)));

        assert_eq!(answer.media.len(), offer.media.len());
        assert_eq!(answer.media[0].port, 5000);
        assert!(answer.media[1].is_rejected());
        assert_eq!(answer.media[1].formats, offer.media[1].formats);
    }

    #[test]
    fn newly_proposed_detects_added_line() {
        let current = SdpSession {
            origin: origin(0),
            connection_address: "10.0.0.1".parse().unwrap(),
            start_time: 0,
            stop_time: 0,
            media: vec![audio_line(4000)],
        };
        let mut proposed = current.clone();
        proposed.media.push(audio_line(4010));

        let added = newly_proposed_media(&current, &proposed);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].port, 4010);
    }

    #[test]
    fn direction_for_hold_state() {
        assert_eq!(Direction::for_hold_state(true, false), Direction::SendRecv);
        assert_eq!(Direction::for_hold_state(true, true), Direction::SendOnly);
        assert_eq!(Direction::for_hold_state(false, false), Direction::RecvOnly);
        assert_eq!(Direction::for_hold_state(false, true), Direction::Inactive);
    }
}
