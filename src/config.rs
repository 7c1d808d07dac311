//! Static configuration records consumed by [`crate::session::Session`] and
//! [`crate::manager::SessionManager`].
//!
//! These are plain data, supplied by the embedding application at startup —
//! this crate never reads a config file or environment variable itself.

use std::collections::HashMap;
use std::net::IpAddr;

/// RTP-layer options applied to every session's audio transport.
#[derive(Debug, Clone)]
pub struct RtpConfig {
    /// Local address new RTP transports bind to / advertise in SDP.
    pub local_rtp_address: IpAddr,
    pub use_srtp: bool,
    pub srtp_forced: bool,
    pub use_ice: bool,
    pub ice_stun_address: Option<IpAddr>,
    pub ice_stun_port: Option<u16>,
}

/// Peer identity used to key a per-contact ringtone override.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RingtonePeer {
    pub user: String,
    pub host: String,
}

/// Ringtone/ringback file paths.
#[derive(Debug, Clone)]
pub struct RingtoneConfig {
    /// Played to the callee on an incoming invitation, absent a peer-specific override.
    pub default_inbound: String,
    /// Played to the caller while an outbound invitation is ringing.
    pub outbound_ringback: String,
    /// Per-(user, host) override of the inbound ringtone.
    pub inbound_overrides: HashMap<RingtonePeer, String>,
}

impl RingtoneConfig {
    /// Ringtone path for an inbound call from `user@host`, falling back to the default.
    pub fn inbound_for(&self, user: &str, host: &str) -> &str {
        let key = RingtonePeer {
            user: user.to_owned(),
            host: host.to_owned(),
        };
        self.inbound_overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or(&self.default_inbound)
    }
}
