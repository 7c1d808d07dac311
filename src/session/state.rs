//! State enums for the session state machine (spec §3, §4.2).

/// The session's externally observable state. `Null` only exists
/// transiently during construction (spec §3 invariant 1); every
/// [`crate::session::Session`] handed back to a caller has already left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Null,
    Calling,
    Incoming,
    Accepting,
    Established,
    Proposed,
    Terminating,
    Terminated,
}

/// `direction` in spec §3's data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

impl CallDirection {
    /// Used by the default recording file-name policy (spec §4.3).
    pub fn as_str(self) -> &'static str {
        match self {
            CallDirection::Incoming => "incoming",
            CallDirection::Outgoing => "outgoing",
        }
    }
}
