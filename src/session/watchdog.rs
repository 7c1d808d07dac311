//! No-media watchdog (spec §4.2 "No-media watchdog", §5 cancellation).
//!
//! Grounded on `invite/timer.rs`'s `SessionTimer` (teacher pack): a
//! generation counter makes cancellation and re-arming idempotent without
//! needing a cancellation handle — a stale timer simply observes a
//! generation mismatch and does nothing.

use std::sync::Arc;
use std::time::Duration;

use crate::notifications::SessionEvent;

use super::inner::SessionInner;
use super::Core;

const NO_MEDIA_TIMEOUT: Duration = Duration::from_secs(5);

/// Bump the watchdog generation, invalidating any timer already in flight.
/// Call with the session lock held; returns the new generation to hand to
/// [`spawn`] once the lock has been released.
pub(super) fn rearm(inner: &mut SessionInner) -> u64 {
    inner.watchdog_generation += 1;
    inner.watchdog_generation
}

/// Cancel any in-flight watchdog (spec §4.2: "cancelled on audio stop").
/// Equivalent to rearming without starting a new timer.
pub(super) fn cancel(inner: &mut SessionInner) {
    inner.watchdog_generation += 1;
}

/// Spawn the background timer task for `generation`. Must be called after
/// releasing the session lock — the task re-acquires it itself on expiry.
pub(super) fn spawn(core: Arc<Core>, generation: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(NO_MEDIA_TIMEOUT).await;

        let inner = core.inner.lock();
        if inner.watchdog_generation != generation {
            return;
        }
        let received = inner
            .audio_transport
            .as_ref()
            .is_some_and(|t| t.remote_rtp_address_received());
        if !received {
            core.notifications.publish(SessionEvent::GotNoAudio);
        }
    });
}
