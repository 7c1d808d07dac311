//! Media transport initializer (spec §4.1): a one-shot fan-in coordinator
//! that triggers N transport initializations and invokes exactly one of two
//! continuations when they complete (or the first one fails).
//!
//! Grounded on the `Arc<Inner>` + lock-guarded state pattern used by
//! `invite::acceptor::InviteAcceptor` (teacher pack) to register
//! exactly-once completion under a shared lock. Continuations are taken as
//! plain `FnOnce` closures rather than a `oneshot` future — this mirrors the
//! spec's literal wording ("given... two continuations `on_success(results)`
//! and `on_failure(reason)`") and lets the session's own lock be the thing
//! each continuation acquires, rather than threading results through an
//! intermediate await point.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::transport::{RtpTransport, TransportError};

type SuccessContinuation = Box<dyn FnOnce(Vec<Arc<dyn RtpTransport>>) + Send>;
type FailureContinuation = Box<dyn FnOnce(String) + Send>;

struct Gate {
    remaining: HashSet<usize>,
    on_success: Option<SuccessContinuation>,
    on_failure: Option<FailureContinuation>,
}

/// Fan-in coordinator. Stateless by design — [`Self::start`] owns the whole
/// lifecycle of one initialization run and returns nothing; the outcome
/// always arrives via one of the two continuations.
pub struct MediaTransportInitializer;

impl MediaTransportInitializer {
    /// Trigger `init()` on every transport and invoke `on_success` once all
    /// have completed, or `on_failure` as soon as the first one fails —
    /// never both, never more than once (spec §4.1 step 5: late events
    /// after completion are silently ignored).
    ///
    /// `transports` pairs each transport with a label used only to build
    /// the failure reason string ("which transport failed").
    ///
    /// MSRP/chat auxiliary-stream teardown on failure (spec §4.1 step 4) is
    /// a no-op here: non-audio media is scaffolded but never active (spec §1
    /// non-goals), so there is nothing to tear down.
    pub fn start(
        transports: Vec<(String, Arc<dyn RtpTransport>)>,
        on_success: impl FnOnce(Vec<Arc<dyn RtpTransport>>) + Send + 'static,
        on_failure: impl FnOnce(String) + Send + 'static,
    ) {
        if transports.is_empty() {
            on_success(Vec::new());
            return;
        }

        let handles: Vec<Arc<dyn RtpTransport>> =
            transports.iter().map(|(_, t)| t.clone()).collect();

        let gate = Arc::new(Mutex::new(Some(Gate {
            remaining: (0..transports.len()).collect(),
            on_success: Some(Box::new(on_success)),
            on_failure: Some(Box::new(on_failure)),
        })));

        for (index, (label, transport)) in transports.into_iter().enumerate() {
            let gate = gate.clone();
            let handles = handles.clone();

            let complete = move |result: Result<(), TransportError>| {
                let mut guard = gate.lock();
                let Some(state) = guard.as_mut() else {
                    // Late event after completion; ignored.
                    return;
                };

                match result {
                    Ok(()) => {
                        state.remaining.remove(&index);
                        if state.remaining.is_empty() {
                            let on_success = state.on_success.take().unwrap();
                            *guard = None;
                            drop(guard);
                            on_success(handles);
                        }
                    }
                    Err(e) => {
                        let on_failure = state.on_failure.take().unwrap();
                        *guard = None;
                        drop(guard);
                        on_failure(format!("{label}: {e}"));
                    }
                }
            };

            transport.init(Box::new(complete));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    #[derive(Debug)]
    struct FakeTransport {
        fail: bool,
        initialized: AtomicBool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("fake transport init failed")]
    struct FakeError;

    impl RtpTransport for FakeTransport {
        fn init(&self, on_complete: super::super::transport::InitCompletion) {
            if self.fail {
                on_complete(Err(Box::new(FakeError)));
            } else {
                self.initialized.store(true, Ordering::SeqCst);
                on_complete(Ok(()));
            }
        }
    }

    #[test]
    fn all_success_invokes_on_success_once_with_all_handles() {
        let transports: Vec<(String, Arc<dyn RtpTransport>)> = vec![
            (
                "a".into(),
                Arc::new(FakeTransport {
                    fail: false,
                    initialized: AtomicBool::new(false),
                }),
            ),
            (
                "b".into(),
                Arc::new(FakeTransport {
                    fail: false,
                    initialized: AtomicBool::new(false),
                }),
            ),
        ];

        let success_calls = Arc::new(AtomicUsize::new(0));
        let failure_calls = Arc::new(AtomicUsize::new(0));
        let collected = Arc::new(StdMutex::new(0));

        let sc = success_calls.clone();
        let co = collected.clone();
        let fc = failure_calls.clone();

        MediaTransportInitializer::start(
            transports,
            move |handles| {
                sc.fetch_add(1, Ordering::SeqCst);
                *co.lock().unwrap() = handles.len();
            },
            move |_| {
                fc.fetch_add(1, Ordering::SeqCst);
            },
        );

        assert_eq!(success_calls.load(Ordering::SeqCst), 1);
        assert_eq!(failure_calls.load(Ordering::SeqCst), 0);
        assert_eq!(*collected.lock().unwrap(), 2);
    }

    #[test]
    fn one_failure_invokes_on_failure_once_with_transport_label() {
        let transports: Vec<(String, Arc<dyn RtpTransport>)> = vec![
            (
                "good".into(),
                Arc::new(FakeTransport {
                    fail: false,
                    initialized: AtomicBool::new(false),
                }),
            ),
            (
                "bad".into(),
                Arc::new(FakeTransport {
                    fail: true,
                    initialized: AtomicBool::new(false),
                }),
            ),
        ];

        let failure_reason = Arc::new(StdMutex::new(String::new()));
        let success_calls = Arc::new(AtomicUsize::new(0));

        let fr = failure_reason.clone();
        let sc = success_calls.clone();

        MediaTransportInitializer::start(
            transports,
            move |_| {
                sc.fetch_add(1, Ordering::SeqCst);
            },
            move |reason| {
                *fr.lock().unwrap() = reason;
            },
        );

        assert_eq!(success_calls.load(Ordering::SeqCst), 0);
        assert!(failure_reason.lock().unwrap().contains("bad"));
    }

    #[test]
    fn empty_set_succeeds_immediately() {
        let success_calls = Arc::new(AtomicUsize::new(0));
        let sc = success_calls.clone();

        MediaTransportInitializer::start(
            Vec::new(),
            move |handles| {
                sc.fetch_add(1, Ordering::SeqCst);
                assert!(handles.is_empty());
            },
            |_| panic!("must not fail"),
        );

        assert_eq!(success_calls.load(Ordering::SeqCst), 1);
    }
}
