//! Shutdown coordination.
//!
//! Each run owns a fresh [`CancellationToken`]. [`ShutdownHandle`] reaches the
//! token of whichever run is active, so it can be cloned freely and called
//! from anywhere in the process.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio_util::sync::CancellationToken;

/// Why a run left the running state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// [`ShutdownHandle::trigger`] was called.
    Requested,
    /// An OS termination signal arrived.
    Signal(&'static str),
}

impl ShutdownReason {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ShutdownReason::Requested => "requested",
            ShutdownReason::Signal(_) => "signal",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Requested => write!(f, "shutdown requested"),
            ShutdownReason::Signal(name) => write!(f, "signal {}", name),
        }
    }
}

/// Trigger state of one run.
struct RunTrigger {
    token: CancellationToken,
    fired: AtomicBool,
}

/// Slot holding the trigger of the active run, if any.
#[derive(Default)]
pub(crate) struct ShutdownSlot {
    run: ArcSwapOption<RunTrigger>,
}

impl ShutdownSlot {
    /// Install a new token for a starting run.
    pub(crate) fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        self.run.store(Some(Arc::new(RunTrigger {
            token: token.clone(),
            fired: AtomicBool::new(false),
        })));
        token
    }

    /// Forget the current token once the run is over.
    pub(crate) fn disarm(&self) {
        self.run.store(None);
    }

    fn trigger(&self) -> bool {
        let Some(run) = self.run.load_full() else {
            return false;
        };
        if run
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        run.token.cancel();
        true
    }

    fn is_armed(&self) -> bool {
        self.run.load().is_some()
    }
}

/// Cloneable handle used to stop the active run.
#[derive(Clone)]
pub struct ShutdownHandle {
    slot: Arc<ShutdownSlot>,
}

impl ShutdownHandle {
    pub(crate) fn new(slot: Arc<ShutdownSlot>) -> Self {
        Self { slot }
    }

    /// Ask the active run to shut down.
    ///
    /// Idempotent, and a no-op when no run is active. Of any number of
    /// concurrent calls against one run, exactly one returns `true`. Does not
    /// wait for teardown.
    pub fn trigger(&self) -> bool {
        let fired = self.slot.trigger();
        if fired {
            tracing::info!("The app will shutdown in a few seconds");
        } else {
            tracing::debug!("Shutdown trigger ignored, no pending run");
        }
        fired
    }

    /// Whether a run is active and could be triggered.
    pub fn is_armed(&self) -> bool {
        self.slot.is_armed()
    }
}

impl fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownHandle")
            .field("armed", &self.is_armed())
            .finish()
    }
}
