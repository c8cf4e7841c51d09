//! Single-run entry guard.
//!
//! # States
//! ```text
//! 0 (idle) ── try_acquire() → 1 ──► running
//! running  ── release()          ──► 0 (idle)
//! ```
//!
//! Losing callers still bump the counter; only the caller that observes
//! exactly 1 owns the run. `release` stores 0 unconditionally, which also
//! discards the increments of losers.

use std::sync::atomic::{AtomicU32, Ordering};

/// Non-blocking mutual exclusion over a single atomic counter.
#[derive(Debug, Default)]
pub struct RunGuard {
    count: AtomicU32,
}

impl RunGuard {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Try to become the active run. Never blocks.
    pub fn try_acquire(&self) -> bool {
        self.count.fetch_add(1, Ordering::AcqRel) + 1 == 1
    }

    /// Return to idle so that a later `try_acquire` can succeed.
    pub fn release(&self) {
        self.count.store(0, Ordering::Release);
    }

    /// Whether a run currently holds the guard.
    pub fn is_held(&self) -> bool {
        self.count.load(Ordering::Acquire) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn acquire_release_cycle() {
        let guard = RunGuard::new();
        assert!(!guard.is_held());
        assert!(guard.try_acquire());
        assert!(guard.is_held());
        assert!(!guard.try_acquire());
        assert!(!guard.try_acquire());

        guard.release();
        assert!(!guard.is_held());
        assert!(guard.try_acquire());
    }

    #[test]
    fn exactly_one_concurrent_winner() {
        let guard = Arc::new(RunGuard::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if guard.try_acquire() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
