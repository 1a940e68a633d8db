//! Resource-validity state machine.
//!
//! ```text
//! Uninitialized --probe ok--> Valid --teardown--> Invalidating --drained/timeout--> Invalid
//! ```
//!
//! Operations that touch native display state call [`ResourceCoordinator::begin`]
//! on entry. `begin` bumps the in-flight counter *before* looking at the state,
//! so a teardown that has already published `Invalidating` either sees the
//! increment and waits for it, or the operation sees `Invalidating` and backs
//! out without reaching the native call.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lifecycle of the native display resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResourceState {
    Uninitialized = 0,
    Valid = 1,
    Invalidating = 2,
    Invalid = 3,
}

impl ResourceState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ResourceState::Uninitialized,
            1 => ResourceState::Valid,
            2 => ResourceState::Invalidating,
            _ => ResourceState::Invalid,
        }
    }
}

/// How a teardown finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Every in-flight operation completed before the deadline.
    Drained,
    /// The deadline passed with `remaining` operations still running.
    TimedOut { remaining: usize },
}

/// Process-wide gate in front of native display calls.
#[derive(Debug)]
pub struct ResourceCoordinator {
    state: AtomicU8,
    in_flight: AtomicUsize,
    teardown_timeout: Duration,
    poll_interval: Duration,
}

/// Marks one in-flight operation; decrements the counter when dropped.
#[must_use = "the operation is only counted while the guard is alive"]
#[derive(Debug)]
pub struct OperationGuard<'a> {
    coordinator: &'a ResourceCoordinator,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ResourceCoordinator {
    pub fn new(teardown_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            state: AtomicU8::new(ResourceState::Uninitialized as u8),
            in_flight: AtomicUsize::new(0),
            teardown_timeout,
            poll_interval,
        }
    }

    pub fn state(&self) -> ResourceState {
        ResourceState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_valid(&self) -> bool {
        self.state() == ResourceState::Valid
    }

    /// Number of operations currently holding a guard.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Record the result of the first display probe.
    ///
    /// Only moves `Uninitialized -> Valid`; a failed probe leaves the state
    /// untouched so a later probe may still succeed.
    pub fn initialize(&self, probe_ok: bool) -> ResourceState {
        if probe_ok {
            let transitioned = self
                .state
                .compare_exchange(
                    ResourceState::Uninitialized as u8,
                    ResourceState::Valid as u8,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_ok();
            if transitioned {
                info!("native display resources valid");
            }
        } else {
            warn!("display probe failed, resources stay uninitialized");
        }
        self.state()
    }

    /// Enter an operation. Fails with the observed state unless it is `Valid`.
    pub fn begin(&self) -> Result<OperationGuard<'_>, ResourceState> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = OperationGuard { coordinator: self };
        match self.state() {
            ResourceState::Valid => Ok(guard),
            other => {
                debug!(state = ?other, "operation refused");
                Err(other)
            }
        }
    }

    /// Stop admitting operations and wait for running ones to finish.
    ///
    /// Always ends in `Invalid`. Waits at most the configured timeout.
    pub fn teardown(&self) -> TeardownOutcome {
        let previous = self.state.swap(ResourceState::Invalidating as u8, Ordering::SeqCst);
        match ResourceState::from_u8(previous) {
            ResourceState::Uninitialized | ResourceState::Invalid => {
                self.state.store(ResourceState::Invalid as u8, Ordering::SeqCst);
                debug!(previous = ?ResourceState::from_u8(previous), "teardown with nothing to drain");
                return TeardownOutcome::Drained;
            }
            ResourceState::Valid | ResourceState::Invalidating => {}
        }

        info!(in_flight = self.in_flight(), "resource teardown started");
        let deadline = Instant::now() + self.teardown_timeout;
        let outcome = loop {
            let remaining = self.in_flight();
            if remaining == 0 {
                break TeardownOutcome::Drained;
            }
            if Instant::now() >= deadline {
                break TeardownOutcome::TimedOut { remaining };
            }
            std::thread::sleep(self.poll_interval);
        };

        self.state.store(ResourceState::Invalid as u8, Ordering::SeqCst);
        match outcome {
            TeardownOutcome::Drained => info!("resource teardown drained"),
            TeardownOutcome::TimedOut { remaining } => {
                warn!(remaining, "resource teardown timed out with operations in flight")
            }
        }
        outcome
    }
}

impl Default for ResourceCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Arc;
    use std::thread;

    fn valid(timeout_ms: u64) -> Arc<ResourceCoordinator> {
        let c = ResourceCoordinator::new(Duration::from_millis(timeout_ms), Duration::from_millis(1));
        c.initialize(true);
        Arc::new(c)
    }

    #[test]
    fn test_initialize_transitions() {
        let c = ResourceCoordinator::default();
        assert_eq!(c.state(), ResourceState::Uninitialized);
        assert_eq!(c.initialize(false), ResourceState::Uninitialized);
        assert_eq!(c.initialize(true), ResourceState::Valid);
        c.teardown();
        // A late probe never resurrects torn-down resources.
        assert_eq!(c.initialize(true), ResourceState::Invalid);
    }

    #[test]
    fn test_begin_refused_unless_valid() {
        let c = ResourceCoordinator::default();
        assert_eq!(c.begin().unwrap_err(), ResourceState::Uninitialized);
        assert_eq!(c.in_flight(), 0);

        c.initialize(true);
        {
            let _guard = c.begin().unwrap();
            assert_eq!(c.in_flight(), 1);
        }
        assert_eq!(c.in_flight(), 0);

        c.teardown();
        assert_eq!(c.begin().unwrap_err(), ResourceState::Invalid);
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn test_guard_released_on_early_return() {
        fn failing(c: &ResourceCoordinator) -> Result<(), &'static str> {
            let _guard = c.begin().map_err(|_| "refused")?;
            Err("native call failed")
        }
        let c = valid(100);
        assert!(failing(&c).is_err());
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn test_teardown_without_operations() {
        let c = valid(1000);
        assert_eq!(c.teardown(), TeardownOutcome::Drained);
        assert_eq!(c.state(), ResourceState::Invalid);
        assert_eq!(c.teardown(), TeardownOutcome::Drained);
    }

    #[test]
    fn test_teardown_from_uninitialized() {
        let c = ResourceCoordinator::default();
        assert_eq!(c.teardown(), TeardownOutcome::Drained);
        assert_eq!(c.state(), ResourceState::Invalid);
    }

    #[test]
    fn test_teardown_waits_for_in_flight_operations() {
        const N: usize = 3;
        let c = valid(5000);
        let (started_tx, started_rx) = bounded::<()>(N);
        let (release_tx, release_rx) = bounded::<()>(N);

        let workers: Vec<_> = (0..N)
            .map(|_| {
                let c = Arc::clone(&c);
                let started_tx = started_tx.clone();
                let release_rx = release_rx.clone();
                thread::spawn(move || {
                    let _guard = c.begin().unwrap();
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                })
            })
            .collect();
        for _ in 0..N {
            started_rx.recv().unwrap();
        }
        assert_eq!(c.in_flight(), N);

        let (done_tx, done_rx) = bounded(1);
        let teardown = {
            let c = Arc::clone(&c);
            thread::spawn(move || done_tx.send(c.teardown()).unwrap())
        };

        while c.state() != ResourceState::Invalidating {
            thread::yield_now();
        }
        // New operations are refused while draining.
        assert_eq!(c.begin().unwrap_err(), ResourceState::Invalidating);

        for released in 0..N {
            thread::sleep(Duration::from_millis(10));
            assert!(done_rx.try_recv().is_err(), "finished with {} still running", N - released);
            assert_ne!(c.state(), ResourceState::Invalid);
            release_tx.send(()).unwrap();
        }

        assert_eq!(done_rx.recv().unwrap(), TeardownOutcome::Drained);
        assert_eq!(c.state(), ResourceState::Invalid);
        teardown.join().unwrap();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn test_teardown_times_out() {
        let c = valid(20);
        let (started_tx, started_rx) = bounded::<()>(1);
        let (release_tx, release_rx) = bounded::<()>(1);
        let worker = {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                let _guard = c.begin().unwrap();
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        };
        started_rx.recv().unwrap();

        let start = Instant::now();
        assert_eq!(c.teardown(), TeardownOutcome::TimedOut { remaining: 1 });
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(c.state(), ResourceState::Invalid);

        release_tx.send(()).unwrap();
        worker.join().unwrap();
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn test_operations_racing_teardown_never_run_after_signal() {
        let c = valid(2000);
        let (tx, rx) = crossbeam_channel::unbounded::<bool>();
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                let tx = tx.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        if let Ok(_guard) = c.begin() {
                            // Inside the guard the state must still be live.
                            let state = c.state();
                            tx.send(state != ResourceState::Invalid).unwrap();
                        }
                    }
                })
            })
            .collect();
        drop(tx);

        c.teardown();
        for w in workers {
            w.join().unwrap();
        }
        assert!(rx.iter().all(|ok| ok));
        assert_eq!(c.in_flight(), 0);
    }
}
