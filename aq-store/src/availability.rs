//! Process-wide backend reachability.
//!
//! [`AvailabilityFlag`] is readable by anyone; only the
//! [`AvailabilityProbe`] writes it.

use crate::backend::Backend;
use crate::config::ProbeConfig;
use crate::observable::{Observable, Subscription};
use log::{debug, info, warn};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Availability {
    /// No check has completed yet.
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Availability::Unknown => "unknown",
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
pub struct AvailabilityFlag {
    cell: Observable<Availability>,
}

impl Default for AvailabilityFlag {
    fn default() -> Self {
        Self {
            cell: Observable::new(Availability::Unknown),
        }
    }
}

impl AvailabilityFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Availability {
        self.cell.get()
    }

    pub fn is_unavailable(&self) -> bool {
        self.get() == Availability::Unavailable
    }

    pub fn subscribe(&self, listener: impl Fn(&Availability) + 'static) -> Subscription {
        self.cell.subscribe(listener)
    }

    pub(crate) fn set(&self, availability: Availability) -> bool {
        let changed = self.cell.set(availability);
        if changed {
            info!("backend is now {}", availability);
        }
        changed
    }
}

/// Asks the probe to check again as soon as possible.
#[derive(Clone)]
pub struct ProbeHandle {
    wake: Rc<Notify>,
}

impl ProbeHandle {
    pub fn nudge(&self) {
        self.wake.notify_one();
    }
}

pub struct AvailabilityProbe<B> {
    backend: Rc<B>,
    flag: AvailabilityFlag,
    wake: Rc<Notify>,
    interval: Option<Duration>,
    timeout: Duration,
}

impl<B: Backend> AvailabilityProbe<B> {
    pub fn new(backend: Rc<B>, flag: AvailabilityFlag, config: &ProbeConfig) -> Self {
        Self {
            backend,
            flag,
            wake: Rc::new(Notify::new()),
            interval: config.interval(),
            timeout: config.timeout(),
        }
    }

    pub fn handle(&self) -> ProbeHandle {
        ProbeHandle {
            wake: self.wake.clone(),
        }
    }

    pub fn flag(&self) -> &AvailabilityFlag {
        &self.flag
    }

    /// Ping the backend once and publish the result.
    pub async fn check(&self) -> Availability {
        let reachable = match tokio::time::timeout(self.timeout, self.backend.ping()).await {
            Ok(reachable) => reachable,
            Err(_) => {
                warn!("availability check timed out after {:?}", self.timeout);
                false
            }
        };
        let availability = if reachable {
            Availability::Available
        } else {
            Availability::Unavailable
        };
        debug!("availability check: {}", availability);
        self.flag.set(availability);
        availability
    }

    /// Check now, then again on every interval tick or nudge. Never returns.
    pub async fn run(&self) {
        loop {
            self.check().await;
            match self.interval {
                Some(interval) => {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = self.wake.notified() => {}
                    }
                }
                None => self.wake.notified().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use std::cell::RefCell;

    fn probe(backend: &MockBackend, interval_ms: Option<u64>) -> AvailabilityProbe<MockBackend> {
        let config = ProbeConfig {
            interval_ms,
            timeout_ms: 1000,
        };
        AvailabilityProbe::new(Rc::new(backend.clone()), AvailabilityFlag::new(), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_publishes_result() {
        let backend = MockBackend::new();
        let probe = probe(&backend, None);
        assert_eq!(probe.flag().get(), Availability::Unknown);

        assert_eq!(probe.check().await, Availability::Available);
        assert_eq!(probe.flag().get(), Availability::Available);

        backend.set_reachable(false);
        assert_eq!(probe.check().await, Availability::Unavailable);
        assert!(probe.flag().is_unavailable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_ping_counts_as_unavailable() {
        let backend = MockBackend::new();
        backend.set_ping_hangs(true);
        let probe = probe(&backend, None);
        assert_eq!(probe.check().await, Availability::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flag_notifies_only_on_change() {
        let backend = MockBackend::new();
        let probe = probe(&backend, None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            probe.flag().subscribe(move |a| seen.borrow_mut().push(*a))
        };
        probe.check().await;
        probe.check().await;
        backend.set_reachable(false);
        probe.check().await;
        assert_eq!(
            *seen.borrow(),
            vec![Availability::Available, Availability::Unavailable]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_nudge_triggers_a_recheck() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let backend = MockBackend::new();
                let probe = Rc::new(probe(&backend, None));
                let handle = probe.handle();
                let flag = probe.flag().clone();
                let runner = probe.clone();
                let task = tokio::task::spawn_local(async move { runner.run().await });

                crate::testing::settle().await;
                assert_eq!(flag.get(), Availability::Available);

                backend.set_reachable(false);
                crate::testing::settle().await;
                assert_eq!(flag.get(), Availability::Available);

                handle.nudge();
                crate::testing::settle().await;
                assert_eq!(flag.get(), Availability::Unavailable);
                task.abort();
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_check() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let backend = MockBackend::new();
                let probe = Rc::new(probe(&backend, Some(30_000)));
                let flag = probe.flag().clone();
                let runner = probe.clone();
                let task = tokio::task::spawn_local(async move { runner.run().await });

                crate::testing::settle().await;
                assert_eq!(flag.get(), Availability::Available);

                backend.set_reachable(false);
                tokio::time::sleep(Duration::from_millis(30_001)).await;
                crate::testing::settle().await;
                assert_eq!(flag.get(), Availability::Unavailable);
                task.abort();
            })
            .await;
    }
}
