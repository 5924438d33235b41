//! Fetch coordination: keeps every slot keyed to the current selection.
//!
//! On each selection change the coordinator works out, per slot, which
//! key it should hold. Slots whose key changed get a new fetch (or, while
//! the backend is down, are re-keyed and left waiting). Slots whose key is
//! unchanged are left alone, so changing one chart's period never refetches
//! another chart.

use crate::availability::{Availability, AvailabilityFlag, ProbeHandle};
use crate::backend::{Backend, Dataset};
use crate::config::{DashboardConfig, RetryPolicy};
use crate::error::{ErrorKind, FetchError};
use crate::key::{SlotId, SlotKey};
use crate::observable::Subscription;
use crate::selection::{Selection, SelectionStore};
use crate::slot::{Generation, ResourceSlot, SlotStatus};
use aq_types::box_plot::BoxPlotSeries;
use aq_types::historic::HistoricSeries;
use aq_types::period::{ChartKind, Period};
use aq_types::summary::AirQualitySummary;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Every slot of the dashboard.
#[derive(Clone)]
pub struct DashboardSlots {
    pub region: ResourceSlot<AirQualitySummary>,
    pub station: ResourceSlot<AirQualitySummary>,
    box_plots: [ResourceSlot<BoxPlotSeries>; 3],
    historic: [ResourceSlot<HistoricSeries>; 3],
}

impl DashboardSlots {
    pub fn new() -> Self {
        Self {
            region: ResourceSlot::new(SlotId::Region),
            station: ResourceSlot::new(SlotId::Station),
            box_plots: Period::ALL.map(|p| ResourceSlot::new(SlotId::Chart(ChartKind::BoxPlot, p))),
            historic: Period::ALL.map(|p| ResourceSlot::new(SlotId::Chart(ChartKind::Historic, p))),
        }
    }

    pub fn box_plot(&self, period: Period) -> &ResourceSlot<BoxPlotSeries> {
        &self.box_plots[period.index()]
    }

    pub fn historic(&self, period: Period) -> &ResourceSlot<HistoricSeries> {
        &self.historic[period.index()]
    }
}

impl Default for DashboardSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// What a slot should hold for the current selection.
#[derive(Debug, Clone, PartialEq)]
enum LanePlan {
    /// Displayed: fetch `key` if the slot does not already hold it.
    Active(SlotKey),
    /// Not displayed, but may keep `key` cached for a quick switch back.
    Retained(SlotKey),
    /// Meaningless in the current mode.
    Dropped,
}

fn plan(id: SlotId, selection: &Selection, config: &DashboardConfig) -> LanePlan {
    let Some(key) = id.key_for(selection.station()) else {
        return LanePlan::Dropped;
    };
    match id {
        SlotId::Chart(kind, period)
            if selection.period(kind) != period
                && !config.chart(kind).pinned_periods.contains(&period) =>
        {
            LanePlan::Retained(key)
        }
        _ => LanePlan::Active(key),
    }
}

/// Everything a fetch task needs, detached from the coordinator.
struct FetchContext<B> {
    backend: Rc<B>,
    availability: AvailabilityFlag,
    probe: ProbeHandle,
    timeout: Duration,
    retry: RetryPolicy,
}

impl<B> Clone for FetchContext<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            availability: self.availability.clone(),
            probe: self.probe.clone(),
            timeout: self.timeout,
            retry: self.retry.clone(),
        }
    }
}

/// Type-erased view of a slot, so the coordinator can walk all lanes
/// regardless of the dataset they hold.
trait Lane<B> {
    fn id(&self) -> SlotId;
    fn key(&self) -> Option<SlotKey>;
    fn status(&self) -> SlotStatus;
    fn has_retryable_error(&self) -> bool;
    fn invalidate(&self, key: SlotKey);
    fn clear(&self);
    fn start(&self, ctx: &FetchContext<B>, key: SlotKey);
}

impl<B: Backend, V: Dataset> Lane<B> for ResourceSlot<V> {
    fn id(&self) -> SlotId {
        ResourceSlot::id(self)
    }

    fn key(&self) -> Option<SlotKey> {
        ResourceSlot::key(self)
    }

    fn status(&self) -> SlotStatus {
        ResourceSlot::status(self)
    }

    fn has_retryable_error(&self) -> bool {
        self.error().is_some_and(|e| e.is_retryable())
    }

    fn invalidate(&self, key: SlotKey) {
        ResourceSlot::invalidate(self, key)
    }

    fn clear(&self) {
        ResourceSlot::clear(self)
    }

    fn start(&self, ctx: &FetchContext<B>, key: SlotKey) {
        let generation = self.begin_fetch(key.clone());
        debug!("fetch {} started (generation {})", key, generation);
        let task = FetchTask {
            ctx: ctx.clone(),
            slot: self.clone(),
            key,
            generation,
        };
        tokio::task::spawn_local(task.run());
    }
}

/// One logical fetch of a slot, including its retries.
struct FetchTask<B, V> {
    ctx: FetchContext<B>,
    slot: ResourceSlot<V>,
    key: SlotKey,
    generation: Generation,
}

impl<B: Backend, V: Dataset> FetchTask<B, V> {
    async fn run(mut self) {
        let mut retries = 0;
        let mut backoff = self.ctx.retry.initial_backoff();
        loop {
            let outcome = self.attempt().await;
            if let Err(err) = &outcome {
                if err.kind() == ErrorKind::Transport {
                    self.ctx.probe.nudge();
                }
                if err.is_retryable() && retries < self.ctx.retry.max_retries {
                    warn!(
                        "Attempt {}/{}: fetch {} failed: {}. Retrying in {:?}",
                        retries + 1,
                        self.ctx.retry.max_retries + 1,
                        self.key,
                        err,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = self.ctx.retry.next_backoff(backoff);
                    retries += 1;

                    if self.slot.generation() != self.generation {
                        debug!("retry of {} abandoned: superseded", self.key);
                        return;
                    }
                    if self.ctx.availability.is_unavailable() {
                        self.finish(Err(FetchError::BackendUnavailable));
                        return;
                    }
                    self.generation = self.slot.begin_fetch(self.key.clone());
                    continue;
                }
            }
            self.finish(outcome);
            return;
        }
    }

    async fn attempt(&self) -> Result<V, FetchError> {
        match tokio::time::timeout(self.ctx.timeout, self.ctx.backend.fetch(&self.key)).await {
            Ok(Ok(payload)) => V::from_payload(payload),
            Ok(Err(err)) => Err(err),
            Err(_) => {
                warn!("fetch {} timed out after {:?}", self.key, self.ctx.timeout);
                Err(FetchError::Timeout {
                    after: self.ctx.timeout,
                })
            }
        }
    }

    fn finish(&self, outcome: Result<V, FetchError>) {
        if let Err(err) = &outcome {
            warn!("fetch {} failed: {}", self.key, err);
        }
        if !self.slot.resolve(self.generation, outcome) {
            debug!(
                "discarded stale response for {} (generation {})",
                self.key, self.generation
            );
        }
    }
}

struct CoordinatorInner<B> {
    ctx: FetchContext<B>,
    slots: DashboardSlots,
    selection: SelectionStore,
    config: DashboardConfig,
    syncing: Cell<bool>,
    resync: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
}

/// Drives the dashboard's slots from the selection and backend availability.
pub struct FetchCoordinator<B> {
    inner: Rc<CoordinatorInner<B>>,
}

impl<B> Clone for FetchCoordinator<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Backend> FetchCoordinator<B> {
    pub fn new(
        backend: Rc<B>,
        slots: DashboardSlots,
        selection: SelectionStore,
        availability: AvailabilityFlag,
        probe: ProbeHandle,
        config: DashboardConfig,
    ) -> Self {
        let ctx = FetchContext {
            backend,
            availability,
            probe,
            timeout: config.fetch_timeout(),
            retry: config.retry.clone(),
        };
        let coordinator = Self {
            inner: Rc::new(CoordinatorInner {
                ctx,
                slots,
                selection,
                config,
                syncing: Cell::new(false),
                resync: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
            }),
        };
        coordinator.attach();
        coordinator
    }

    fn attach(&self) {
        let weak = Rc::downgrade(&self.inner);
        let on_selection = self.inner.selection.subscribe(move |_| {
            if let Some(coordinator) = Self::upgrade(&weak) {
                coordinator.sync();
            }
        });

        let weak = Rc::downgrade(&self.inner);
        let on_availability = self.inner.ctx.availability.subscribe(move |availability| {
            if *availability != Availability::Available {
                return;
            }
            if let Some(coordinator) = Self::upgrade(&weak) {
                coordinator.retry_failed();
                coordinator.sync();
            }
        });

        self.inner
            .subscriptions
            .borrow_mut()
            .extend([on_selection, on_availability]);
    }

    fn upgrade(weak: &Weak<CoordinatorInner<B>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn lanes(&self) -> Vec<&dyn Lane<B>> {
        let slots = &self.inner.slots;
        let mut lanes: Vec<&dyn Lane<B>> = Vec::with_capacity(8);
        lanes.push(&slots.region);
        lanes.push(&slots.station);
        for period in Period::ALL {
            lanes.push(slots.box_plot(period));
        }
        for period in Period::ALL {
            lanes.push(slots.historic(period));
        }
        lanes
    }

    /// Bring every slot in line with the current selection.
    ///
    /// Re-entrant calls (a listener changing the selection mid-sync) are
    /// folded into another pass of the outer call.
    pub fn sync(&self) {
        if self.inner.syncing.replace(true) {
            self.inner.resync.set(true);
            return;
        }
        loop {
            self.inner.resync.set(false);
            self.sync_pass();
            if !self.inner.resync.get() {
                break;
            }
        }
        self.inner.syncing.set(false);
    }

    fn sync_pass(&self) {
        let selection = self.inner.selection.current();
        let unavailable = self.inner.ctx.availability.is_unavailable();
        for lane in self.lanes() {
            match plan(lane.id(), &selection, &self.inner.config) {
                LanePlan::Active(key) => {
                    // Only a lane holding or fetching this key is up to date.
                    // Idle and failed lanes start over.
                    let settled = matches!(lane.status(), SlotStatus::Ready | SlotStatus::Loading);
                    if settled && lane.key().as_ref() == Some(&key) {
                        continue;
                    }
                    if unavailable {
                        debug!("backend unavailable, deferring fetch {}", key);
                        lane.invalidate(key);
                    } else {
                        lane.start(&self.inner.ctx, key);
                    }
                }
                LanePlan::Retained(key) => {
                    if lane.key().is_some_and(|current| current != key) {
                        lane.clear();
                    }
                }
                LanePlan::Dropped => lane.clear(),
            }
        }
    }

    /// Start a new generation for every displayed slot.
    pub fn refresh(&self) {
        self.restart(|_| true);
    }

    /// Refetch displayed slots whose last fetch failed with a retryable error.
    pub fn retry_failed(&self) {
        self.restart(|lane| lane.has_retryable_error());
    }

    fn restart(&self, wanted: impl Fn(&dyn Lane<B>) -> bool) {
        let selection = self.inner.selection.current();
        let unavailable = self.inner.ctx.availability.is_unavailable();
        for lane in self.lanes() {
            let LanePlan::Active(key) = plan(lane.id(), &selection, &self.inner.config) else {
                continue;
            };
            if !wanted(lane) {
                continue;
            }
            if unavailable {
                lane.invalidate(key);
            } else {
                lane.start(&self.inner.ctx, key);
            }
        }
    }
}
