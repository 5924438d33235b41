//! The dashboard facade: one selection, one availability flag, and the
//! slots a presentation layer reads.
//!
//! Everything here is single-threaded. Fetches and the availability probe
//! run as local tasks, so [`Dashboard::start`] and every call that may
//! start a fetch must happen inside a [`tokio::task::LocalSet`].

use crate::availability::{Availability, AvailabilityFlag, AvailabilityProbe};
use crate::backend::Backend;
use crate::config::DashboardConfig;
use crate::coordinator::{DashboardSlots, FetchCoordinator};
use crate::derive::{derive_view, SlotReading, ViewDisplay, ViewKind, ViewState};
use crate::error::FetchError;
use crate::key::{Mode, SlotId};
use crate::observable::Subscription;
use crate::selection::{Selection, SelectionStore};
use aq_types::box_plot::BoxPlotSeries;
use aq_types::historic::HistoricSeries;
use aq_types::period::{ChartKind, Period};
use aq_types::station::StationId;
use aq_types::summary::AirQualitySummary;
use log::info;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tokio::task::JoinHandle;

struct DashboardInner<B: Backend> {
    slots: DashboardSlots,
    selection: SelectionStore,
    availability: AvailabilityFlag,
    probe: Rc<AvailabilityProbe<B>>,
    coordinator: FetchCoordinator<B>,
    probe_task: RefCell<Option<JoinHandle<()>>>,
}

impl<B: Backend> Drop for DashboardInner<B> {
    fn drop(&mut self) {
        if let Some(task) = self.probe_task.get_mut().take() {
            task.abort();
        }
    }
}

impl<B: Backend> DashboardInner<B> {
    /// The slot behind `view`, read against the key the selection expects.
    fn reading(&self, view: ViewKind) -> (Mode, SlotReading) {
        let selection = self.selection.current();
        let mode = selection.mode();
        let station = selection.station();
        let reading = match view {
            ViewKind::Summary => {
                let (id, slot) = match mode {
                    Mode::Region => (SlotId::Region, &self.slots.region),
                    Mode::Station => (SlotId::Station, &self.slots.station),
                };
                SlotReading::expecting(&slot.current_state(), id.key_for(station).as_ref())
            }
            ViewKind::BoxPlot(period) => SlotReading::expecting(
                &self.slots.box_plot(period).current_state(),
                SlotId::Chart(ChartKind::BoxPlot, period).key_for(station).as_ref(),
            ),
            ViewKind::Historic(period) => SlotReading::expecting(
                &self.slots.historic(period).current_state(),
                SlotId::Chart(ChartKind::Historic, period).key_for(station).as_ref(),
            ),
        };
        (mode, reading)
    }

    fn view_state(&self, view: ViewKind) -> ViewState {
        let (mode, reading) = self.reading(view);
        derive_view(mode, &reading, self.availability.get())
    }

    fn view_error(&self, view: ViewKind) -> Option<FetchError> {
        let (mode, reading) = self.reading(view);
        if derive_view(mode, &reading, self.availability.get()).has_error {
            reading.error
        } else {
            None
        }
    }
}

/// Reactive state of the air-quality dashboard.
///
/// Cheap to clone; clones share all state.
pub struct Dashboard<B: Backend> {
    inner: Rc<DashboardInner<B>>,
}

impl<B: Backend> Clone for Dashboard<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Backend> Dashboard<B> {
    /// Build the dashboard in region mode. Nothing is fetched until
    /// [`Dashboard::start`].
    pub fn new(backend: B, config: DashboardConfig) -> Self {
        let backend = Rc::new(backend);
        let slots = DashboardSlots::new();
        let selection = SelectionStore::new(Selection::new(&config));
        let availability = AvailabilityFlag::new();
        let probe = Rc::new(AvailabilityProbe::new(
            backend.clone(),
            availability.clone(),
            &config.probe,
        ));
        let coordinator = FetchCoordinator::new(
            backend,
            slots.clone(),
            selection.clone(),
            availability.clone(),
            probe.handle(),
            config,
        );
        Self {
            inner: Rc::new(DashboardInner {
                slots,
                selection,
                availability,
                probe,
                coordinator,
                probe_task: RefCell::new(None),
            }),
        }
    }

    /// Fetch everything the initial selection displays and start the
    /// background availability probe. Calling it again is a no-op.
    pub fn start(&self) {
        if self.inner.probe_task.borrow().is_some() {
            return;
        }
        info!("starting dashboard");
        let probe = self.inner.probe.clone();
        let task = tokio::task::spawn_local(async move { probe.run().await });
        *self.inner.probe_task.borrow_mut() = Some(task);
        self.inner.coordinator.sync();
    }

    /// Select a station, or return to region mode with `None`.
    pub fn set_station(&self, station: Option<StationId>) -> bool {
        self.inner.selection.set_station(station)
    }

    pub fn set_period(&self, kind: ChartKind, period: Period) -> bool {
        self.inner.selection.set_period(kind, period)
    }

    pub fn selection(&self) -> Selection {
        self.inner.selection.current()
    }

    pub fn availability(&self) -> Availability {
        self.inner.availability.get()
    }

    /// Run one availability check now instead of waiting for the probe.
    pub async fn check_availability(&self) -> Availability {
        self.inner.probe.check().await
    }

    pub fn view_state(&self, view: ViewKind) -> ViewState {
        self.inner.view_state(view)
    }

    pub fn display(&self, view: ViewKind) -> ViewDisplay {
        self.view_state(view).display()
    }

    /// The error behind an error banner on `view`. `None` whenever the view
    /// is not showing one, including while the backend is unavailable.
    pub fn view_error(&self, view: ViewKind) -> Option<FetchError> {
        self.inner.view_error(view)
    }

    /// The summary for the current mode, if it has arrived.
    pub fn summary(&self) -> Option<Rc<AirQualitySummary>> {
        let selection = self.selection();
        let (id, slot) = match selection.mode() {
            Mode::Region => (SlotId::Region, &self.inner.slots.region),
            Mode::Station => (SlotId::Station, &self.inner.slots.station),
        };
        current_value(slot.current_state(), id, &selection)
    }

    pub fn box_plot(&self, period: Period) -> Option<Rc<BoxPlotSeries>> {
        let selection = self.selection();
        current_value(
            self.inner.slots.box_plot(period).current_state(),
            SlotId::Chart(ChartKind::BoxPlot, period),
            &selection,
        )
    }

    pub fn historic(&self, period: Period) -> Option<Rc<HistoricSeries>> {
        let selection = self.selection();
        current_value(
            self.inner.slots.historic(period).current_state(),
            SlotId::Chart(ChartKind::Historic, period),
            &selection,
        )
    }

    /// Refetch everything currently displayed.
    pub fn refresh(&self) {
        info!("refreshing dashboard");
        self.inner.coordinator.refresh();
    }

    /// Refetch displayed slots that failed with a retryable error.
    pub fn retry_failed(&self) {
        self.inner.coordinator.retry_failed();
    }

    /// Call `listener` with the view's current state, then again each time
    /// it changes. Identical consecutive states are delivered once.
    pub fn watch_view(&self, view: ViewKind, listener: impl Fn(ViewState) + 'static) -> ViewWatch {
        let weak: Weak<DashboardInner<B>> = Rc::downgrade(&self.inner);
        let last: Cell<Option<ViewState>> = Cell::new(None);
        let refresh: Rc<dyn Fn()> = Rc::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let state = inner.view_state(view);
            if last.replace(Some(state)) != Some(state) {
                listener(state);
            }
        });

        let mut subscriptions = Vec::new();
        {
            let refresh = refresh.clone();
            subscriptions.push(self.inner.selection.subscribe(move |_| refresh()));
        }
        {
            let refresh = refresh.clone();
            subscriptions.push(self.inner.availability.subscribe(move |_| refresh()));
        }
        let slots = &self.inner.slots;
        match view {
            ViewKind::Summary => {
                for slot in [&slots.region, &slots.station] {
                    let refresh = refresh.clone();
                    subscriptions.push(slot.subscribe(move |_| refresh()));
                }
            }
            ViewKind::BoxPlot(period) => {
                let refresh = refresh.clone();
                subscriptions.push(slots.box_plot(period).subscribe(move |_| refresh()));
            }
            ViewKind::Historic(period) => {
                let refresh = refresh.clone();
                subscriptions.push(slots.historic(period).subscribe(move |_| refresh()));
            }
        }

        refresh();
        ViewWatch { subscriptions }
    }
}

fn current_value<V>(
    snapshot: crate::slot::SlotSnapshot<V>,
    id: SlotId,
    selection: &Selection,
) -> Option<Rc<V>> {
    if snapshot.key != id.key_for(selection.station()) {
        return None;
    }
    snapshot.state.value().cloned()
}

/// Keeps a [`Dashboard::watch_view`] listener registered until dropped.
#[must_use = "the listener is removed when the ViewWatch is dropped"]
pub struct ViewWatch {
    subscriptions: Vec<Subscription>,
}

impl ViewWatch {
    pub fn cancel(self) {
        drop(self.subscriptions);
    }
}
