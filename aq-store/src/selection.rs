//! The user's current selection: which station, which period per chart.

use crate::config::DashboardConfig;
use crate::key::Mode;
use crate::observable::{Observable, Subscription};
use aq_types::period::{ChartKind, Period};
use aq_types::station::StationId;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    station: Option<StationId>,
    box_plot_period: Period,
    historic_period: Period,
}

impl Selection {
    /// Region mode with each chart on its configured default period.
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            station: None,
            box_plot_period: config.box_plot.default_period,
            historic_period: config.historic.default_period,
        }
    }

    pub fn station(&self) -> Option<&StationId> {
        self.station.as_ref()
    }

    pub fn mode(&self) -> Mode {
        if self.station.is_some() {
            Mode::Station
        } else {
            Mode::Region
        }
    }

    pub fn period(&self, kind: ChartKind) -> Period {
        match kind {
            ChartKind::BoxPlot => self.box_plot_period,
            ChartKind::Historic => self.historic_period,
        }
    }
}

/// Owner of the [`Selection`]. Mutations apply synchronously and are
/// visible to listeners before the setter returns.
#[derive(Clone)]
pub struct SelectionStore {
    cell: Observable<Selection>,
}

impl SelectionStore {
    pub fn new(initial: Selection) -> Self {
        Self {
            cell: Observable::new(initial),
        }
    }

    pub fn current(&self) -> Selection {
        self.cell.get()
    }

    /// Select a station, or region mode with `None`. Returns whether the
    /// selection changed.
    pub fn set_station(&self, station: Option<StationId>) -> bool {
        let changed = self.cell.update(|s| s.station = station.clone());
        if changed {
            match &station {
                Some(id) => debug!("selection: station {}", id),
                None => debug!("selection: region mode"),
            }
        }
        changed
    }

    pub fn set_period(&self, kind: ChartKind, period: Period) -> bool {
        let changed = self.cell.update(|s| match kind {
            ChartKind::BoxPlot => s.box_plot_period = period,
            ChartKind::Historic => s.historic_period = period,
        });
        if changed {
            debug!("selection: {} period {}", kind, period);
        }
        changed
    }

    pub fn subscribe(&self, listener: impl Fn(&Selection) + 'static) -> Subscription {
        self.cell.subscribe(listener)
    }
}
