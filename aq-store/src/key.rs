//! Slot identities and the keys they fetch.

use aq_types::period::{ChartKind, Period};
use aq_types::station::StationId;
use std::fmt;

/// Which dataset the dashboard shows for the summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// No station selected: region-wide aggregates.
    Region,
    /// A specific station is selected.
    Station,
}

/// What a slot is currently fetching, i.e. one backend request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Region,
    Station(StationId),
    BoxPlot {
        station: Option<StationId>,
        period: Period,
    },
    Historic {
        station: Option<StationId>,
        period: Period,
    },
}

impl SlotKey {
    pub fn chart(kind: ChartKind, station: Option<StationId>, period: Period) -> Self {
        match kind {
            ChartKind::BoxPlot => SlotKey::BoxPlot { station, period },
            ChartKind::Historic => SlotKey::Historic { station, period },
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = |station: &Option<StationId>| {
            station
                .as_ref()
                .map_or_else(|| "region".to_string(), |s| s.to_string())
        };
        match self {
            SlotKey::Region => write!(f, "region"),
            SlotKey::Station(id) => write!(f, "station/{}", id),
            SlotKey::BoxPlot { station, period } => {
                write!(f, "boxplot/{}/{}", period, scope(station))
            }
            SlotKey::Historic { station, period } => {
                write!(f, "historic/{}/{}", period, scope(station))
            }
        }
    }
}

/// A slot's fixed identity. Its key changes with the selection, its id never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    Region,
    Station,
    Chart(ChartKind, Period),
}

impl SlotId {
    /// Every slot the dashboard owns.
    pub fn all() -> Vec<SlotId> {
        let mut ids = vec![SlotId::Region, SlotId::Station];
        for kind in ChartKind::ALL {
            for period in Period::ALL {
                ids.push(SlotId::Chart(kind, period));
            }
        }
        ids
    }

    /// The key this slot fetches for the given station (or region mode),
    /// or `None` when the slot has no meaning in that mode.
    pub fn key_for(&self, station: Option<&StationId>) -> Option<SlotKey> {
        match self {
            SlotId::Region => station.is_none().then_some(SlotKey::Region),
            SlotId::Station => station.map(|id| SlotKey::Station(id.clone())),
            SlotId::Chart(kind, period) => Some(SlotKey::chart(*kind, station.cloned(), *period)),
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Region => write!(f, "region"),
            SlotId::Station => write!(f, "station"),
            SlotId::Chart(kind, period) => write!(f, "{}/{}", kind, period),
        }
    }
}
