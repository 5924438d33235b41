//! Presentation-facing flags derived from slot state.
//!
//! This module is the only place that decides which of the unavailable
//! message, error banner, spinner, empty state or content a view shows.
//! Precedence, highest first:
//!
//! 1. backend unavailable
//! 2. error
//! 3. loading
//! 4. ready without data
//! 5. ready with data

use crate::availability::Availability;
use crate::backend::Dataset;
use crate::error::FetchError;
use crate::key::{Mode, SlotKey};
use crate::slot::{SlotSnapshot, SlotStatus};
use aq_types::period::{ChartKind, Period};
use std::fmt;

/// A panel of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// The AQI card: station detail, or the regional aggregate.
    Summary,
    BoxPlot(Period),
    Historic(Period),
}

impl ViewKind {
    pub fn chart(kind: ChartKind, period: Period) -> Self {
        match kind {
            ChartKind::BoxPlot => ViewKind::BoxPlot(period),
            ChartKind::Historic => ViewKind::Historic(period),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Summary => write!(f, "summary"),
            ViewKind::BoxPlot(p) => write!(f, "boxplot/{}", p),
            ViewKind::Historic(p) => write!(f, "historic/{}", p),
        }
    }
}

/// What derivation needs to know about the slot behind a view.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotReading {
    pub status: SlotStatus,
    pub empty: bool,
    pub error: Option<FetchError>,
}

impl SlotReading {
    /// The slot has not caught up with the selection yet.
    pub fn pending() -> Self {
        Self {
            status: SlotStatus::Loading,
            empty: false,
            error: None,
        }
    }

    /// Read `snapshot` on behalf of a view that expects `expected`.
    ///
    /// A slot still keyed to something else (an earlier station, the other
    /// mode) reads as pending so its old value is never shown.
    pub fn expecting<V: Dataset>(snapshot: &SlotSnapshot<V>, expected: Option<&SlotKey>) -> Self {
        if snapshot.key.as_ref() != expected {
            return Self::pending();
        }
        Self {
            status: snapshot.status(),
            empty: snapshot.state.value().is_some_and(|v| v.is_empty()),
            error: snapshot.state.error().cloned(),
        }
    }
}

/// The derived flags for one view. `data_available` and `has_error` are
/// never both set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub loading: bool,
    pub data_available: bool,
    pub has_error: bool,
    pub backend_unavailable: bool,
}

/// The one thing a view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewDisplay {
    Unavailable,
    ErrorBanner,
    Spinner,
    EmptyState,
    Content,
}

impl ViewState {
    pub fn display(&self) -> ViewDisplay {
        if self.backend_unavailable {
            ViewDisplay::Unavailable
        } else if self.has_error {
            ViewDisplay::ErrorBanner
        } else if self.loading {
            ViewDisplay::Spinner
        } else if self.data_available {
            ViewDisplay::Content
        } else {
            ViewDisplay::EmptyState
        }
    }
}

impl fmt::Display for ViewDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViewDisplay::Unavailable => "backend unavailable",
            ViewDisplay::ErrorBanner => "error",
            ViewDisplay::Spinner => "loading",
            ViewDisplay::EmptyState => "no data",
            ViewDisplay::Content => "content",
        };
        f.write_str(s)
    }
}

/// Derive a view's flags from the slot relevant to the current mode.
pub fn derive_view(mode: Mode, reading: &SlotReading, availability: Availability) -> ViewState {
    if availability == Availability::Unavailable {
        return ViewState {
            backend_unavailable: true,
            ..ViewState::default()
        };
    }

    let has_error = reading.status == SlotStatus::Error;
    let unresolved = matches!(reading.status, SlotStatus::Idle | SlotStatus::Loading);
    let loading = !has_error
        && (reading.status == SlotStatus::Loading || (mode == Mode::Station && unresolved));
    let data_available = !has_error && reading.status == SlotStatus::Ready && !reading.empty;

    ViewState {
        loading,
        data_available,
        has_error,
        backend_unavailable: false,
    }
}
