//! Text rendering of dashboard views for the terminal.

use aq_store::http::HttpBackend;
use aq_store::selection::Selection;
use aq_store::{Dashboard, DashboardConfig, ViewDisplay, ViewKind, ViewWatch};
use aq_types::box_plot::BoxPlotSeries;
use aq_types::historic::HistoricSeries;
use aq_types::period::{ChartKind, Period};
use aq_types::summary::AirQualitySummary;
use chrono::Local;

/// Every view the dashboard can show, in display order.
pub fn all_views() -> Vec<ViewKind> {
    let mut views = vec![ViewKind::Summary];
    for kind in ChartKind::ALL {
        for period in Period::ALL {
            views.push(ViewKind::chart(kind, period));
        }
    }
    views
}

/// Whether `view` is on screen for `selection`: the selected period of a
/// chart, or one of its pinned periods.
pub fn is_displayed(view: ViewKind, selection: &Selection, config: &DashboardConfig) -> bool {
    let (kind, period) = match view {
        ViewKind::Summary => return true,
        ViewKind::BoxPlot(p) => (ChartKind::BoxPlot, p),
        ViewKind::Historic(p) => (ChartKind::Historic, p),
    };
    selection.period(kind) == period || config.chart(kind).pinned_periods.contains(&period)
}

pub fn describe_summary(summary: &AirQualitySummary) -> String {
    match (summary.aqi, summary.category()) {
        (Some(aqi), Some(category)) => format!(
            "{}: AQI {:.0} ({}, {})",
            summary.display_name(),
            aqi,
            category.label(),
            category.color()
        ),
        _ => format!("{}: no reading", summary.display_name()),
    }
}

pub fn describe_box_plot(series: &BoxPlotSeries, period: Period) -> String {
    let buckets: Vec<String> = series
        .labelled(period)
        .into_iter()
        .map(|(label, bucket)| {
            let (low, high) = bucket.extrema();
            format!("{} {:.1} [{:.1}-{:.1}]", label, bucket.mean(), low, high)
        })
        .collect();
    buckets.join(", ")
}

pub fn describe_historic(series: &HistoricSeries) -> String {
    series
        .lines()
        .iter()
        .map(|line| match line.points.last() {
            Some(last) => format!("{} ({} points, last {:.0})", line.name, line.points.len(), last.value),
            None => format!("{} (no points)", line.name),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// One line for `view`: its display state plus the data when it has content.
pub fn describe(dashboard: &Dashboard<HttpBackend>, view: ViewKind) -> String {
    let display = dashboard.display(view);
    let detail = match (display, view) {
        (ViewDisplay::Content, ViewKind::Summary) => dashboard.summary().map(|s| describe_summary(&s)),
        (ViewDisplay::Content, ViewKind::BoxPlot(p)) => {
            dashboard.box_plot(p).map(|s| describe_box_plot(&s, p))
        }
        (ViewDisplay::Content, ViewKind::Historic(p)) => dashboard.historic(p).map(|s| describe_historic(&s)),
        (ViewDisplay::ErrorBanner, _) => dashboard.view_error(view).map(|e| e.to_string()),
        _ => None,
    };
    match detail {
        Some(detail) => format!("{:<14} {:<20} {}", view.to_string(), display.to_string(), detail),
        None => format!("{:<14} {}", view.to_string(), display),
    }
}

/// Print every displayed view.
pub fn print_views(dashboard: &Dashboard<HttpBackend>, config: &DashboardConfig) {
    let selection = dashboard.selection();
    match selection.station() {
        Some(station) => println!("== station {} ==", station),
        None => println!("== region =="),
    }
    for view in all_views() {
        if is_displayed(view, &selection, config) {
            println!("{}", describe(dashboard, view));
        }
    }
}

/// Print a timestamped line whenever a displayed view changes.
pub fn follow_views(dashboard: &Dashboard<HttpBackend>, config: &DashboardConfig) -> Vec<ViewWatch> {
    all_views()
        .into_iter()
        .map(|view| {
            let watched = dashboard.clone();
            let config = config.clone();
            dashboard.watch_view(view, move |_| {
                if is_displayed(view, &watched.selection(), &config) {
                    println!("[{}] {}", Local::now().format("%H:%M:%S"), describe(&watched, view));
                }
            })
        })
        .collect()
}
