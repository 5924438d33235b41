//! `export`: write one box plot series as CSV.

use aq_store::backend::{Backend, Dataset};
use aq_store::SlotKey;
use aq_types::box_plot::BoxPlotSeries;
use aq_types::period::Period;
use aq_types::station::StationId;
use aq_utils::dates;
use log::info;
use std::io::Write;

pub async fn run_export(
    base_url: &str,
    period: Period,
    station: Option<&str>,
    output: &str,
) -> anyhow::Result<()> {
    let config = crate::load_config(None)?;
    let backend = crate::connect(base_url, &config)?;
    let key = SlotKey::BoxPlot {
        station: station.map(StationId::from),
        period,
    };

    info!("Fetching {}", key);
    let payload = backend
        .fetch(&key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch {}: {}", key, e))?;
    let series = BoxPlotSeries::from_payload(payload)?;

    let file = std::fs::File::create(output)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", output, e))?;
    write_box_plot_csv(&series, period, file)?;
    info!("Wrote {} buckets to {}", series.len(), output);
    Ok(())
}

/// Header row, then one row per bucket in date order.
pub fn write_box_plot_csv<W: Write>(
    series: &BoxPlotSeries,
    period: Period,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "label", "lowerfence", "q1", "median", "q3", "upperfence"])?;
    for (label, bucket) in series.labelled(period) {
        let mut record = vec![dates::format_date(&bucket.date), label];
        record.extend(bucket.quintiles.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
