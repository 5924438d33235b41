//! `probe`: one reachability check.

use aq_store::Availability;

pub async fn run_probe(base_url: &str) -> anyhow::Result<()> {
    let dashboard = crate::open_dashboard(base_url, crate::load_config(None)?)?;
    let availability = dashboard.check_availability().await;
    println!("{}: {}", base_url, availability);
    if availability == Availability::Unavailable {
        anyhow::bail!("backend at {} is unavailable", base_url);
    }
    Ok(())
}
