//! aq-cli - Command line tool for the air-quality dashboard.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aq-cli",
    version,
    about = "Air-quality dashboard toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aq_cmd::Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aq_cmd::run(cli.command).await
}
