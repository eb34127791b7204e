use anyhow::Context;
use campaign_api::{ApiConfig, CampaignApi};
use campaign_report::{run, Cli};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the JSON document
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ApiConfig::from_env().context("loading API configuration")?;
    let api = CampaignApi::new(&config);
    let today = chrono::Local::now().date_naive();

    let doc = run(&api, &cli, today).await?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
