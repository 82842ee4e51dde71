use supplier_scraper_lib::{logger, output, pipeline};
use supplier_scraper_lib::{Cli, RunConfig, ScraperApiClient};
use supplier_scraper_lib::delay_manager::PageDelay;

use anyhow::Context;
use clap::Parser;
use log::info;

fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the key may come from the shell or --api-key.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose));

    // Fails on a missing key before anything touches the network.
    let config = RunConfig::from_cli(cli)?;
    info!(
        "Starting supplier search: '{}' ({}, {}), up to {} results",
        config.query.text,
        config.query.locale.country,
        config.query.locale.region,
        config.query.num_results
    );

    let client = ScraperApiClient::new(&config.api_key, &config.query.locale.country_code)
        .context("Failed to build HTTP client")?;

    let records = pipeline::build_records(&client, &config.query, PageDelay::new(config.delay))
        .context("Supplier search failed")?;

    output::write_records(&records, &config.output)
        .with_context(|| format!("Failed to write results to {}", config.output))?;

    Ok(())
}
