use anyhow::Result;
use clap::Parser;
use log::info;
use testdata_crawler::cli::Cli;
use testdata_crawler::client::RestClient;
use testdata_crawler::config::resolve_config;
use testdata_crawler::crawl::Crawler;
use testdata_crawler::report::write_report;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let client = RestClient::new(&config)?;
    let crawler = Crawler::new(&client, &config)?;
    let summary = crawler.run()?;

    write_report(&crawler.snapshot(), cli.format, cli.output.as_deref())?;

    info!(
        "crawled {} repositories ({} failed): {} methods across {} features in {}ms",
        summary.repositories,
        summary.failed_repositories,
        summary.methods,
        summary.features,
        summary.duration_ms
    );

    Ok(())
}
