use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use album_art_dl::{AlbumArtDownloader, Config, Error, LinkOutcome, Result, RunReport};
use clap::Parser;

#[derive(Parser)]
#[command(name = "album-art-dl")]
#[command(about = "Download album artwork, skipping albums already on disk", long_about = None)]
struct Cli {
    /// File with comma-space separated album links
    #[arg(short, long, default_value = "links.txt")]
    links: PathBuf,

    /// Output directory [default: album_arts]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum HTTP requests in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the full run report as JSON instead of a summary
    #[arg(long)]
    report_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) => match print_report(&report, cli.report_json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Failed to print report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "Run aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<RunReport> {
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    if let Some(output) = &cli.output {
        config.download.output_dir = output.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.download.max_concurrent_requests = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.http.request_timeout = Some(Duration::from_secs(timeout));
    }

    let input = tokio::fs::read_to_string(&cli.links)
        .await
        .map_err(|e| Error::Config {
            message: format!("cannot read links file {}: {e}", cli.links.display()),
            key: Some("links".to_string()),
        })?;

    let downloader = AlbumArtDownloader::new(config)?;
    downloader.run_input(&input).await
}

fn print_report(report: &RunReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for entry in &report.links {
        if let LinkOutcome::Failed {
            stage, message, ..
        } = &entry.outcome
        {
            println!("failed  {} ({stage}): {message}", entry.link);
        }
    }
    println!(
        "{} downloaded, {} skipped, {} failed",
        report.downloaded(),
        report.skipped(),
        report.failed()
    );
    Ok(())
}
