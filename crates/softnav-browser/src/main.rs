//! softnav - replay soft navigations against a site
//!
//! ```bash
//! softnav https://ib.example/ about.html services.html back
//! softnav https://ib.example/ about.html --no-delay --json
//! RUST_LOG=softnav_engine=debug softnav https://ib.example/ services.html
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use softnav_browser::{Session, Step};
use softnav_engine::NavConfig;
use softnav_engine::net::HttpFetcher;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// Headless soft-navigation driver.
#[derive(Parser, Debug)]
#[command(name = "softnav", version)]
#[command(about = "Replay link clicks and history steps with soft navigation")]
struct Args {
    /// Page to start on
    start_url: Url,

    /// Steps to replay: an href to click, `back`, or `forward`
    steps: Vec<Step>,

    /// JSON file overriding navigation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the exit-transition delay
    #[arg(long)]
    no_delay: bool,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NavConfig::from_path(path).with_context(|| format!("loading config {}", path.display()))?,
        None => NavConfig::default(),
    };
    if args.no_delay {
        config.transition_ms = 0;
    }

    let fetcher = HttpFetcher::new().context("building HTTP client")?;
    let session = Session::new(fetcher, config);
    tracing::info!(start = %args.start_url, steps = args.steps.len(), "starting session");

    let summaries = smol::block_on(session.run(&args.start_url, &args.steps))
        .with_context(|| format!("replaying steps from {}", args.start_url))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            println!("{summary}");
        }
    }
    Ok(())
}
