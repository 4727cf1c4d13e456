mod cli;
mod driver;
mod logging;

use anyhow::Result;
use clap::Parser;
use runway_web::{ListingConfig, ListingSource};

use crate::cli::Args;
use crate::driver::Drive;
use crate::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    if args.viewport_height.is_nan() || args.viewport_height <= 0.0 {
        anyhow::bail!("viewport height must be positive, got {}", args.viewport_height);
    }

    let section = args.section()?;
    let scroller = args.scroller_config()?;
    let listing = ListingConfig::new(&args.base_url, section)?;

    tracing::info!(base = %listing.base_url, category = listing.section.category(), "starting headless run");
    let source = ListingSource::new(listing)?;

    let drive = Drive {
        viewport_height: args.viewport_height,
        scroll_step: args.scroll_step,
        steps: args.steps,
        json: args.json,
    };
    driver::run(source, scroller, drive).await
}
