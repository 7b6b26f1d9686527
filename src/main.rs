use anyhow::Result;
use clap::Parser;

use blindspot::cli;
use blindspot::generator::workflow::launch;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config()?;
    let ideas = args.collect_ideas()?;

    launch(&config, &ideas, args.check).await
}
