//! component-relations CLI: annotate Storybook stories with component usages.
//!
//! Scans a Vue component tree, finds which files use each component, and
//! writes that list into each component's story file (plus a JSON map).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
