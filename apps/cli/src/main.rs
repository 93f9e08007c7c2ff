//! SiteGraph CLI: page metadata and structured data for a business site.
//!
//! Renders head tags, JSON-LD knowledge graphs, sitemaps, robots.txt and the
//! web manifest from a single business profile.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
