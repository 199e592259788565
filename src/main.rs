//! A tool that assembles one canonical COVID-19 dataset out of several unreliable feeds.
//!
//! # Overview
//!
//! `covid-feed` fetches case counts from four independent sources (the CSSE at JHU
//! ArcGIS service, the CSSE daily report CSV, the Worldometer country table, and an
//! optionally-configured manually-curated spreadsheet), reconciles them into a single
//! per-country record set under a fixed precedence policy, enriches each record with
//! population-relative density metrics and severity buckets, validates the result,
//! and publishes one GeoJSON feature array per locale to a key/value store.
//!
//! # Quick Start
//!
//! Run the whole pipeline with the built-in defaults:
//!
//! ```bash
//! covid-feed run
//! ```
//!
//! Fetch, merge, and validate without publishing anything:
//!
//! ```bash
//! covid-feed run --dry-run
//! ```
//!
//! # Configuration
//!
//! Settings are read from `covid-feed.toml` in the working directory (or a file given
//! with `--config`). Generate a commented default file with:
//!
//! ```bash
//! covid-feed init
//! ```
//!
//! The manual source URL and the storage URL can also be supplied through the
//! `MANUAL_DATA_SOURCE_URL` and `REDIS_URL` environment variables, which is how the
//! tool is normally wired up when run from a scheduler.
//!
//! # Exit Status
//!
//! The process exits non-zero when the primary source cannot be fetched, when the
//! merged dataset fails validation, or when publication fails. A publication failure
//! still leaves one `<locale>.json` fallback artifact per locale on local disk.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use covid_feed::Result;

mod commands;

use crate::commands::{InitArgs, RunArgs, init_config, run_pipeline};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "covid-feed", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: FeedSubcommand,
}

#[derive(Subcommand, Debug)]
enum FeedSubcommand {
    /// Fetch all sources, reconcile, enrich, validate, and publish
    Run(Box<RunArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        FeedSubcommand::Run(run_args) => run_pipeline(run_args).await,
        FeedSubcommand::Init(init_args) => init_config(init_args),
    }
}
