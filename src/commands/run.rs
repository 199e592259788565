//! The `run` subcommand: one full fetch-reconcile-publish cycle.

use crate::commands::common::{self, CommonArgs};
use camino::Utf8Path;
use clap::Parser;
use core::time::Duration;
use covid_feed::Result;
use covid_feed::config::Config;
use covid_feed::geo;
use covid_feed::identity::{AliasTable, Normalizer};
use covid_feed::model::MergedDataset;
use covid_feed::pipeline::{RecordBuilder, enrich, merge, parse_count, validate};
use covid_feed::publish::{Publisher, build_features};
use covid_feed::sources::{self, RawCount};
use ohno::{IntoAppError, bail};
use std::collections::{BTreeMap, HashMap};

/// Log target for the run command
const LOG_TARGET: &str = "       run";

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// URL of the manually-curated source spreadsheet (CSV)
    #[arg(long, value_name = "URL", env = "MANUAL_DATA_SOURCE_URL")]
    pub manual_source_url: Option<String>,

    /// URL of the key/value store to publish to
    #[arg(long, value_name = "URL", env = "REDIS_URL")]
    pub storage_url: Option<String>,

    /// Fetch, reconcile, and validate, but do not publish
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Execute one pipeline cycle end to end.
///
/// The reference table, the world map, the primary source, and validation are
/// fatal; every other source degrades to an empty contribution with a warning
/// so one flaky feed does not take the whole run down.
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    common::init_logging(args.common.log_level);

    let mut config = Config::load(args.common.config.as_deref())?;
    if let Some(url) = &args.manual_source_url {
        config.manual_source_url = Some(url.clone());
    }
    if let Some(url) = &args.storage_url {
        config.storage_url = url.clone();
    }

    let timeout = Duration::from_secs(config.fetch_timeout_secs);

    // Without the reference table or the outlines nothing downstream can be
    // keyed or rendered, so these load before any case data moves.
    let registry = sources::reference::Provider::new(&config.country_list_url, timeout)?
        .fetch()
        .await?;

    let geometries = geo::load_geometries(Utf8Path::new(&config.geojson_path))?;

    let arcgis = sources::arcgis::Provider::new(&config.arcgis_url, timeout)?;
    let daily = sources::daily_report::Provider::new(&config.daily_report_url, timeout)?;
    let worldometer = sources::worldometer::Provider::new(&config.worldometer_url, timeout)?;
    let manual = sources::manual::Provider::new(config.manual_source_url.clone(), timeout)?;
    let population = sources::population::Provider::new(&config.population_url, timeout)?;

    let (primary_rows, secondary_rows, tertiary_rows, manual_rows, population_rows) = tokio::join!(
        arcgis.fetch(),
        daily.fetch(),
        worldometer.fetch(),
        manual.fetch(),
        population.fetch(),
    );

    let primary_rows = primary_rows?;
    if primary_rows.is_empty() {
        bail!("the primary source returned no data; refusing to publish a dataset built without it");
    }

    let secondary_rows = degrade(secondary_rows, "daily report");
    let tertiary_rows = degrade(tertiary_rows, "Worldometer");
    let manual_rows = degrade(manual_rows, "manual source");
    let population_rows = degrade(population_rows, "population estimates");

    let aliases = AliasTable::builtin();
    let normalizer = Normalizer::new(&aliases, &registry);
    let builder = RecordBuilder::new(normalizer);

    let primary = builder.build_set(primary_rows);
    let secondary = builder.build_set(secondary_rows);
    let tertiary = builder.build_set(tertiary_rows);
    let manual_set = builder.build_set(manual_rows);

    let mut dataset = merge(primary, secondary, tertiary, manual_set, &registry);
    log::info!(target: LOG_TARGET, "Merged dataset holds {} countries", dataset.len());

    enrich(&mut dataset, &population_by_code(&population_rows, normalizer));

    validate(&dataset, registry.len()).into_app_err("the merged dataset failed validation")?;

    let payloads = render_payloads(&dataset, &geometries, &config.locales)?;

    if args.dry_run {
        for (locale, payload) in &payloads {
            log::info!(target: LOG_TARGET, "Dry run: would publish {} bytes for '{locale}'", payload.len());
        }
        return Ok(());
    }

    Publisher::new(&config.storage_url, config.fallback_dir.as_str())
        .publish(&payloads)
        .await
}

/// Flatten a degradable fetch result, trading failure for an empty set.
fn degrade<T>(outcome: Result<Vec<T>>, what: &str) -> Vec<T> {
    match outcome {
        Ok(rows) => rows,
        Err(e) => {
            log::warn!(target: LOG_TARGET, "! Continuing without the {what}: {e}");
            Vec::new()
        }
    }
}

/// Resolve the population sheet's country names and index the figures
/// (thousands of people) by canonical code. Unresolvable names are normal
/// here, the sheet covers territories the reference table does not.
fn population_by_code(rows: &[(String, RawCount)], normalizer: Normalizer<'_>) -> HashMap<String, u64> {
    let mut by_code = HashMap::with_capacity(rows.len());
    for (name, count) in rows {
        if let Some(code) = normalizer.normalize(name) {
            let _ = by_code.insert(code.to_string(), parse_count(count));
        }
    }

    by_code
}

/// Render every configured locale up front so publication is all-or-nothing.
fn render_payloads(
    dataset: &MergedDataset,
    geometries: &geo::GeometryTable,
    locales: &[String],
) -> Result<BTreeMap<String, String>> {
    let mut payloads = BTreeMap::new();
    for locale in locales {
        let features = build_features(dataset, geometries, locale);
        log::info!(target: LOG_TARGET, "Rendered {} features for '{locale}'", features.len());
        let payload = serde_json::to_string(&features)
            .into_app_err_with(|| format!("unable to serialize the '{locale}' dataset"))?;
        let _ = payloads.insert(locale.clone(), payload);
    }

    Ok(payloads)
}
