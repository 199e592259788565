//! Tool configuration.
//!
//! Everything is optional: with no file present the tool runs with the
//! builtin endpoints. An explicit `--config` path must exist; the implicit
//! `covid-feed.toml` is only used when it is actually there.

use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Log target for configuration loading
const LOG_TARGET: &str = "    config";

/// The default configuration content, embedded from `default_config.toml`.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Configuration file looked for when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "covid-feed.toml";

fn default_arcgis_url() -> String {
    "https://services1.arcgis.com/0MSEUqKaxRlEPj5g/arcgis/rest/services/ncov_cases/FeatureServer/2/query?f=json&where=1%3D1&returnGeometry=false&spatialRel=esriSpatialRelIntersects&outFields=*&orderByFields=OBJECTID%20ASC&outSR=102100&resultOffset=0&resultRecordCount=250&cacheHint=true&quantizationParameters=%7B%22mode%22%3A%22edit%22%7D".to_string()
}

fn default_daily_report_url() -> String {
    "https://github.com/CSSEGISandData/COVID-19/raw/master/csse_covid_19_data/csse_covid_19_daily_reports/{date}.csv".to_string()
}

fn default_worldometer_url() -> String {
    "https://www.worldometers.info/coronavirus/".to_string()
}

fn default_country_list_url() -> String {
    "https://docs.google.com/spreadsheets/d/e/2PACX-1vQDTcss-EA85HJQrEZF-PinI9uF6qNpBLo-E4O1hJRNFE0xrqD0geF-DqsC1i4x5uG-0GJvxHG8pC67/pub?gid=0&single=true&output=csv".to_string()
}

fn default_population_url() -> String {
    "https://docs.google.com/spreadsheets/d/e/2PACX-1vQH1zxL8a82N_e3RWag6V6X4RkpM6E7gN-o2XKjJ8cN1FWMTGen_lATkvm8kjyNvJayJsqVHz5h3hI_/pub?gid=0&single=true&output=csv".to_string()
}

fn default_geojson_path() -> String {
    "world-map-geo.json".to_string()
}

fn default_storage_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_fallback_dir() -> String {
    ".".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "ru".to_string()]
}

const fn default_fetch_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Primary source: the CSSE at JHU ArcGIS feature query.
    #[serde(default = "default_arcgis_url")]
    pub arcgis_url: String,

    /// Secondary source URL template; `{date}` becomes yesterday's UTC date
    /// in MM-DD-YYYY form.
    #[serde(default = "default_daily_report_url")]
    pub daily_report_url: String,

    /// Tertiary (scraped) source page.
    #[serde(default = "default_worldometer_url")]
    pub worldometer_url: String,

    /// Manually-curated spreadsheet published as CSV; absent means the
    /// manual source yields nothing.
    #[serde(default)]
    pub manual_source_url: Option<String>,

    /// Canonical country reference table (`code,en,ru` CSV).
    #[serde(default = "default_country_list_url")]
    pub country_list_url: String,

    /// Population estimates (`name,population` CSV, figures in thousands).
    #[serde(default = "default_population_url")]
    pub population_url: String,

    /// Local world map GeoJSON file keyed by the `ISO_A3` property.
    #[serde(default = "default_geojson_path")]
    pub geojson_path: String,

    /// Key/value store URL the locale datasets are published to.
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// Directory receiving `<locale>.json` artifacts when the store is
    /// unreachable.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: String,

    /// Locales to publish; each produces a `covid_data_<locale>` key.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Per-request network timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arcgis_url: default_arcgis_url(),
            daily_report_url: default_daily_report_url(),
            worldometer_url: default_worldometer_url(),
            manual_source_url: None,
            country_list_url: default_country_list_url(),
            population_url: default_population_url(),
            geojson_path: default_geojson_path(),
            storage_url: default_storage_url(),
            fallback_dir: default_fallback_dir(),
            locales: default_locales(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the implicit
    /// `covid-feed.toml`, or the builtin defaults, in that order.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(path) = path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("unable to read config file '{path}'"))?;
            let config = toml::from_str(&text).into_app_err_with(|| format!("unable to parse config file '{path}'"))?;
            log::debug!(target: LOG_TARGET, "Loaded configuration from '{path}'");
            return Ok(config);
        }

        let implicit = Utf8Path::new(DEFAULT_CONFIG_FILE);
        if implicit.exists() {
            let text = fs::read_to_string(implicit).into_app_err_with(|| format!("unable to read config file '{implicit}'"))?;
            let config = toml::from_str(&text).into_app_err_with(|| format!("unable to parse config file '{implicit}'"))?;
            log::debug!(target: LOG_TARGET, "Loaded configuration from '{implicit}'");
            return Ok(config);
        }

        log::debug!(target: LOG_TARGET, "No configuration file found, using builtin defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_the_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.locales, vec!["en", "ru"]);
        assert_eq!(config.fetch_timeout_secs, 60);
        assert!(config.manual_source_url.is_none());
        assert!(config.daily_report_url.contains("{date}"));
    }

    #[test]
    fn the_embedded_default_config_parses_to_the_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        let defaults = Config::default();
        assert_eq!(config.arcgis_url, defaults.arcgis_url);
        assert_eq!(config.storage_url, defaults.storage_url);
        assert_eq!(config.locales, defaults.locales);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<Config>("surprise = 1\n").is_err());
    }

    #[test]
    fn overrides_apply() {
        let config: Config = toml::from_str(
            "storage_url = \"redis://cache:6379/\"\nlocales = [\"en\"]\nmanual_source_url = \"https://example.com/sheet.csv\"\n",
        )
        .unwrap();

        assert_eq!(config.storage_url, "redis://cache:6379/");
        assert_eq!(config.locales, vec!["en"]);
        assert_eq!(config.manual_source_url.as_deref(), Some("https://example.com/sheet.csv"));
    }
}
