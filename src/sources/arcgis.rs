use crate::Result;
use crate::model::Attribution;
use crate::sources::{RawCaseRow, RawCount, fetch_text, http_client};
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;

/// Log target for the ArcGIS provider
const LOG_TARGET: &str = "    arcgis";

/// Attribution label for both JHU-operated feeds.
pub const SOURCE_LABEL: &str = "JHU CSSE";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    features: Option<Vec<FeatureEntry>>,
}

#[derive(Debug, Deserialize)]
struct FeatureEntry {
    attributes: Attributes,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    #[serde(rename = "Country_Region")]
    country_region: String,

    #[serde(rename = "Confirmed", default)]
    confirmed: Option<i64>,

    #[serde(rename = "Deaths", default)]
    deaths: Option<i64>,

    #[serde(rename = "Recovered", default)]
    recovered: Option<i64>,

    /// Epoch milliseconds.
    #[serde(rename = "Last_Update", default)]
    last_update: Option<i64>,
}

/// Primary source: the CSSE at JHU ArcGIS feature service.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    url: String,
}

impl Provider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    /// Fetch the current per-country figures.
    pub async fn fetch(&self) -> Result<Vec<RawCaseRow>> {
        let text = fetch_text(&self.client, &self.url, "case data from CSSE at JHU ArcGIS").await?;
        parse_features(&text)
    }
}

/// Parse the ArcGIS query response into raw rows.
///
/// A payload without a `features` key is malformed but yields an empty set
/// with a warning; whether that is fatal is the caller's decision.
fn parse_features(text: &str) -> Result<Vec<RawCaseRow>> {
    let payload: QueryResponse = serde_json::from_str(text).into_app_err("unable to parse ArcGIS response")?;

    let Some(features) = payload.features else {
        log::warn!(target: LOG_TARGET, "! Wrong data format from CSSE at JHU ArcGIS");
        return Ok(Vec::new());
    };

    Ok(features
        .into_iter()
        .map(|entry| {
            let attrs = entry.attributes;
            RawCaseRow {
                name: attrs.country_region,
                confirmed: clamp(attrs.confirmed),
                deaths: clamp(attrs.deaths),
                recovered: clamp(attrs.recovered),
                latest_update: attrs
                    .last_update
                    .and_then(chrono::DateTime::from_timestamp_millis)
                    .map(|dt| dt.format("%Y/%m/%d, %H:%M:%S").to_string()),
                source: Attribution::plain(SOURCE_LABEL),
            }
        })
        .collect())
}

/// ArcGIS occasionally serves nulls or negative placeholders in count columns.
fn clamp(value: Option<i64>) -> RawCount {
    #[expect(clippy::cast_sign_loss, reason = "negative values are clamped to 0 first")]
    RawCount::Int(value.unwrap_or(0).max(0) as u64)
}
