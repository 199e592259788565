//! Fetchers for the four case-count sources plus the reference, population,
//! and geometry collaborators.
//!
//! Each provider owns its HTTP client and returns a flat sequence of
//! [`RawCaseRow`] values; payload parsing is kept in pure functions so it can
//! be exercised without the network. Providers report failure through the
//! crate's normal `Result`; whether a failure is fatal is the run command's
//! call — the primary source is, the rest degrade to an empty sequence.

pub mod arcgis;
pub mod daily_report;
pub mod manual;
pub mod population;
pub mod reference;
pub mod worldometer;

use crate::model::Attribution;
use core::time::Duration;
use ohno::IntoAppError;

/// A count as it arrived from a source: ArcGIS hands over native integers,
/// the CSV and scraped sources hand over text like `"1,234"` or `"N/A"`.
/// The record builder's permissive parser turns either into a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCount {
    Int(u64),
    Text(String),
}

impl From<u64> for RawCount {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RawCount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawCount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One row as yielded by a fetch, before identity resolution. Transient:
/// produced by a single fetch and consumed immediately by the record builder.
#[derive(Debug, Clone)]
pub struct RawCaseRow {
    pub name: String,
    pub confirmed: RawCount,
    pub deaths: RawCount,
    pub recovered: RawCount,
    pub latest_update: Option<String>,
    pub source: Attribution,
}

/// Build the HTTP client shared by a provider.
pub(crate) fn http_client(timeout: Duration) -> crate::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("covid-feed")
        .timeout(timeout)
        .build()
        .into_app_err("unable to create HTTP client")
}

/// Fetch a URL and return its body, treating any non-success status as an error.
pub(crate) async fn fetch_text(client: &reqwest::Client, url: &str, what: &str) -> crate::Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .into_app_err_with(|| format!("unable to fetch {what}"))?;

    let status = response.status();
    if !status.is_success() {
        ohno::bail!("fetching {what} returned HTTP {status}");
    }

    response
        .text()
        .await
        .into_app_err_with(|| format!("unable to read {what} response body"))
}
