use crate::Result;
use crate::model::Attribution;
use crate::sources::arcgis::SOURCE_LABEL;
use crate::sources::{RawCaseRow, RawCount, fetch_text, http_client};
use chrono::{DateTime, TimeDelta, Utc};
use core::time::Duration;

/// Log target for the daily report provider
const LOG_TARGET: &str = "dailyreprt";

/// Column layout of the CSSE daily report CSV.
const NAME_COLUMN: usize = 3;
const UPDATE_COLUMN: usize = 4;
const CONFIRMED_COLUMN: usize = 7;
const DEATHS_COLUMN: usize = 8;
const RECOVERED_COLUMN: usize = 9;

/// Secondary source: the CSSE at JHU daily report CSV from the COVID-19
/// git repository. The repo is updated once a day, so the run always asks
/// for yesterday's file.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    url_template: String,
}

impl Provider {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url_template: url_template.into(),
        })
    }

    pub async fn fetch(&self) -> Result<Vec<RawCaseRow>> {
        let url = report_url(&self.url_template, Utc::now());
        log::debug!(target: LOG_TARGET, "Fetching daily report from '{url}'");

        let text = fetch_text(&self.client, &url, "the CSSE daily report").await?;
        parse_report(&text)
    }
}

/// Substitute yesterday's UTC date into the URL template.
#[must_use]
pub fn report_url(template: &str, now: DateTime<Utc>) -> String {
    let yesterday = now - TimeDelta::days(1);
    template.replace("{date}", &yesterday.format("%m-%d-%Y").to_string())
}

/// Parse the daily report CSV into raw rows.
///
/// Counts are passed through as text so the record builder's permissive
/// parser can absorb blank or malformed cells. Timestamps in the report use
/// a `T` separator, which is normalized to a space for display.
fn parse_report(text: &str) -> Result<Vec<RawCaseRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping malformed daily report row: {e}");
                continue;
            }
        };

        let Some(name) = record.get(NAME_COLUMN) else {
            continue;
        };

        let cell = |idx: usize| RawCount::from(record.get(idx).unwrap_or(""));

        rows.push(RawCaseRow {
            name: name.to_string(),
            confirmed: cell(CONFIRMED_COLUMN),
            deaths: cell(DEATHS_COLUMN),
            recovered: cell(RECOVERED_COLUMN),
            latest_update: record.get(UPDATE_COLUMN).map(|ts| ts.replace('T', " ")),
            source: Attribution::plain(SOURCE_LABEL),
        });
    }

    Ok(rows)
}
