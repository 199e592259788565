use crate::Result;
use crate::model::Attribution;
use crate::sources::{RawCaseRow, RawCount, fetch_text, http_client};
use core::time::Duration;
use std::collections::BTreeMap;

/// Log target for the manual source provider
const LOG_TARGET: &str = "    manual";

/// Column layout of the manually-curated spreadsheet:
/// Country Title, Confirmed, Deaths, Recovered, Source (ru), Latest Update, Source (en)
const NAME_COLUMN: usize = 0;
const CONFIRMED_COLUMN: usize = 1;
const DEATHS_COLUMN: usize = 2;
const RECOVERED_COLUMN: usize = 3;
const SOURCE_RU_COLUMN: usize = 4;
const UPDATE_COLUMN: usize = 5;
const SOURCE_EN_COLUMN: usize = 6;

/// The human-curated spreadsheet, published as CSV. Entries here exist
/// specifically to correct known-bad automated data, which is why the merge
/// engine lets them overwrite everything else.
///
/// The source URL is optional; without one the provider yields nothing.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    url: Option<String>,
}

impl Provider {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url,
        })
    }

    pub async fn fetch(&self) -> Result<Vec<RawCaseRow>> {
        let Some(url) = &self.url else {
            log::warn!(target: LOG_TARGET, "! No manual data source provided");
            return Ok(Vec::new());
        };

        let text = fetch_text(&self.client, url, "the manual data source").await?;
        Ok(parse_sheet(&text))
    }
}

/// Parse the spreadsheet CSV into raw rows.
///
/// The per-locale attribution strings are preserved verbatim in a localized
/// attribution so each published locale can render its own. Malformed rows
/// are skipped rather than failing the whole sheet.
#[must_use]
pub fn parse_sheet(text: &str) -> Vec<RawCaseRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping malformed manual data row: {e}");
                continue;
            }
        };

        let Some(name) = record.get(NAME_COLUMN) else {
            continue;
        };

        let cell = |idx: usize| record.get(idx).unwrap_or("");

        rows.push(RawCaseRow {
            name: name.to_string(),
            confirmed: RawCount::from(cell(CONFIRMED_COLUMN)),
            deaths: RawCount::from(cell(DEATHS_COLUMN)),
            recovered: RawCount::from(cell(RECOVERED_COLUMN)),
            latest_update: record.get(UPDATE_COLUMN).map(ToString::to_string),
            source: Attribution::Localized(BTreeMap::from([
                ("ru".to_string(), cell(SOURCE_RU_COLUMN).to_string()),
                ("en".to_string(), cell(SOURCE_EN_COLUMN).to_string()),
            ])),
        });
    }

    rows
}
