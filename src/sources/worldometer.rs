use crate::Result;
use crate::model::Attribution;
use crate::sources::{RawCaseRow, RawCount, fetch_text, http_client};
use chrono::{DateTime, Utc};
use core::time::Duration;
use regex::Regex;
use std::sync::LazyLock;

/// Log target for the Worldometer provider
const LOG_TARGET: &str = "worldometr";

/// Attribution label for the scraped table.
pub const SOURCE_LABEL: &str = "Worldometer";

/// The id of the countries table on the Worldometer page.
const TABLE_MARKER: &str = "main_table_countries_today";

static TBODY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<tbody[^>]*>(.*?)</tbody>").expect("invalid regex"));
static ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("invalid regex"));
static CELL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").expect("invalid regex"));
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("invalid regex"));

/// Tertiary source: the country table scraped from the Worldometer page.
///
/// Least structurally reliable of the four feeds; the merge engine only
/// admits it for codes the better sources missed (plus a fixed override
/// list). Extraction is best effort — robustness against page redesigns is
/// out of scope.
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

    pub async fn fetch(&self) -> Result<Vec<RawCaseRow>> {
        let text = fetch_text(&self.client, &self.url, "the Worldometer page").await?;
        Ok(parse_table(&text, Utc::now()))
    }
}

/// Extract the per-country rows from the page HTML.
///
/// The page carries no per-country timestamps, so every row gets the run's
/// own `fetched_at` as its latest update.
#[must_use]
pub fn parse_table(html: &str, fetched_at: DateTime<Utc>) -> Vec<RawCaseRow> {
    let Some(start) = html.find(TABLE_MARKER) else {
        log::warn!(target: LOG_TARGET, "! Countries table not found on the Worldometer page");
        return Vec::new();
    };

    let table = &html[start..];
    let table = table.find("</table>").map_or(table, |end| &table[..end]);

    let Some(tbody) = TBODY_REGEX.captures(table).and_then(|c| c.get(1)) else {
        log::warn!(target: LOG_TARGET, "! Countries table has no body rows");
        return Vec::new();
    };

    let timestamp = fetched_at.format("%Y/%m/%d, %H:%M:%S").to_string();
    let mut rows = Vec::new();

    for row in ROW_REGEX.captures_iter(tbody.as_str()) {
        let Some(cells) = row.get(1) else { continue };
        let cells: Vec<String> = CELL_REGEX
            .captures_iter(cells.as_str())
            .filter_map(|c| c.get(1))
            .map(|cell| TAG_REGEX.replace_all(cell.as_str(), "").trim().to_string())
            .collect();

        // name, confirmed, and the death/recovered columns must all be present
        if cells.len() < 7 {
            continue;
        }

        rows.push(RawCaseRow {
            name: cells[1].clone(),
            confirmed: RawCount::from(cells[2].clone()),
            deaths: RawCount::from(cells[4].clone()),
            recovered: RawCount::from(cells[6].clone()),
            latest_update: Some(timestamp.clone()),
            source: Attribution::plain(SOURCE_LABEL),
        });
    }

    rows
}
