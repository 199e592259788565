use crate::Result;
use crate::sources::{RawCount, fetch_text, http_client};
use core::time::Duration;

/// Log target for the population provider
const LOG_TARGET: &str = "population";

/// Population estimates keyed by country name, `name,population` CSV.
/// Figures are in thousands, following the UN estimate convention.
///
/// Names are raw spellings; the caller routes them through the identity
/// normalizer to key the figures by canonical code.
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

    pub async fn fetch(&self) -> Result<Vec<(String, RawCount)>> {
        let text = fetch_text(&self.client, &self.url, "population data").await?;
        Ok(parse_population(&text))
    }
}

/// Parse the population CSV into `(raw name, figure)` pairs.
///
/// The sheet has no reliable header row; rows whose name fails identity
/// resolution later (including a header, if present) are simply unmatched.
#[must_use]
pub fn parse_population(text: &str) -> Vec<(String, RawCount)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping malformed population row: {e}");
                continue;
            }
        };

        let Some(name) = record.get(0) else {
            continue;
        };

        pairs.push((name.to_string(), RawCount::from(record.get(1).unwrap_or(""))));
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_figure_pairs() {
        let pairs = parse_population("China,\"1,439,324\"\nItaly,60461\n");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("China".to_string(), RawCount::from("1,439,324")));
        assert_eq!(pairs[1], ("Italy".to_string(), RawCount::from("60461")));
    }

    #[test]
    fn blank_figures_are_preserved_for_the_permissive_parser() {
        let pairs = parse_population("Nowhere,\n");
        assert_eq!(pairs[0].1, RawCount::from(""));
    }
}
