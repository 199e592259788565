use crate::Result;
use crate::identity::CountryRegistry;
use crate::sources::{fetch_text, http_client};
use core::time::Duration;
use std::collections::BTreeMap;

/// Log target for the reference table provider
const LOG_TARGET: &str = " reference";

/// The canonical country reference table: one CSV row per country with its
/// code and English and Russian titles. Loaded once before any case fetch;
/// failure here is fatal since nothing downstream can resolve identities
/// without it.
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

    pub async fn fetch(&self) -> Result<CountryRegistry> {
        let text = fetch_text(&self.client, &self.url, "the country reference table").await?;
        let registry = parse_country_list(&text)?;
        log::info!(target: LOG_TARGET, "Loaded {} countries from the reference table", registry.len());
        Ok(registry)
    }
}

/// Parse the reference CSV (`code,en,ru`) into a registry. The English title
/// doubles as the canonical name the alias table resolves toward.
pub fn parse_country_list(text: &str) -> Result<CountryRegistry> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());

    let mut registry = CountryRegistry::default();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Skipping malformed reference row: {e}");
                continue;
            }
        };

        let (Some(code), Some(en)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let ru = record.get(2).unwrap_or(en);

        registry.insert(
            code,
            en,
            BTreeMap::from([("en".to_string(), en.to_string()), ("ru".to_string(), ru.to_string())]),
        );
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_reference_table() {
        let text = "Code,English,Russian\nFRA,France,Франция\nDEU,Germany,Германия\n";
        let registry = parse_country_list(text).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.code_for("France"), Some("FRA"));
        assert_eq!(registry.titles_for("DEU").unwrap().get("ru").unwrap(), "Германия");
    }

    #[test]
    fn missing_russian_title_falls_back_to_english() {
        let registry = parse_country_list("Code,English\nFRA,France\n").unwrap();
        assert_eq!(registry.titles_for("FRA").unwrap().get("ru").unwrap(), "France");
    }
}
