use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{EnrichableExt, IntoAppError};
use redis::AsyncCommands;
use std::collections::BTreeMap;
use std::fs;

/// Log target for the store publisher
const LOG_TARGET: &str = "     store";

/// Key prefix for published locale datasets.
const KEY_PREFIX: &str = "covid_data_";

/// Writes the finalized per-locale payloads to the key/value store, with a
/// local-file fallback when the store is unreachable.
///
/// The fallback keeps the run's output obtainable but does not make the run
/// a success: a publish that fell back still reports failure upstream so the
/// scheduler can alert.
#[derive(Debug, Clone)]
pub struct Publisher {
    url: String,
    fallback_dir: Utf8PathBuf,
}

impl Publisher {
    #[must_use]
    pub fn new(url: impl Into<String>, fallback_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            url: url.into(),
            fallback_dir: fallback_dir.into(),
        }
    }

    /// Publish every locale payload, keyed `covid_data_<locale>`.
    ///
    /// All payloads must already be rendered; no partial run state is ever
    /// exposed to the store.
    pub async fn publish(&self, payloads: &BTreeMap<String, String>) -> Result<()> {
        match self.write_to_store(payloads).await {
            Ok(()) => {
                log::info!(target: LOG_TARGET, "Published {} locale datasets", payloads.len());
                Ok(())
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Can not proceed with the store, saving local fallback files: {e}");
                self.write_fallback(payloads)?;
                Err(e.enrich_with(|| {
                    format!("dataset was not published; fallback artifacts written to '{}'", self.fallback_dir)
                }))
            }
        }
    }

    async fn write_to_store(&self, payloads: &BTreeMap<String, String>) -> Result<()> {
        let client = redis::Client::open(self.url.as_str()).into_app_err("invalid storage URL")?;
        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .into_app_err("unable to connect to the storage")?;

        for (locale, payload) in payloads {
            let key = format!("{KEY_PREFIX}{locale}");
            log::info!(target: LOG_TARGET, "Saving '{key}' into the store");
            let () = connection
                .set(&key, payload)
                .await
                .into_app_err_with(|| format!("unable to write '{key}'"))?;
        }

        Ok(())
    }

    /// Write one `<locale>.json` artifact per payload into the fallback
    /// directory.
    fn write_fallback(&self, payloads: &BTreeMap<String, String>) -> Result<()> {
        fs::create_dir_all(&self.fallback_dir)
            .into_app_err_with(|| format!("unable to create fallback directory '{}'", self.fallback_dir))?;

        for (locale, payload) in payloads {
            let path = self.fallback_dir.join(format!("{locale}.json"));
            log::info!(target: LOG_TARGET, "Saving '{path}'");
            fs::write(&path, payload).into_app_err_with(|| format!("unable to write fallback file '{path}'"))?;
        }

        Ok(())
    }

    #[must_use]
    pub fn fallback_path(&self, locale: &str) -> Utf8PathBuf {
        self.fallback_dir.join(format!("{locale}.json"))
    }

    #[must_use]
    pub fn fallback_dir(&self) -> &Utf8Path {
        &self.fallback_dir
    }
}
