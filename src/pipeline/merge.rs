use crate::identity::CountryRegistry;
use crate::model::MergedDataset;

/// Log target for the merge engine
const LOG_TARGET: &str = "     merge";

/// Codes chronically under-reported by the primary and secondary feeds; the
/// scraped tertiary source is allowed to overwrite these even when a record
/// already exists.
pub const TERTIARY_OVERRIDE_CODES: &[&str] = &["SRB", "KGZ", "KAZ", "RUS", "UKR", "MZX", "UZB"];

/// Reconcile the four per-source record sets into one authoritative dataset.
///
/// Precedence is fixed and applied in exactly this order, because each later
/// source's admission rule depends on the state the earlier sources left
/// behind:
///
/// 1. The primary set seeds the dataset wholesale.
/// 2. The secondary set repairs it monotonically: a missing code is inserted;
///    for a present code, each of `confirmed`/`deaths`/`recovered` is raised
///    independently to the secondary value when that value is larger, never
///    lowered. If anything was raised, `latest_update` and `source` switch to
///    the secondary's as well.
/// 3. The tertiary (scraped) set only adds codes that are absent, except for
///    [`TERTIARY_OVERRIDE_CODES`], which it may overwrite. Tertiary codes the
///    registry does not know are dropped with a warning — scraped tables
///    contain non-country aggregate rows.
/// 4. The manual set overwrites unconditionally; manual entries exist to
///    correct known-bad automated data.
#[must_use]
pub fn merge(
    primary: MergedDataset,
    secondary: MergedDataset,
    tertiary: MergedDataset,
    manual: MergedDataset,
    registry: &CountryRegistry,
) -> MergedDataset {
    let mut merged = primary;

    for (code, incoming) in secondary {
        let Some(current) = merged.get_mut(&code) else {
            let _ = merged.insert(code, incoming);
            continue;
        };

        let raised = incoming.confirmed > current.confirmed
            || incoming.deaths > current.deaths
            || incoming.recovered > current.recovered;

        if raised {
            current.confirmed = current.confirmed.max(incoming.confirmed);
            current.deaths = current.deaths.max(incoming.deaths);
            current.recovered = current.recovered.max(incoming.recovered);
            current.active = current
                .confirmed
                .saturating_sub(current.deaths.saturating_add(current.recovered));
            current.latest_update = incoming.latest_update;
            current.source = incoming.source;
        }
    }

    for (code, incoming) in tertiary {
        if merged.contains_key(&code) && !TERTIARY_OVERRIDE_CODES.contains(&code.as_str()) {
            continue;
        }

        if !registry.contains_code(&code) {
            log::warn!(target: LOG_TARGET, "Dropping tertiary row for unknown code '{code}'");
            continue;
        }

        let _ = merged.insert(code, incoming);
    }

    for (code, incoming) in manual {
        let _ = merged.insert(code, incoming);
    }

    merged
}
