use crate::model::MergedDataset;
use core::fmt;

/// Countries allowed to report no burden at all (or an inconsistent control
/// sum) without invalidating the batch.
pub const ZERO_BURDEN_CODES: &[&str] = &["TKM", "PRK"];

/// A merged dataset below this size signals a broken fetch.
const MIN_RECORD_COUNT: usize = 100;

/// Why a dataset was rejected. One bad record invalidates the whole batch:
/// an internally inconsistent record indicates a merge or source-corruption
/// bug worth halting on rather than silently publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Fewer records than any plausible full fetch produces.
    TooFewRecords { count: usize },

    /// More records than the reference table has codes; impossible without a
    /// data-identity bug.
    TooManyRecords { count: usize, reference: usize },

    /// A non-whitelisted record with every counter at zero.
    EmptyRecord { code: String },

    /// A non-whitelisted record whose deaths + recovered exceed confirmed.
    InconsistentRecord {
        code: String,
        confirmed: u64,
        deaths: u64,
        recovered: u64,
    },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRecords { count } => {
                write!(f, "only {count} records present, at least {} expected", MIN_RECORD_COUNT + 1)
            }
            Self::TooManyRecords { count, reference } => {
                write!(f, "{count} records present but the reference table only has {reference} codes")
            }
            Self::EmptyRecord { code } => {
                write!(f, "record '{code}' has no confirmed cases, deaths, or recoveries")
            }
            Self::InconsistentRecord {
                code,
                confirmed,
                deaths,
                recovered,
            } => {
                write!(
                    f,
                    "record '{code}' is inconsistent: confirmed {confirmed} < deaths {deaths} + recovered {recovered}"
                )
            }
        }
    }
}

impl core::error::Error for ValidationFailure {}

/// Check the merged dataset against the publication invariants.
///
/// All rules must hold; the result gates whether anything at all is
/// published. `reference_code_count` is the size of the canonical identity
/// table loaded at startup.
pub fn validate(dataset: &MergedDataset, reference_code_count: usize) -> Result<(), ValidationFailure> {
    if dataset.len() <= MIN_RECORD_COUNT {
        return Err(ValidationFailure::TooFewRecords { count: dataset.len() });
    }

    if dataset.len() > reference_code_count {
        return Err(ValidationFailure::TooManyRecords {
            count: dataset.len(),
            reference: reference_code_count,
        });
    }

    for (code, record) in dataset {
        if ZERO_BURDEN_CODES.contains(&code.as_str()) {
            continue;
        }

        if record.is_empty() {
            return Err(ValidationFailure::EmptyRecord { code: code.clone() });
        }

        if record.confirmed < record.deaths.saturating_add(record.recovered) {
            return Err(ValidationFailure::InconsistentRecord {
                code: code.clone(),
                confirmed: record.confirmed,
                deaths: record.deaths,
                recovered: record.recovered,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribution, CountryRecord};
    use std::collections::BTreeMap;

    fn record(code: &str, confirmed: u64, deaths: u64, recovered: u64) -> CountryRecord {
        CountryRecord {
            code: code.to_string(),
            titles: BTreeMap::new(),
            confirmed,
            deaths,
            recovered,
            active: confirmed.saturating_sub(deaths + recovered),
            latest_update: None,
            source: Attribution::plain("test"),
            population: None,
            densities: None,
            severity: None,
        }
    }

    /// A dataset of `n` consistent synthetic records.
    fn dataset(n: usize) -> MergedDataset {
        (0..n)
            .map(|i| {
                let code = format!("C{i:03}");
                (code.clone(), record(&code, 10, 1, 2))
            })
            .collect()
    }

    #[test]
    fn accepts_a_healthy_dataset() {
        assert_eq!(validate(&dataset(150), 200), Ok(()));
    }

    #[test]
    fn rejects_too_few_records() {
        assert_eq!(validate(&dataset(100), 200), Err(ValidationFailure::TooFewRecords { count: 100 }));
    }

    #[test]
    fn rejects_more_records_than_the_reference_has() {
        assert_eq!(
            validate(&dataset(150), 140),
            Err(ValidationFailure::TooManyRecords { count: 150, reference: 140 })
        );
    }

    #[test]
    fn rejects_an_inconsistent_control_sum() {
        let mut data = dataset(150);
        let _ = data.insert("BAD".to_string(), record("BAD", 2, 1, 2));

        assert_eq!(
            validate(&data, 200),
            Err(ValidationFailure::InconsistentRecord {
                code: "BAD".to_string(),
                confirmed: 2,
                deaths: 1,
                recovered: 2,
            })
        );
    }

    #[test]
    fn rejects_an_all_zero_record() {
        let mut data = dataset(150);
        let _ = data.insert("NIL".to_string(), record("NIL", 0, 0, 0));

        assert_eq!(validate(&data, 200), Err(ValidationFailure::EmptyRecord { code: "NIL".to_string() }));
    }

    #[test]
    fn zero_burden_whitelist_is_exempt() {
        let mut data = dataset(150);
        let _ = data.insert("TKM".to_string(), record("TKM", 0, 0, 0));
        let _ = data.insert("PRK".to_string(), record("PRK", 2, 1, 2));

        assert_eq!(validate(&data, 200), Ok(()));
    }
}
