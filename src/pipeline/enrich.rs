use crate::model::{Densities, MergedDataset, SeverityBuckets};
use std::collections::HashMap;

/// Bucket breakpoints for the confirmed, recovered, and active densities.
const CASE_BREAKPOINTS: [f64; 4] = [10.0, 100.0, 200.0, 300.0];

/// Bucket breakpoints for the deaths density; tighter because deaths are a
/// smaller-magnitude signal.
const DEATH_BREAKPOINTS: [f64; 4] = [5.0, 10.0, 50.0, 100.0];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Discretize a density into its severity bucket.
///
/// Exactly 0 maps to 0; below the first breakpoint maps to 0.2; the three
/// middle bands map to 0.4/0.6/0.8; at or above the top breakpoint maps
/// to 1.0. Map consumers render color intensity directly off these values,
/// so the boundaries are load-bearing.
fn bucket(value: f64, breakpoints: [f64; 4]) -> f64 {
    if value == 0.0 {
        0.0
    } else if value < breakpoints[0] {
        0.2
    } else if value < breakpoints[1] {
        0.4
    } else if value < breakpoints[2] {
        0.6
    } else if value < breakpoints[3] {
        0.8
    } else {
        1.0
    }
}

/// Join the merged dataset with population figures and derive the four
/// density metrics and their severity buckets.
///
/// Population figures are expressed in thousands (the UN estimate convention
/// the population sheet follows), which is what makes `x * 100 / population`
/// a per-100k figure.
///
/// Codes without a usable population entry (absent or zero) are left
/// untouched; their `population`, `densities`, and `severity` stay `None`.
#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
pub fn enrich(dataset: &mut MergedDataset, population_by_code: &HashMap<String, u64>) {
    for (code, record) in dataset.iter_mut() {
        let Some(&population) = population_by_code.get(code) else {
            continue;
        };
        if population == 0 {
            continue;
        }

        record.population = Some(population);

        let confirmed_per_100k = round2(record.confirmed as f64 * 100.0 / population as f64);

        let (deaths_per_1000_confirmed, recovered_per_1000_confirmed) = if record.confirmed > 0 {
            (
                round2(record.deaths as f64 * 1000.0 / record.confirmed as f64),
                // intentionally coarser than the other three ratios
                (record.recovered as f64 * 1000.0 / record.confirmed as f64).round(),
            )
        } else {
            (0.0, 0.0)
        };

        let active_per_100k = if record.active > 0 {
            round2(record.active as f64 * 100.0 / population as f64)
        } else {
            0.0
        };

        record.densities = Some(Densities {
            confirmed_per_100k,
            deaths_per_1000_confirmed,
            recovered_per_1000_confirmed,
            active_per_100k,
        });

        record.severity = Some(SeverityBuckets {
            confirmed: bucket(confirmed_per_100k, CASE_BREAKPOINTS),
            recovered: bucket(recovered_per_1000_confirmed, CASE_BREAKPOINTS),
            deaths: bucket(deaths_per_1000_confirmed, DEATH_BREAKPOINTS),
            active: bucket(active_per_100k, CASE_BREAKPOINTS),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribution, CountryRecord};
    use std::collections::BTreeMap;

    fn dataset_with(code: &str, confirmed: u64, deaths: u64, recovered: u64) -> MergedDataset {
        let record = CountryRecord {
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
        };
        MergedDataset::from([(code.to_string(), record)])
    }

    fn population(code: &str, count: u64) -> HashMap<String, u64> {
        HashMap::from([(code.to_string(), count)])
    }

    #[test]
    fn bucket_boundaries_are_exact() {
        assert_eq!(bucket(0.0, CASE_BREAKPOINTS), 0.0);
        assert_eq!(bucket(9.99, CASE_BREAKPOINTS), 0.2);
        assert_eq!(bucket(10.0, CASE_BREAKPOINTS), 0.4);
        assert_eq!(bucket(100.0, CASE_BREAKPOINTS), 0.6);
        assert_eq!(bucket(200.0, CASE_BREAKPOINTS), 0.8);
        assert_eq!(bucket(299.99, CASE_BREAKPOINTS), 0.8);
        assert_eq!(bucket(300.0, CASE_BREAKPOINTS), 1.0);

        assert_eq!(bucket(4.99, DEATH_BREAKPOINTS), 0.2);
        assert_eq!(bucket(5.0, DEATH_BREAKPOINTS), 0.4);
        assert_eq!(bucket(10.0, DEATH_BREAKPOINTS), 0.6);
        assert_eq!(bucket(50.0, DEATH_BREAKPOINTS), 0.8);
        assert_eq!(bucket(100.0, DEATH_BREAKPOINTS), 1.0);
    }

    #[test]
    fn densities_follow_the_population_join() {
        let mut dataset = dataset_with("AAA", 12, 1, 5);
        // 1000 thousand = a country of one million people
        enrich(&mut dataset, &population("AAA", 1000));

        let record = dataset.get("AAA").unwrap();
        assert_eq!(record.population, Some(1000));

        let densities = record.densities.unwrap();
        assert_eq!(densities.confirmed_per_100k, 1.2);
        assert_eq!(densities.deaths_per_1000_confirmed, 83.33);
        // recovered density is rounded to a whole number
        assert_eq!(densities.recovered_per_1000_confirmed, 417.0);
        assert_eq!(densities.active_per_100k, 0.6);

        let severity = record.severity.unwrap();
        assert_eq!(severity.confirmed, 0.2);
        assert_eq!(severity.deaths, 0.8);
        assert_eq!(severity.recovered, 1.0);
        assert_eq!(severity.active, 0.2);
    }

    #[test]
    fn zero_confirmed_yields_zero_ratio_densities() {
        let mut dataset = dataset_with("AAA", 0, 0, 0);
        enrich(&mut dataset, &population("AAA", 500_000));

        let densities = dataset.get("AAA").unwrap().densities.unwrap();
        assert_eq!(densities.confirmed_per_100k, 0.0);
        assert_eq!(densities.deaths_per_1000_confirmed, 0.0);
        assert_eq!(densities.recovered_per_1000_confirmed, 0.0);
        assert_eq!(densities.active_per_100k, 0.0);

        let severity = dataset.get("AAA").unwrap().severity.unwrap();
        assert_eq!(severity.confirmed, 0.0);
        assert_eq!(severity.active, 0.0);
    }

    #[test]
    fn missing_or_zero_population_leaves_the_record_alone() {
        let mut dataset = dataset_with("AAA", 10, 0, 0);
        enrich(&mut dataset, &HashMap::new());
        assert!(dataset.get("AAA").unwrap().densities.is_none());

        enrich(&mut dataset, &population("AAA", 0));
        let record = dataset.get("AAA").unwrap();
        assert!(record.population.is_none());
        assert!(record.densities.is_none());
        assert!(record.severity.is_none());
    }
}
