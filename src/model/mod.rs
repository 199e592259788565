//! Canonical data model shared by every pipeline stage.
//!
//! The unit of work is the [`CountryRecord`]: one reconciled row per country,
//! keyed by its canonical code inside a [`MergedDataset`]. Records start out
//! with bare counters and pick up population, densities, and severity buckets
//! during enrichment.

mod record;

pub use record::{Attribution, CountryRecord, Densities, SeverityBuckets};

use std::collections::BTreeMap;

/// The single source of truth passed between pipeline stages: canonical
/// country code to reconciled record. Built fresh each run.
///
/// A `BTreeMap` keeps iteration order stable so published payloads are
/// deterministic for a given input.
pub type MergedDataset = BTreeMap<String, CountryRecord>;
