//! The reconciliation and enrichment engine.
//!
//! This is the part of the tool with actual decision logic: the record
//! builder normalizes raw rows into typed per-country records, the merge
//! engine reconciles the four per-source record sets under a fixed precedence
//! policy, the enricher joins the result with population figures, and the
//! validator gates publication on a set of sanity invariants.
//!
//! # Implementation Model
//!
//! Stages hand a [`crate::model::MergedDataset`] to one another; each stage
//! owns the dataset while it works on it, and nothing here holds state across
//! runs. The only inputs besides the dataset are the immutable identity
//! tables loaded at startup.

mod builder;
mod enrich;
mod merge;
mod validate;

pub use builder::{RecordBuilder, parse_count};
pub use enrich::enrich;
pub use merge::{TERTIARY_OVERRIDE_CODES, merge};
pub use validate::{ValidationFailure, ZERO_BURDEN_CODES, validate};
