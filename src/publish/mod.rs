//! Publication of the finalized dataset.
//!
//! Each configured locale gets one GeoJSON feature array, rendered in full
//! before anything is written so the store never sees a partial run. The
//! [`Publisher`] writes every locale to the key/value store under
//! `covid_data_<locale>`; if the store is unreachable the payloads are
//! written to local fallback files instead and the failure is still
//! reported upstream.

mod features;
mod store;

pub use features::{Feature, build_features};
pub use store::Publisher;
