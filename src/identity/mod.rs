//! Country identity resolution.
//!
//! Every source spells country names its own way, so raw names are first
//! rewritten through a static [`AliasTable`] and only then looked up in the
//! [`CountryRegistry`] built from the canonical reference table. The two maps
//! are deliberately separate: new aliases can be added without touching the
//! authoritative code list, and several raw spellings safely collapse onto one
//! canonical name before the second lookup.
//!
//! Both tables are loaded once per run and injected into the [`Normalizer`];
//! nothing in this module reaches for ambient state, which is what lets tests
//! run against small synthetic tables.

mod aliases;
mod normalizer;
mod registry;

pub use aliases::AliasTable;
pub use normalizer::Normalizer;
pub use registry::CountryRegistry;
