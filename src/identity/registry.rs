use std::collections::{BTreeMap, HashMap};

/// The canonical country identity table, built once from the reference source
/// and immutable for the rest of the run.
///
/// Holds two indexes over the same data: code to per-locale titles, and
/// canonical (English) name to code. Codes are unique and every code carries
/// at least one title.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    titles: HashMap<String, BTreeMap<String, String>>,
    codes: HashMap<String, String>,
}

impl CountryRegistry {
    /// Register a country under `code`, keyed in the name index by
    /// `canonical_name`.
    pub fn insert(&mut self, code: &str, canonical_name: &str, titles: BTreeMap<String, String>) {
        let _ = self.titles.insert(code.to_string(), titles);
        let _ = self.codes.insert(canonical_name.to_string(), code.to_string());
    }

    /// Look up the code for a canonical name.
    #[must_use]
    pub fn code_for(&self, canonical_name: &str) -> Option<&str> {
        self.codes.get(canonical_name).map(String::as_str)
    }

    /// The per-locale titles registered for a code.
    #[must_use]
    pub fn titles_for(&self, code: &str) -> Option<&BTreeMap<String, String>> {
        self.titles.get(code)
    }

    /// Whether `code` is a known canonical code.
    #[must_use]
    pub fn contains_code(&self, code: &str) -> bool {
        self.titles.contains_key(code)
    }

    /// Number of registered countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(en: &str, ru: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("en".to_string(), en.to_string()), ("ru".to_string(), ru.to_string())])
    }

    #[test]
    fn lookups_work_both_ways() {
        let mut registry = CountryRegistry::default();
        registry.insert("FRA", "France", titles("France", "Франция"));

        assert_eq!(registry.code_for("France"), Some("FRA"));
        assert!(registry.contains_code("FRA"));
        assert_eq!(registry.titles_for("FRA").unwrap().get("ru").unwrap(), "Франция");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_entries_are_absent() {
        let registry = CountryRegistry::default();
        assert_eq!(registry.code_for("Narnia"), None);
        assert!(!registry.contains_code("NAR"));
        assert!(registry.is_empty());
    }
}
