use crate::identity::{AliasTable, CountryRegistry};

/// Maps any raw country-name spelling to its canonical code.
///
/// Resolution is a two-step affair: the alias table rewrites the raw spelling
/// to a canonical name, then the registry maps that name to a code. A `None`
/// result is an expected, non-fatal condition — sources are maintained
/// independently of the reference table and occasionally introduce new or
/// cruise-ship-style pseudo-country labels. The caller is responsible for
/// logging the unmatched name together with its originating source.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    aliases: &'a AliasTable,
    registry: &'a CountryRegistry,
}

impl<'a> Normalizer<'a> {
    #[must_use]
    pub const fn new(aliases: &'a AliasTable, registry: &'a CountryRegistry) -> Self {
        Self { aliases, registry }
    }

    /// Resolve a raw country name to its canonical code, if the (possibly
    /// alias-rewritten) name is known to the registry.
    #[must_use]
    pub fn normalize(&self, raw_name: &str) -> Option<&'a str> {
        let canonical = self.aliases.resolve(raw_name);
        self.registry.code_for(canonical)
    }

    /// The registry titles for a code resolved through this normalizer.
    #[must_use]
    pub fn registry_titles(&self, code: &str) -> Option<&'a std::collections::BTreeMap<String, String>> {
        self.registry.titles_for(code)
    }
}
