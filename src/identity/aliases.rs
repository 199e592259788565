use std::collections::HashMap;

/// The builtin alias list: raw spelling to canonical name, many-to-one.
///
/// The empty-string entry is deliberate: blank rows in the manual spreadsheet
/// pass through unchanged instead of aliasing to something else.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Iran (Islamic Republic of)", "Iran"),
    ("US", "United States of America"),
    ("USA", "United States of America"),
    ("UK", "United Kingdom"),
    ("Republic of Moldova", "Moldova"),
    ("Mainland China", "China"),
    ("Viet Nam", "Vietnam"),
    ("Macao SAR", "Macau S.A.R"),
    ("Macao", "Macau S.A.R"),
    ("China, Macao SAR", "Macau S.A.R"),
    ("Russian Federation", "Russia"),
    ("China, Hong Kong SAR", "Hong Kong S.A.R."),
    ("Hong Kong SAR", "Hong Kong S.A.R."),
    ("Hong Kong", "Hong Kong S.A.R."),
    ("Holy See", "Vatican (Holy See)"),
    ("Vatican (Holy Sea)", "Vatican (Holy See)"),
    ("Vatican City", "Vatican (Holy See)"),
    ("occupied Palestinian territory", "The Palestinian Territories"),
    ("Palestine", "The Palestinian Territories"),
    ("West Bank and Gaza", "The Palestinian Territories"),
    ("State of Palestine", "The Palestinian Territories"),
    ("Republic of Korea", "Korea, South"),
    ("S. Korea", "Korea, South"),
    ("Czechia", "Czech Republic"),
    ("Taiwan*", "Taiwan"),
    ("China, Taiwan Province of China", "Taiwan"),
    ("Cote d'Ivoire", "Ivory Coast (Côte d'Ivoire)"),
    ("Côte d'Ivoire", "Ivory Coast (Côte d'Ivoire)"),
    ("Ivory Coast", "Ivory Coast (Côte d'Ivoire)"),
    ("UAE", "United Arab Emirates"),
    ("Faeroe Islands", "Faroe Islands"),
    ("St. Vincent Grenadines", "Saint Vincent and the Grenadines"),
    ("CAR", "Central African Republic"),
    ("St. Barth", "St. Barths"),
    ("Saint Barthélemy", "St. Barths"),
    ("DRC", "Democratic Republic of the Congo"),
    ("Congo (Kinshasa)", "Democratic Republic of the Congo"),
    ("Kyrgyzstan", "Kyrgyz Republic"),
    ("Diamond Princess", "Diamond Princess (Cruise Ship)"),
    ("MS Zaandam", "MS Zaandam (Cruise Ship)"),
    ("Cruise Ship", "Diamond Princess (Cruise Ship)"),
    ("Cabo Verde", "Cape Verde"),
    ("East Timor", "Timor-Leste"),
    ("Congo (Brazzaville)", "Congo"),
    ("Curacao", "Curaçao"),
    ("Burma", "Myanmar"),
    ("United Republic of Tanzania", "Tanzania"),
    ("Venezuela (Bolivarian Republic of)", "Venezuela"),
    ("Dem. People's Republic of Korea", "North Korea"),
    ("Bolivia (Plurinational State of)", "Bolivia"),
    ("United States Virgin Islands", "U.S. Virgin Islands"),
    ("Lao People's Democratic Republic", "Laos"),
    ("Brunei Darussalam", "Brunei"),
    ("Saint Martin (French part)", "Saint Martin"),
    ("Syrian Arab Republic", "Syria"),
    ("", ""),
];

/// Static many-to-one rewrite table applied to raw country names before the
/// canonical lookup. Immutable after construction.
#[derive(Debug, Clone)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// The alias table shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    /// Build a table from explicit pairs. Mostly useful for tests.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            map: pairs
                .into_iter()
                .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
                .collect(),
        }
    }

    /// Rewrite a raw name to its canonical spelling; unmapped names pass
    /// through unchanged.
    #[must_use]
    pub fn resolve<'a>(&'a self, raw_name: &'a str) -> &'a str {
        self.map.get(raw_name).map_or(raw_name, String::as_str)
    }

    /// Iterate over all `(raw, canonical)` pairs in the table.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(raw, canonical)| (raw.as_str(), canonical.as_str()))
    }
}
