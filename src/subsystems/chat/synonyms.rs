//! Fixed alias → canonical phrase table applied before lookup.

/// One alternate phrasing and the knowledge title it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymRule {
    pub alias: &'static str,
    pub canonical: &'static str,
}

pub const SYNONYMS: &[SynonymRule] = &[
    SynonymRule { alias: "cybersecurity service", canonical: "cybersecurity services" },
    SynonymRule { alias: "infrastructure service", canonical: "infrastructure services" },
    SynonymRule { alias: "data analytic", canonical: "data analytics" },
    SynonymRule { alias: "oracle financial", canonical: "oracle financials" },
    SynonymRule { alias: "rpa service", canonical: "rpa services" },
    SynonymRule { alias: "mobile app development", canonical: "mobile development" },
    SynonymRule { alias: "web app development", canonical: "web development" },
];

/// Replace `message` with its canonical phrase when it equals an alias
/// (case-insensitive, whole string). Applied once; the result is never
/// looked up again.
pub fn canonicalize(message: &str) -> &str {
    SYNONYMS
        .iter()
        .find(|rule| rule.alias.eq_ignore_ascii_case(message))
        .map(|rule| rule.canonical)
        .unwrap_or(message)
}
