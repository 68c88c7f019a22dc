//! Label overrides for tokens the recognition model is known to mislabel.

/// Keyed by exact, case-sensitive span text after trimming.
const CORRECTIONS: &[(&str, &str)] = &[
    ("Viper",     "PER"),
    ("Eagle",     "PER"),
    ("Mishra",    "PER"),
    ("Charminar", "LOC"),
];

/// The corrected label for `span`, if the table has one.
pub fn corrected_label(span: &str) -> Option<&'static str> {
    let word = span.trim();
    CORRECTIONS
        .iter()
        .find(|(key, _)| *key == word)
        .map(|(_, label)| *label)
}
