//! Deterministic pattern rules that supplement the recognition model.

use std::sync::OnceLock;

use regex::Regex;

/// A labelled, case-insensitive regex evaluated over the raw document text.
#[derive(Debug)]
pub struct CustomPattern {
    pub label: &'static str,
    pub regex: Regex,
}

/// Declaration order matters: earlier patterns claim a span first.
const PATTERN_SOURCES: &[(&str, &str)] = &[
    ("WEAPON",   r"(?i)\b(AK-47|RPG|IED)\b"),
    ("CALLSIGN", r"(?i)\b(Bravo Six|Alpha One|Ghost)\b"),
];

pub fn custom_patterns() -> &'static [CustomPattern] {
    static PATTERNS: OnceLock<Vec<CustomPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PATTERN_SOURCES
            .iter()
            .map(|&(label, source)| CustomPattern {
                label,
                regex: Regex::new(source).expect("static entity pattern compiles"),
            })
            .collect()
    })
}
