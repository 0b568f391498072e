//! Detection of placeholder questions left by content generators.

use regex::RegexSet;
use serde_json::Value;

use crate::error::BankError;

/// Matches question prompts against placeholder markers.
///
/// Markers are literal, case-insensitive substrings.
#[derive(Debug, Clone)]
pub struct PlaceholderFilter {
    markers: RegexSet,
}

impl PlaceholderFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, BankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let escaped = patterns
            .into_iter()
            .map(|p| format!("(?i){}", regex::escape(p.as_ref())));
        Ok(Self {
            markers: RegexSet::new(escaped)?,
        })
    }

    /// Number of configured markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn matches_text(&self, text: &str) -> bool {
        self.markers.is_match(text)
    }

    /// True when the question's prompt (`question`, else `front`) contains a
    /// marker. Questions without a text prompt are never placeholders.
    pub fn is_placeholder(&self, question: &Value) -> bool {
        ["question", "front"]
            .iter()
            .find_map(|field| question.get(*field).and_then(Value::as_str))
            .is_some_and(|prompt| self.matches_text(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PLACEHOLDER_PATTERNS;
    use serde_json::json;

    fn default_filter() -> PlaceholderFilter {
        PlaceholderFilter::new(DEFAULT_PLACEHOLDER_PATTERNS).expect("valid patterns")
    }

    #[test]
    fn test_default_markers() {
        let filter = default_filter();
        assert_eq!(filter.len(), DEFAULT_PLACEHOLDER_PATTERNS.len());
        assert!(filter.matches_text("Question à compléter par le professeur"));
        assert!(filter.matches_text("À VALIDER PAR LE PROFESSEUR"));
        assert!(filter.matches_text("todo: write this"));
        assert!(!filter.matches_text("Quelle est l'énergie d'un photon ?"));
    }

    #[test]
    fn test_markers_are_literal() {
        let filter = PlaceholderFilter::new(["[draft]", "a.b"]).expect("valid patterns");
        assert!(filter.matches_text("This is a [draft] question"));
        assert!(!filter.matches_text("This is a d question"));
        assert!(!filter.matches_text("axb"));
    }

    #[test]
    fn test_prompt_field_lookup() {
        let filter = default_filter();
        assert!(filter.is_placeholder(&json!({"question": "FIXME later"})));
        assert!(filter.is_placeholder(&json!({"front": "placeholder card"})));
        assert!(!filter.is_placeholder(&json!({"question": "Une vraie question"})));
        assert!(!filter.is_placeholder(&json!({"explanation": "TODO"})));
        assert!(!filter.is_placeholder(&json!({"question": 42})));
    }
}
