//! Structural validation: the base shape every question must satisfy.

use serde_json::{Map, Value};

use crate::utils::json_type_name;

use super::duplicates::{IdIndex, QuestionLocation};
use super::finding::Finding;
use super::schema::{Difficulty, QuestionKind, SchemaRegistry};

/// Placeholder subject for questions without a usable identifier.
pub const NO_ID: &str = "NO_ID";

/// Borrowed view of a question that passed structural validation.
#[derive(Debug, Clone)]
pub struct QuestionHeader<'q> {
    pub id: &'q str,
    /// `None` when the tag is outside the registry.
    pub kind: Option<QuestionKind>,
    /// `None` when the tag is not a recognized level.
    pub difficulty: Option<Difficulty>,
    /// `None` when the prompt field is not a string.
    pub prompt: Option<&'q str>,
    pub location: QuestionLocation,
    pub fields: &'q Map<String, Value>,
}

/// Findings of the structural pass, plus the header when the question may
/// proceed to content and quality checks.
#[derive(Debug, Clone)]
pub struct StructureOutcome<'q> {
    pub findings: Vec<Finding>,
    pub header: Option<QuestionHeader<'q>>,
    /// Set when the question's id is shared with another question.
    pub duplicate_id: Option<String>,
}

impl<'q> StructureOutcome<'q> {
    fn rejected(findings: Vec<Finding>, duplicate_id: Option<String>) -> Self {
        Self {
            findings,
            header: None,
            duplicate_id,
        }
    }
}

/// Checks identifiers, required base fields and enumerated tags.
pub struct StructuralValidator<'a> {
    registry: &'a SchemaRegistry,
    ids: &'a IdIndex,
    min_prompt_length: usize,
}

impl<'a> StructuralValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry, ids: &'a IdIndex, min_prompt_length: usize) -> Self {
        Self {
            registry,
            ids,
            min_prompt_length,
        }
    }

    /// Validates the base shape of one question.
    ///
    /// A missing identifier or a missing required base field ends the checks
    /// for this question. A duplicate identifier, an unknown tag or a short
    /// prompt does not.
    pub fn check<'q>(&self, question: &'q Value, location: QuestionLocation) -> StructureOutcome<'q> {
        let mut findings = Vec::new();

        let Some(fields) = question.as_object() else {
            findings.push(Finding::structural(
                NO_ID,
                format!(
                    "Question at {} must be an object, not '{}'",
                    location,
                    json_type_name(question)
                ),
            ));
            return StructureOutcome::rejected(findings, None);
        };

        let id = match fields.get("id") {
            None => {
                findings.push(Finding::structural(NO_ID, "Missing field: id"));
                return StructureOutcome::rejected(findings, None);
            }
            Some(Value::String(id)) if !id.is_empty() => id.as_str(),
            Some(other) => {
                findings.push(Finding::structural(
                    NO_ID,
                    format!(
                        "Field id at {} must be a non-empty string, not {}",
                        location, other
                    ),
                ));
                return StructureOutcome::rejected(findings, None);
            }
        };

        let duplicate_id = self.check_duplicate(id, location, &mut findings);

        let type_tag = match fields.get("type") {
            Some(value) => value,
            None => {
                findings.push(Finding::structural(id, "Missing field: type"));
                return StructureOutcome::rejected(findings, duplicate_id);
            }
        };
        let kind = type_tag.as_str().and_then(|tag| self.registry.lookup(tag));

        let prompt_field = kind.map_or("question", |k| k.prompt_field());
        let Some(prompt_value) = fields.get(prompt_field) else {
            findings.push(Finding::structural(
                id,
                format!("Missing field: {}", prompt_field),
            ));
            return StructureOutcome::rejected(findings, duplicate_id);
        };

        let Some(difficulty_tag) = fields.get("difficulty") else {
            findings.push(Finding::structural(id, "Missing field: difficulty"));
            return StructureOutcome::rejected(findings, duplicate_id);
        };

        if kind.is_none() {
            findings.push(Finding::structural(
                id,
                format!(
                    "Invalid type: {} (expected one of: {})",
                    tag_display(type_tag),
                    self.registry.recognized_tags().join(", ")
                ),
            ));
        }

        let difficulty = difficulty_tag
            .as_str()
            .and_then(|tag| self.registry.difficulty(tag));
        if difficulty.is_none() {
            findings.push(Finding::structural(
                id,
                format!("Invalid difficulty: {}", tag_display(difficulty_tag)),
            ));
        }

        let prompt = prompt_value.as_str();
        match prompt {
            Some(text) if text.trim().chars().count() < self.min_prompt_length => {
                findings.push(Finding::quality(
                    id,
                    format!("Question too short: '{}'", text),
                ));
            }
            Some(_) => {}
            None => findings.push(Finding::structural(
                id,
                format!(
                    "Field {} must be text, not '{}'",
                    prompt_field,
                    json_type_name(prompt_value)
                ),
            )),
        }

        StructureOutcome {
            findings,
            header: Some(QuestionHeader {
                id,
                kind,
                difficulty,
                prompt,
                location,
                fields,
            }),
            duplicate_id,
        }
    }

    fn check_duplicate(
        &self,
        id: &str,
        location: QuestionLocation,
        findings: &mut Vec<Finding>,
    ) -> Option<String> {
        if !self.ids.is_duplicate(id) {
            return None;
        }

        let others: Vec<String> = self
            .ids
            .occurrences(id)
            .iter()
            .filter(|other| **other != location)
            .map(ToString::to_string)
            .collect();
        findings.push(Finding::structural(
            id,
            format!("Duplicate ID (also at {})", others.join(", ")),
        ));
        Some(id.to_string())
    }
}

/// Tag values are shown bare when they are strings, as JSON otherwise.
fn tag_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
