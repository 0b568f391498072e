//! Drives validation over a whole question bank.

use serde_json::Value;
use tracing::{debug, info};

use crate::bank::QuestionBank;
use crate::config::ValidationSettings;

use super::content::check_content;
use super::duplicates::{IdIndex, QuestionLocation};
use super::envelope::check_envelope;
use super::finding::Finding;
use super::quality::check_quality;
use super::report::ValidationReport;
use super::schema::{Difficulty, QuestionKind, SchemaRegistry};
use super::structure::StructuralValidator;

/// Result of validating a single question.
#[derive(Debug, Clone, Default)]
pub struct QuestionOutcome {
    /// Structural, content and quality findings, in that order.
    pub findings: Vec<Finding>,
    /// Whether the question counts towards the validated total.
    pub passed_structure: bool,
    pub kind: Option<QuestionKind>,
    pub difficulty: Option<Difficulty>,
    pub duplicate_id: Option<String>,
}

/// Validates question banks against a schema registry.
///
/// The bank is never modified. One malformed question never stops the run;
/// its findings are recorded and the walk moves on.
#[derive(Debug, Clone)]
pub struct QuestionBankValidator {
    registry: SchemaRegistry,
    min_prompt_length: usize,
}

impl Default for QuestionBankValidator {
    fn default() -> Self {
        Self::new(&ValidationSettings::default())
    }
}

impl QuestionBankValidator {
    pub fn new(settings: &ValidationSettings) -> Self {
        Self {
            registry: SchemaRegistry::from_settings(settings),
            min_prompt_length: settings.min_prompt_length,
        }
    }

    /// Uses an explicit registry instead of the one chosen by the settings.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates every question of the bank and aggregates the findings.
    pub fn validate(&self, bank: &QuestionBank) -> ValidationReport {
        let ids = IdIndex::build(bank);
        let mut report = ValidationReport::new();

        report.extend_findings(check_envelope(bank));

        for (chapter_index, chapter) in bank.chapters.iter().enumerate() {
            debug!(
                chapter_id = chapter.chapter_id,
                questions = chapter.questions.len(),
                "Validating chapter"
            );
            for (position, question) in chapter.questions.iter().enumerate() {
                let location = QuestionLocation::new(chapter_index, chapter.chapter_id, position);
                let outcome = self.validate_question(question, location, &ids);

                if outcome.passed_structure {
                    report.count_question(outcome.kind, outcome.difficulty);
                }
                if let Some(id) = outcome.duplicate_id {
                    report.duplicate_ids.insert(id);
                }
                report.extend_findings(outcome.findings);
            }
        }

        info!(
            total = report.total,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            duplicates = report.duplicate_ids.len(),
            "Validation complete"
        );
        report
    }

    /// Validates one question in the context of the bank's identifier index.
    pub fn validate_question(
        &self,
        question: &Value,
        location: QuestionLocation,
        ids: &IdIndex,
    ) -> QuestionOutcome {
        let structural = StructuralValidator::new(&self.registry, ids, self.min_prompt_length);
        let outcome = structural.check(question, location);
        let mut findings = outcome.findings;

        let Some(header) = outcome.header else {
            return QuestionOutcome {
                findings,
                duplicate_id: outcome.duplicate_id,
                ..QuestionOutcome::default()
            };
        };

        findings.extend(check_content(&header));
        findings.extend(check_quality(&header));

        QuestionOutcome {
            findings,
            passed_structure: true,
            kind: header.kind,
            difficulty: header.difficulty,
            duplicate_id: outcome.duplicate_id,
        }
    }
}
