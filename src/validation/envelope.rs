//! Document-level checks: declared counts, chapter ids and metadata entries.

use std::collections::HashMap;

use serde_json::Value;

use crate::bank::{
    Metadata, QuestionBank, DIFFICULTY_DISTRIBUTION_KEY, GENERATED_DATE_KEY, LAST_UPDATED_KEY,
    QUESTIONS_BY_CHAPTER_KEY, QUESTION_TYPES_KEY, TOTAL_QUESTIONS_KEY, VERSION_KEY,
};
use crate::utils::{count_value, json_type_name};

use super::finding::{Finding, FindingCategory};

/// Subject used for findings about the whole document.
pub const DOCUMENT_SUBJECT: &str = "document";

/// Checks the document envelope.
///
/// Duplicate chapter ids are errors since question ownership becomes
/// ambiguous. Count mismatches, out-of-order ids, missing titles, wrongly
/// typed metadata entries and a malformed metadata version are warnings.
pub fn check_envelope(bank: &QuestionBank) -> Vec<Finding> {
    let mut findings = Vec::new();
    let actual = bank.question_count();

    if let Some(declared) = bank.course_info.total_questions() {
        check_declared_total("course_info", declared, actual, &mut findings);
    }

    if let Some(metadata) = &bank.metadata {
        check_metadata(metadata, actual, &mut findings);
    }

    let mut seen: HashMap<u32, usize> = HashMap::new();
    for chapter in &bank.chapters {
        *seen.entry(chapter.chapter_id).or_insert(0) += 1;
    }

    let mut reported = Vec::new();
    for chapter in &bank.chapters {
        let subject = format!("chapter {}", chapter.chapter_id);
        if seen[&chapter.chapter_id] > 1 && !reported.contains(&chapter.chapter_id) {
            reported.push(chapter.chapter_id);
            findings.push(Finding::error(
                FindingCategory::Document,
                subject.clone(),
                format!(
                    "Duplicate chapter_id used by {} chapters",
                    seen[&chapter.chapter_id]
                ),
            ));
        }

        if chapter.chapter_title.trim().is_empty() {
            findings.push(document_warning(subject, "Chapter has no title"));
        }
    }

    let in_sequence = bank
        .chapters
        .iter()
        .enumerate()
        .all(|(i, chapter)| chapter.chapter_id as usize == i + 1);
    if !in_sequence {
        let ids: Vec<String> = bank
            .chapters
            .iter()
            .map(|c| c.chapter_id.to_string())
            .collect();
        findings.push(document_warning(
            DOCUMENT_SUBJECT,
            format!(
                "chapter ids are not the sequence 1..{}: [{}]",
                bank.chapters.len(),
                ids.join(", ")
            ),
        ));
    }

    findings
}

fn check_declared_total(block: &str, declared: &Value, actual: usize, findings: &mut Vec<Finding>) {
    match count_value(declared) {
        Some(count) if count != actual => findings.push(document_warning(
            DOCUMENT_SUBJECT,
            format!(
                "{}.{} is {} but chapters hold {} questions",
                block, TOTAL_QUESTIONS_KEY, count, actual
            ),
        )),
        Some(_) => {}
        None => findings.push(document_warning(
            DOCUMENT_SUBJECT,
            format!(
                "{}.{} must be a non-negative integer, not '{}'",
                block,
                TOTAL_QUESTIONS_KEY,
                json_type_name(declared)
            ),
        )),
    }
}

fn check_metadata(metadata: &Metadata, actual: usize, findings: &mut Vec<Finding>) {
    if let Some(declared) = metadata.get(TOTAL_QUESTIONS_KEY) {
        check_declared_total("metadata", declared, actual, findings);
    }

    for key in [VERSION_KEY, GENERATED_DATE_KEY, LAST_UPDATED_KEY] {
        match metadata.get(key) {
            None | Some(Value::String(_)) => {}
            Some(other) => findings.push(document_warning(
                DOCUMENT_SUBJECT,
                format!("metadata.{} must be text, not '{}'", key, json_type_name(other)),
            )),
        }
    }

    if let Some(version) = metadata.text(VERSION_KEY) {
        if semver::Version::parse(version).is_err() {
            findings.push(document_warning(
                DOCUMENT_SUBJECT,
                format!("metadata.version '{}' is not a semantic version", version),
            ));
        }
    }

    for key in [
        QUESTIONS_BY_CHAPTER_KEY,
        DIFFICULTY_DISTRIBUTION_KEY,
        QUESTION_TYPES_KEY,
    ] {
        let Some(value) = metadata.get(key) else {
            continue;
        };
        let is_counts = value
            .as_object()
            .is_some_and(|counts| counts.values().all(|c| count_value(c).is_some()));
        if !is_counts {
            findings.push(document_warning(
                DOCUMENT_SUBJECT,
                format!("metadata.{} must map names to question counts", key),
            ));
        }
    }
}

fn document_warning(subject: impl Into<String>, message: impl Into<String>) -> Finding {
    Finding::warning(FindingCategory::Document, subject, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Chapter;
    use serde_json::json;

    fn two_chapters() -> QuestionBank {
        QuestionBank::from_chapters(vec![
            Chapter::new(1, "Dualité").with_question(json!({"id": "a"})),
            Chapter::new(2, "Mesure").with_question(json!({"id": "b"})),
        ])
    }

    fn messages(findings: &[Finding]) -> Vec<String> {
        findings.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_consistent_document() {
        assert!(check_envelope(&two_chapters()).is_empty());
    }

    #[test]
    fn test_missing_total_is_not_a_finding() {
        let mut bank = two_chapters();
        bank.course_info.0.remove(TOTAL_QUESTIONS_KEY);
        assert!(check_envelope(&bank).is_empty());
    }

    #[test]
    fn test_total_mismatch() {
        let mut bank = two_chapters();
        bank.course_info.set_total_questions(5);
        bank.metadata = Some(
            serde_json::from_value(json!({"total_questions": 3, "version": "1.1"}))
                .expect("metadata"),
        );

        let findings = check_envelope(&bank);
        assert_eq!(
            messages(&findings),
            vec![
                "[document] course_info.total_questions is 5 but chapters hold 2 questions",
                "[document] metadata.total_questions is 3 but chapters hold 2 questions",
                "[document] metadata.version '1.1' is not a semantic version",
            ]
        );
        assert!(findings.iter().all(|f| !f.is_error()));
    }

    #[test]
    fn test_wrongly_typed_entries_warn() {
        let mut bank = two_chapters();
        bank.course_info.0.insert(TOTAL_QUESTIONS_KEY.to_string(), json!(-1));
        bank.metadata = Some(
            serde_json::from_value(json!({
                "version": 1.1,
                "total_questions": "12",
                "last_updated": "2025-01-01 10:00:00",
                "difficulty_distribution": {"easy": {"count": 3}},
                "question_types": {"qcm": 2}
            }))
            .expect("metadata"),
        );

        let findings = check_envelope(&bank);
        assert_eq!(
            messages(&findings),
            vec![
                "[document] course_info.total_questions must be a non-negative integer, not 'integer'",
                "[document] metadata.total_questions must be a non-negative integer, not 'string'",
                "[document] metadata.version must be text, not 'float'",
                "[document] metadata.difficulty_distribution must map names to question counts",
            ]
        );
        assert!(findings.iter().all(|f| !f.is_error()));
    }

    #[test]
    fn test_duplicate_chapter_id_is_error() {
        let bank = QuestionBank::from_chapters(vec![
            Chapter::new(1, "A"),
            Chapter::new(1, "B"),
            Chapter::new(2, "C"),
        ]);

        let findings = check_envelope(&bank);
        let errors: Vec<_> = findings.iter().filter(|f| f.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[chapter 1] Duplicate chapter_id used by 2 chapters"
        );
        assert!(findings
            .iter()
            .any(|f| f.message.starts_with("chapter ids are not the sequence 1..3")));
    }

    #[test]
    fn test_out_of_order_and_untitled() {
        let bank = QuestionBank::from_chapters(vec![Chapter::new(2, ""), Chapter::new(1, "A")]);

        assert_eq!(
            messages(&check_envelope(&bank)),
            vec![
                "[chapter 2] Chapter has no title",
                "[document] chapter ids are not the sequence 1..2: [2, 1]",
            ]
        );
    }
}
