//! Aggregate metadata and bank distributions.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{QuestionBank, TOTAL_QUESTIONS_KEY};

/// Version written when a bank carries no metadata version yet.
pub const DEFAULT_BANK_VERSION: &str = "1.0.0";

/// Tag used in distributions for questions without a readable tag.
const UNKNOWN_TAG: &str = "unknown";

/// Metadata keys recomputed by [`QuestionBank::refresh_metadata`].
pub const VERSION_KEY: &str = "version";
pub const GENERATED_DATE_KEY: &str = "generated_date";
pub const LAST_UPDATED_KEY: &str = "last_updated";
pub const QUESTIONS_BY_CHAPTER_KEY: &str = "questions_by_chapter";
pub const DIFFICULTY_DISTRIBUTION_KEY: &str = "difficulty_distribution";
pub const QUESTION_TYPES_KEY: &str = "question_types";

/// The `metadata` block of the document.
///
/// Kept as written: the validator reads it leniently and reports wrongly
/// typed entries instead of refusing the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(pub Map<String, Value>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Text value of `key`, if present and a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Sets `key`, keeping its position when already present.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Sets `key` only when absent.
    pub fn insert_missing(&mut self, key: &str, value: Value) {
        if !self.0.contains_key(key) {
            self.insert(key, value);
        }
    }
}

/// Question count of a single chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterCount {
    pub chapter_id: u32,
    pub title: String,
    pub questions: usize,
}

/// How questions are spread across chapters, difficulties and types.
///
/// Tags are counted as written in the document, recognized or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BankDistribution {
    pub total: usize,
    pub chapters: Vec<ChapterCount>,
    pub difficulties: BTreeMap<String, usize>,
    pub types: BTreeMap<String, usize>,
}

impl BankDistribution {
    /// Computes the distribution of a bank.
    pub fn from_bank(bank: &QuestionBank) -> Self {
        let mut distribution = Self {
            total: bank.question_count(),
            ..Self::default()
        };

        for chapter in &bank.chapters {
            distribution.chapters.push(ChapterCount {
                chapter_id: chapter.chapter_id,
                title: chapter.chapter_title.clone(),
                questions: chapter.questions.len(),
            });

            for question in &chapter.questions {
                *distribution
                    .difficulties
                    .entry(tag_of(question, "difficulty"))
                    .or_insert(0) += 1;
                *distribution
                    .types
                    .entry(tag_of(question, "type"))
                    .or_insert(0) += 1;
            }
        }

        distribution
    }

    /// Share of `count` in the total, as a percentage.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// Per-chapter counts keyed `chapter_<id>`, in chapter order.
    pub fn by_chapter_key(&self) -> Map<String, Value> {
        self.chapters
            .iter()
            .map(|c| (format!("chapter_{}", c.chapter_id), Value::from(c.questions)))
            .collect()
    }
}

fn tag_of(question: &Value, field: &str) -> String {
    question
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TAG)
        .to_string()
}

impl QuestionBank {
    /// Recomputes `course_info.total_questions` and the metadata block.
    ///
    /// Keeps the existing version and generation date, creating the metadata
    /// block when the document has none. Keys already present keep their
    /// position.
    pub fn refresh_metadata(&mut self, now: NaiveDateTime) -> BankDistribution {
        let distribution = BankDistribution::from_bank(self);
        self.course_info.set_total_questions(distribution.total);

        let metadata = self.metadata.get_or_insert_with(Metadata::default);
        metadata.insert_missing(VERSION_KEY, Value::from(DEFAULT_BANK_VERSION));
        metadata.insert_missing(
            GENERATED_DATE_KEY,
            Value::from(now.format("%Y-%m-%d").to_string()),
        );
        metadata.insert(
            LAST_UPDATED_KEY,
            Value::from(now.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        metadata.insert(TOTAL_QUESTIONS_KEY, Value::from(distribution.total));
        metadata.insert(
            QUESTIONS_BY_CHAPTER_KEY,
            Value::Object(distribution.by_chapter_key()),
        );
        metadata.insert(
            DIFFICULTY_DISTRIBUTION_KEY,
            counts_object(&distribution.difficulties),
        );
        metadata.insert(QUESTION_TYPES_KEY, counts_object(&distribution.types));

        distribution
    }
}

fn counts_object(counts: &BTreeMap<String, usize>) -> Value {
    Value::Object(
        counts
            .iter()
            .map(|(tag, count)| (tag.clone(), Value::from(*count)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Chapter;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(9, 26, 53))
            .expect("valid timestamp")
    }

    fn sample_bank() -> QuestionBank {
        QuestionBank::from_chapters(vec![
            Chapter::new(1, "Dualité")
                .with_question(json!({"id": "a", "type": "qcm", "difficulty": "easy"}))
                .with_question(json!({"id": "b", "type": "qcm", "difficulty": "hard"})),
            Chapter::new(2, "Mesure")
                .with_question(json!({"id": "c", "type": "flashcard", "difficulty": "easy"}))
                .with_question(json!({"id": "d"})),
        ])
    }

    #[test]
    fn test_distribution_counts() {
        let distribution = BankDistribution::from_bank(&sample_bank());

        assert_eq!(distribution.total, 4);
        assert_eq!(distribution.chapters.len(), 2);
        assert_eq!(distribution.chapters[1].questions, 2);
        assert_eq!(distribution.types["qcm"], 2);
        assert_eq!(distribution.types["flashcard"], 1);
        assert_eq!(distribution.types["unknown"], 1);
        assert_eq!(distribution.difficulties["easy"], 2);
        assert!((distribution.percentage(1) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_of_empty_bank() {
        let distribution = BankDistribution::default();
        assert_eq!(distribution.percentage(3), 0.0);
    }

    #[test]
    fn test_refresh_metadata_creates_block() {
        let mut bank = sample_bank();
        bank.course_info.set_total_questions(99);

        bank.refresh_metadata(fixed_now());

        assert_eq!(bank.course_info.declared_total(), Some(4));
        let metadata = bank.metadata.expect("metadata created");
        assert_eq!(metadata.text(VERSION_KEY), Some(DEFAULT_BANK_VERSION));
        assert_eq!(metadata.text(GENERATED_DATE_KEY), Some("2025-03-14"));
        assert_eq!(metadata.text(LAST_UPDATED_KEY), Some("2025-03-14 09:26:53"));
        assert_eq!(metadata.get(TOTAL_QUESTIONS_KEY), Some(&json!(4)));
        assert_eq!(
            metadata.get(QUESTIONS_BY_CHAPTER_KEY),
            Some(&json!({"chapter_1": 2, "chapter_2": 2}))
        );
    }

    #[test]
    fn test_refresh_metadata_keeps_version_and_extra() {
        let mut bank = sample_bank();
        bank.metadata = Some(
            serde_json::from_value(json!({
                "author": "équipe",
                "version": "1.1.0",
                "generated_date": "2024-01-01",
                "total_questions": "beaucoup"
            }))
            .expect("metadata"),
        );

        bank.refresh_metadata(fixed_now());

        let metadata = bank.metadata.expect("metadata kept");
        assert_eq!(metadata.text(VERSION_KEY), Some("1.1.0"));
        assert_eq!(metadata.text(GENERATED_DATE_KEY), Some("2024-01-01"));
        assert_eq!(metadata.get("author"), Some(&json!("équipe")));
        assert_eq!(metadata.get(TOTAL_QUESTIONS_KEY), Some(&json!(4)));
        assert_eq!(metadata.get(QUESTION_TYPES_KEY).expect("types")["qcm"], 2);

        let keys: Vec<&str> = metadata.0.keys().map(String::as_str).collect();
        assert_eq!(&keys[..4], &["author", "version", "generated_date", "total_questions"]);
    }

    #[test]
    fn test_chapter_keys_follow_chapter_order() {
        let chapters = (1..=11).map(|id| Chapter::new(id, format!("Chapitre {}", id))).collect();
        let mut bank = QuestionBank::from_chapters(chapters);
        bank.refresh_metadata(fixed_now());

        let metadata = bank.metadata.expect("metadata");
        let by_chapter = metadata
            .get(QUESTIONS_BY_CHAPTER_KEY)
            .and_then(Value::as_object)
            .expect("by chapter");
        let keys: Vec<&str> = by_chapter.keys().map(String::as_str).collect();
        assert_eq!(keys[1], "chapter_2");
        assert_eq!(keys[10], "chapter_11");
    }
}
