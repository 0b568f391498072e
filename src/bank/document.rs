//! The question bank document envelope.
//!
//! Chapters are typed. Course information, metadata and individual
//! questions stay raw JSON so that malformed records reach the validator
//! instead of failing the whole load, and are written back with their keys
//! in the original order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::BankError;
use crate::utils::count_value;

use super::metadata::Metadata;

/// Key of the declared question count in `course_info` and `metadata`.
pub const TOTAL_QUESTIONS_KEY: &str = "total_questions";

/// Course-level information at the top of the document.
///
/// Only `total_questions` is interpreted, and only when validating; any
/// value loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseInfo(pub Map<String, Value>);

impl CourseInfo {
    /// The declared question count, as written.
    pub fn total_questions(&self) -> Option<&Value> {
        self.0.get(TOTAL_QUESTIONS_KEY)
    }

    /// Declared question count when it is a non-negative integer.
    pub fn declared_total(&self) -> Option<usize> {
        self.total_questions().and_then(count_value)
    }

    /// Replaces the declared count, keeping the key's position.
    pub fn set_total_questions(&mut self, total: usize) {
        self.0.insert(TOTAL_QUESTIONS_KEY.to_string(), Value::from(total));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A curriculum unit owning an ordered list of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_id: u32,
    #[serde(default)]
    pub chapter_title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(default)]
    pub questions: Vec<Value>,
}

impl Chapter {
    /// Creates an empty chapter.
    pub fn new(chapter_id: u32, chapter_title: impl Into<String>) -> Self {
        Self {
            chapter_id,
            chapter_title: chapter_title.into(),
            extra: Map::new(),
            questions: Vec::new(),
        }
    }

    /// Appends a question record.
    pub fn with_question(mut self, question: Value) -> Self {
        self.questions.push(question);
        self
    }
}

/// The root container: course info, aggregate metadata and chapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub course_info: CourseInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub chapters: Vec<Chapter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuestionBank {
    /// Builds a bank from chapters, with `total_questions` set to the actual count.
    pub fn from_chapters(chapters: Vec<Chapter>) -> Self {
        let mut bank = Self {
            chapters,
            ..Self::default()
        };
        bank.recount();
        bank
    }

    /// Loads a bank from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BankError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let bank = Self::from_json_str(&content).map_err(|source| BankError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        info!(
            path = %path.display(),
            chapters = bank.chapters.len(),
            questions = bank.question_count(),
            "Loaded question bank"
        );
        Ok(bank)
    }

    /// Parses a bank from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Serializes the bank as pretty-printed JSON with two-space indentation.
    pub fn to_json_string(&self) -> Result<String, BankError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the bank to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BankError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(BankError::InvalidDocument(format!(
                    "output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        let json = self.to_json_string()?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved question bank");
        Ok(())
    }

    /// Actual number of questions across all chapters.
    pub fn question_count(&self) -> usize {
        self.chapters.iter().map(|c| c.questions.len()).sum()
    }

    /// Sets `course_info.total_questions` to the actual question count.
    pub fn recount(&mut self) -> usize {
        let total = self.question_count();
        self.course_info.set_total_questions(total);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> &'static str {
        r#"{
  "course_info": {
    "title": "Physique Quantique",
    "total_questions": 2
  },
  "chapters": [
    {
      "chapter_id": 1,
      "chapter_title": "Dualité",
      "chapter_description": "Onde et corpuscule",
      "questions": [
        {"id": "ch1-q001", "type": "qcm"},
        {"id": "ch1-q002", "type": "vrai_faux"}
      ]
    }
  ],
  "schema": "v2"
}"#
    }

    #[test]
    fn test_parse_preserves_unknown_fields() {
        let bank = QuestionBank::from_json_str(sample_json()).expect("should parse");

        assert_eq!(bank.course_info.declared_total(), Some(2));
        assert_eq!(bank.course_info.get("title"), Some(&json!("Physique Quantique")));
        assert_eq!(bank.chapters[0].extra["chapter_description"], json!("Onde et corpuscule"));
        assert_eq!(bank.extra["schema"], json!("v2"));
        assert!(bank.metadata.is_none());
    }

    #[test]
    fn test_chapter_written_with_known_fields_first() {
        let chapter: Chapter = serde_json::from_value(json!({
            "chapter_number": 1,
            "questions": [],
            "chapter_title": "Dualité",
            "chapter_id": 1,
            "chapter_description": "Onde et corpuscule"
        }))
        .expect("chapter");

        let written = serde_json::to_value(&chapter).expect("serialize");
        let keys: Vec<&str> = written
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["chapter_id", "chapter_title", "chapter_number", "chapter_description", "questions"]
        );
    }

    #[test]
    fn test_question_count() {
        let bank = QuestionBank::from_json_str(sample_json()).expect("should parse");
        assert_eq!(bank.question_count(), 2);
        assert_eq!(bank.chapters[0].questions[1]["id"], json!("ch1-q002"));
    }

    #[test]
    fn test_loosely_typed_envelope_loads() {
        let bank = QuestionBank::from_json_str(
            r#"{
  "course_info": {"title": "Physique", "total_questions": "12"},
  "metadata": {"version": 1.1, "difficulty_distribution": {"easy": {"count": 3}}},
  "chapters": []
}"#,
        )
        .expect("should parse");

        assert_eq!(bank.course_info.total_questions(), Some(&json!("12")));
        assert_eq!(bank.course_info.declared_total(), None);
        let metadata = bank.metadata.as_ref().expect("metadata");
        assert_eq!(metadata.get("version"), Some(&json!(1.1)));
    }

    #[test]
    fn test_recount_keeps_key_position() {
        let mut bank = QuestionBank::from_json_str(
            r#"{"course_info": {"title": "Physique", "total_questions": -1, "level": "L3"}, "chapters": []}"#,
        )
        .expect("should parse");
        bank.recount();

        let keys: Vec<&str> = bank.course_info.0.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "total_questions", "level"]);
        assert_eq!(bank.course_info.declared_total(), Some(0));
    }

    #[test]
    fn test_missing_chapters_is_rejected() {
        let result = QuestionBank::from_json_str(r#"{"course_info": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_recount() {
        let mut bank = QuestionBank::from_chapters(vec![
            Chapter::new(1, "A").with_question(json!({"id": "a"})),
            Chapter::new(2, "B")
                .with_question(json!({"id": "b"}))
                .with_question(json!({"id": "c"})),
        ]);
        assert_eq!(bank.course_info.declared_total(), Some(3));

        bank.chapters[1].questions.pop();
        assert_eq!(bank.recount(), 2);
        assert_eq!(bank.course_info.declared_total(), Some(2));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("questions.json");

        let bank = QuestionBank::from_json_str(sample_json()).expect("should parse");
        bank.save(&path).expect("should save");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("Dualité"), "non-ASCII text must stay unescaped");
        assert!(written.contains("\n  \"course_info\""));

        let reloaded = QuestionBank::load(&path).expect("should load");
        assert_eq!(reloaded, bank);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = QuestionBank::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(BankError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let result = QuestionBank::load(&path);
        assert!(matches!(result, Err(BankError::Parse { .. })));
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bank = QuestionBank::default();
        let result = bank.save(dir.path().join("nope").join("questions.json"));
        assert!(matches!(result, Err(BankError::InvalidDocument(_))));
    }
}
