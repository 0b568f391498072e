//! Document-wide identifier index for duplicate detection.
//!
//! Built in a first pass over the whole bank so that every occurrence of a
//! shared id can be reported, not only the ones seen after the first.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::bank::QuestionBank;

/// Where a question sits in the document.
///
/// `chapter_id` is what the document declares and may repeat, so equality
/// relies on `chapter_index` to tell questions apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QuestionLocation {
    /// Zero-based index in the document's chapter list.
    pub chapter_index: usize,
    pub chapter_id: u32,
    /// Zero-based index in the chapter's question list.
    pub position: usize,
}

impl QuestionLocation {
    pub fn new(chapter_index: usize, chapter_id: u32, position: usize) -> Self {
        Self {
            chapter_index,
            chapter_id,
            position,
        }
    }
}

impl fmt::Display for QuestionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chapter {} #{}", self.chapter_id, self.position)
    }
}

/// Every location of every string identifier in a bank.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    occurrences: HashMap<String, Vec<QuestionLocation>>,
}

impl IdIndex {
    /// Indexes all questions carrying a non-empty string `id`.
    pub fn build(bank: &QuestionBank) -> Self {
        let mut occurrences: HashMap<String, Vec<QuestionLocation>> = HashMap::new();
        for (chapter_index, chapter) in bank.chapters.iter().enumerate() {
            for (position, question) in chapter.questions.iter().enumerate() {
                if let Some(id) = question
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                {
                    occurrences.entry(id.to_string()).or_default().push(
                        QuestionLocation::new(chapter_index, chapter.chapter_id, position),
                    );
                }
            }
        }
        Self { occurrences }
    }

    /// All locations of `id`, in document order.
    pub fn occurrences(&self, id: &str) -> &[QuestionLocation] {
        self.occurrences.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_duplicate(&self, id: &str) -> bool {
        self.occurrences(id).len() > 1
    }

    /// Identifiers used more than once, sorted.
    pub fn duplicate_ids(&self) -> BTreeSet<String> {
        self.occurrences
            .iter()
            .filter(|(_, locations)| locations.len() > 1)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}
