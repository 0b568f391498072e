//! Load, filter, rewrite: removes placeholder questions and refreshes metadata.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::bank::{BankDistribution, QuestionBank};
use crate::config::MaintenanceSettings;
use crate::error::BankError;

use super::placeholder::PlaceholderFilter;

/// Per-chapter effect of a cleaning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterCleanStats {
    pub chapter_id: u32,
    pub before: usize,
    pub after: usize,
}

impl ChapterCleanStats {
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

/// What a cleaning pass changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSummary {
    pub removed: usize,
    pub flashcard_points_stripped: usize,
    pub total_questions: usize,
    pub chapters: Vec<ChapterCleanStats>,
    pub distribution: BankDistribution,
}

impl CleanSummary {
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.flashcard_points_stripped > 0
    }
}

/// Applies the maintenance settings to a bank.
#[derive(Debug, Clone)]
pub struct BankCleaner {
    filter: PlaceholderFilter,
    strip_flashcard_points: bool,
}

impl BankCleaner {
    pub fn new(filter: PlaceholderFilter) -> Self {
        Self {
            filter,
            strip_flashcard_points: false,
        }
    }

    pub fn from_settings(settings: &MaintenanceSettings) -> Result<Self, BankError> {
        let filter = PlaceholderFilter::new(&settings.placeholder_patterns)?;
        Ok(Self::new(filter).with_strip_flashcard_points(settings.strip_flashcard_points))
    }

    pub fn with_strip_flashcard_points(mut self, strip: bool) -> Self {
        self.strip_flashcard_points = strip;
        self
    }

    /// Removes placeholder questions, optionally strips flashcard points, and
    /// recomputes the counts and metadata with `now` as the update time.
    ///
    /// Metadata is refreshed even when nothing was removed, so a bank with a
    /// stale `total_questions` is repaired by a single pass.
    pub fn clean(&self, bank: &mut QuestionBank, now: NaiveDateTime) -> CleanSummary {
        let mut chapters = Vec::with_capacity(bank.chapters.len());

        for chapter in &mut bank.chapters {
            let before = chapter.questions.len();
            chapter
                .questions
                .retain(|question| !self.filter.is_placeholder(question));
            let after = chapter.questions.len();

            if before != after {
                debug!(
                    chapter_id = chapter.chapter_id,
                    removed = before - after,
                    "Removed placeholder questions"
                );
            }
            chapters.push(ChapterCleanStats {
                chapter_id: chapter.chapter_id,
                before,
                after,
            });
        }

        let flashcard_points_stripped = if self.strip_flashcard_points {
            strip_flashcard_points(bank)
        } else {
            0
        };

        let distribution = bank.refresh_metadata(now);
        let summary = CleanSummary {
            removed: chapters.iter().map(ChapterCleanStats::removed).sum(),
            flashcard_points_stripped,
            total_questions: distribution.total,
            chapters,
            distribution,
        };

        info!(
            removed = summary.removed,
            flashcard_points_stripped = summary.flashcard_points_stripped,
            total = summary.total_questions,
            "Cleaned question bank"
        );
        summary
    }
}

/// Removes `points` from every flashcard. Returns how many were changed.
pub fn strip_flashcard_points(bank: &mut QuestionBank) -> usize {
    let mut stripped = 0;
    for question in bank
        .chapters
        .iter_mut()
        .flat_map(|chapter| chapter.questions.iter_mut())
    {
        let Some(fields) = question.as_object_mut() else {
            continue;
        };
        if fields.get("type").and_then(Value::as_str) == Some("flashcard")
            && fields.remove("points").is_some()
        {
            stripped += 1;
        }
    }
    stripped
}
