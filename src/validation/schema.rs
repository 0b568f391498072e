//! Schema registry: recognized question kinds and difficulty levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ValidationSettings;

/// A recognized question kind, identified in documents by its `type` tag.
///
/// Declaration order is the order used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice with a single correct option index.
    Qcm,
    /// True/false.
    VraiFaux,
    /// Left/right pairs to associate.
    Matching,
    /// Numeric answer with optional tolerance and unit.
    Numerical,
    /// Free-form interpretation with key discussion points.
    Interpretation,
    /// Click the correct circular region of an image.
    Hotspot,
    /// Drop items onto zones.
    DragDrop,
    /// Self-assessed front/back card.
    Flashcard,
}

impl QuestionKind {
    /// The canonical kinds every profile recognizes.
    pub const CORE: [QuestionKind; 5] = [
        QuestionKind::Qcm,
        QuestionKind::VraiFaux,
        QuestionKind::Matching,
        QuestionKind::Numerical,
        QuestionKind::Interpretation,
    ];

    /// Kinds produced by the advanced generators.
    pub const EXTENDED: [QuestionKind; 3] = [
        QuestionKind::Hotspot,
        QuestionKind::DragDrop,
        QuestionKind::Flashcard,
    ];

    /// The `type` tag used in documents.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::Qcm => "qcm",
            QuestionKind::VraiFaux => "vrai_faux",
            QuestionKind::Matching => "matching",
            QuestionKind::Numerical => "numerical",
            QuestionKind::Interpretation => "interpretation",
            QuestionKind::Hotspot => "hotspot",
            QuestionKind::DragDrop => "drag_drop",
            QuestionKind::Flashcard => "flashcard",
        }
    }

    /// Display label used in finding messages.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Qcm => "QCM",
            QuestionKind::VraiFaux => "True/False",
            QuestionKind::Matching => "Matching",
            QuestionKind::Numerical => "Numerical",
            QuestionKind::Interpretation => "Interpretation",
            QuestionKind::Hotspot => "Hotspot",
            QuestionKind::DragDrop => "Drag & Drop",
            QuestionKind::Flashcard => "Flashcard",
        }
    }

    /// Parses a `type` tag, regardless of which profile is active.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::CORE
            .iter()
            .chain(Self::EXTENDED.iter())
            .copied()
            .find(|kind| kind.tag() == tag)
    }

    /// Field holding the prompt text.
    pub fn prompt_field(&self) -> &'static str {
        match self {
            QuestionKind::Flashcard => "front",
            _ => "question",
        }
    }

    /// Kind-specific fields that must be present before shape checks run.
    ///
    /// Checked in order; the first missing one ends the kind's checks.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            QuestionKind::Qcm => &["options", "correct_answer"],
            QuestionKind::VraiFaux => &["correct_answer"],
            QuestionKind::Matching => &["pairs"],
            QuestionKind::Numerical => &["correct_answer"],
            QuestionKind::Interpretation => &[],
            QuestionKind::Hotspot => &["hotspots"],
            QuestionKind::DragDrop => &["draggable_items", "drop_zones", "correct_matches"],
            QuestionKind::Flashcard => &["back"],
        }
    }

    /// Whether a missing `explanation` is worth a warning.
    ///
    /// A flashcard's `back` is its explanation.
    pub fn expects_explanation(&self) -> bool {
        !matches!(self, QuestionKind::Flashcard)
    }

    /// Whether this kind belongs to the extended profile only.
    pub fn is_extended(&self) -> bool {
        Self::EXTENDED.contains(self)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Difficulty level of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn tag(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.tag() == tag)
    }

    /// Capitalized label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Report marker for the level.
    pub fn marker(&self) -> &'static str {
        match self {
            Difficulty::Easy => "🟢",
            Difficulty::Medium => "🟡",
            Difficulty::Hard => "🔴",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The set of question kinds a validation run accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    kinds: Vec<QuestionKind>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::extended()
    }
}

impl SchemaRegistry {
    /// Only the five canonical kinds; extended tags are invalid types.
    pub fn core() -> Self {
        Self {
            kinds: QuestionKind::CORE.to_vec(),
        }
    }

    /// Canonical kinds plus hotspot, drag_drop and flashcard.
    pub fn extended() -> Self {
        Self {
            kinds: QuestionKind::CORE
                .iter()
                .chain(QuestionKind::EXTENDED.iter())
                .copied()
                .collect(),
        }
    }

    /// Picks the profile selected by the settings.
    pub fn from_settings(settings: &ValidationSettings) -> Self {
        if settings.extended_types {
            Self::extended()
        } else {
            Self::core()
        }
    }

    /// Resolves a `type` tag to a kind this registry accepts.
    pub fn lookup(&self, tag: &str) -> Option<QuestionKind> {
        QuestionKind::from_tag(tag).filter(|kind| self.kinds.contains(kind))
    }

    /// Resolves a `difficulty` tag.
    pub fn difficulty(&self, tag: &str) -> Option<Difficulty> {
        Difficulty::from_tag(tag)
    }

    /// Accepted kinds in report order.
    pub fn kinds(&self) -> &[QuestionKind] {
        &self.kinds
    }

    /// Accepted `type` tags, for error messages.
    pub fn recognized_tags(&self) -> Vec<&'static str> {
        self.kinds.iter().map(QuestionKind::tag).collect()
    }
}
