//! Findings produced by validation checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The question is unusable by the quiz runtime. Fails the run.
    Error,
    /// A content-quality gap. Never affects the verdict.
    Warning,
}

/// Which layer of validation produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    /// Envelope-level: counts, chapter ids, metadata.
    Document,
    /// Base shape every question must satisfy, identifiers, tags.
    Structural,
    /// Kind-specific fields.
    Content,
    /// Completeness of explanation, references, tags and the like.
    Quality,
}

/// A single validation finding about a question or the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Question id, `NO_ID`, or a document location such as `chapter 3`.
    pub subject: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(
        category: FindingCategory,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            category,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(
        category: FindingCategory,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            category,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// A structural error.
    pub fn structural(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(FindingCategory::Structural, subject, message)
    }

    /// A content error.
    pub fn content(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(FindingCategory::Content, subject, message)
    }

    /// A quality warning.
    pub fn quality(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::warning(FindingCategory::Quality, subject, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.subject, self.message)
    }
}
