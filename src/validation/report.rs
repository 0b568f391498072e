//! Aggregated result of a validation run and its text rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use super::finding::Finding;
use super::schema::{Difficulty, QuestionKind};

/// Everything a validation run found, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Questions that passed structural validation.
    pub total: usize,
    pub by_kind: BTreeMap<QuestionKind, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub duplicate_ids: BTreeSet<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files each finding under errors or warnings, keeping order.
    pub fn extend_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            if finding.is_error() {
                self.errors.push(finding);
            } else {
                self.warnings.push(finding);
            }
        }
    }

    /// Counts one structurally valid question.
    pub fn count_question(&mut self, kind: Option<QuestionKind>, difficulty: Option<Difficulty>) {
        self.total += 1;
        if let Some(kind) = kind {
            *self.by_kind.entry(kind).or_insert(0) += 1;
        }
        if let Some(difficulty) = difficulty {
            *self.by_difficulty.entry(difficulty).or_insert(0) += 1;
        }
    }

    /// The verdict: warnings never fail a run.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Human-readable report, showing at most `limit` errors and `limit`
    /// warnings.
    pub fn render(&self, limit: usize) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "📊 Question Bank Validation");
        let _ = writeln!(out, "===========================");
        let _ = writeln!(out, "Total questions validated: {}", self.total);

        let _ = writeln!(out, "\nBy type:");
        for (kind, count) in self.by_kind.iter().filter(|(_, c)| **c > 0) {
            let _ = writeln!(out, "  {:<15} {}", kind.label(), count);
        }

        let _ = writeln!(out, "\nBy difficulty:");
        for difficulty in Difficulty::ALL {
            let count = self.by_difficulty.get(&difficulty).copied().unwrap_or(0);
            let _ = writeln!(
                out,
                "  {} {:<13} {}",
                difficulty.marker(),
                difficulty.label(),
                count
            );
        }

        render_capped(&mut out, "❌ Errors", &self.errors, limit, "errors");
        render_capped(&mut out, "⚠️  Warnings", &self.warnings, limit, "warnings");

        if !self.duplicate_ids.is_empty() {
            let ids: Vec<&str> = self.duplicate_ids.iter().map(String::as_str).collect();
            let _ = writeln!(out, "\n🔁 Duplicate IDs: {}", ids.join(", "));
        }

        let _ = writeln!(out);
        if self.passed() {
            let _ = writeln!(
                out,
                "✅ Validation passed ({} warnings)",
                self.warnings.len()
            );
        } else {
            let _ = writeln!(
                out,
                "❌ Validation failed: {} errors, {} warnings",
                self.errors.len(),
                self.warnings.len()
            );
        }

        out
    }
}

fn render_capped(out: &mut String, title: &str, findings: &[Finding], limit: usize, noun: &str) {
    if findings.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{} ({}):", title, findings.len());
    for finding in findings.iter().take(limit) {
        let _ = writeln!(out, "  - {}", finding);
    }
    if findings.len() > limit {
        let _ = writeln!(out, "  ... and {} more {}", findings.len() - limit, noun);
    }
}
