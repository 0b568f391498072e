//! Content-quality checks, independent of the question kind.
//!
//! Everything here is a warning: the question stays usable without it.

use crate::utils::{is_blank, is_positive_number};

use super::finding::Finding;
use super::structure::QuestionHeader;

/// Optional numeric metadata that must be positive when present.
const POSITIVE_FIELDS: [&str; 2] = ["time_estimate", "points"];

/// Checks explanation, section reference, tags and numeric metadata.
pub fn check_quality(header: &QuestionHeader<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let id = header.id;
    let fields = header.fields;

    let expects_explanation = header.kind.map_or(true, |kind| kind.expects_explanation());
    if expects_explanation && is_blank(fields.get("explanation")) {
        findings.push(Finding::quality(id, "No explanation"));
    }

    if is_blank(fields.get("section_ref")) {
        findings.push(Finding::quality(id, "No section reference"));
    }

    if is_blank(fields.get("tags")) {
        findings.push(Finding::quality(id, "No tags"));
    }

    for name in POSITIVE_FIELDS {
        if let Some(value) = fields.get(name).filter(|v| !is_positive_number(v)) {
            findings.push(Finding::quality(
                id,
                format!("{} should be a positive number, got {}", name, value),
            ));
        }
    }

    findings
}
