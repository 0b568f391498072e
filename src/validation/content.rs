//! Kind-specific content validation.
//!
//! Each check assumes structural validation passed. Required kind fields are
//! taken from the schema registry and checked first; the first missing one
//! ends the checks for that question since later checks depend on it.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::utils::{integer_value, is_blank, json_type_name};

use super::finding::{Finding, FindingCategory};
use super::schema::QuestionKind;
use super::structure::QuestionHeader;

/// Minimum number of options, pairs or hotspot regions.
const MIN_CHOICES: usize = 2;

static NULL: Value = Value::Null;

/// A field's value, or `null` when absent.
fn field<'q>(fields: &'q Map<String, Value>, name: &str) -> &'q Value {
    fields.get(name).unwrap_or(&NULL)
}

/// Runs the content checks for the question's kind.
///
/// Questions with an unrecognized kind have nothing to check here; the
/// structural pass already reported the tag.
pub fn check_content(header: &QuestionHeader<'_>) -> Vec<Finding> {
    let Some(kind) = header.kind else {
        return Vec::new();
    };
    let id = header.id;
    let fields = header.fields;

    if let Some(missing) = kind
        .required_fields()
        .iter()
        .find(|name| !fields.contains_key(**name))
    {
        return vec![Finding::content(
            id,
            format!("{} without {}", kind.label(), missing),
        )];
    }

    match kind {
        QuestionKind::Qcm => check_qcm(id, fields),
        QuestionKind::VraiFaux => check_vrai_faux(id, fields),
        QuestionKind::Matching => check_matching(id, fields),
        QuestionKind::Numerical => check_numerical(id, fields),
        QuestionKind::Interpretation => check_interpretation(id, fields),
        QuestionKind::Hotspot => check_hotspot(id, fields),
        QuestionKind::DragDrop => check_drag_drop(id, fields),
        QuestionKind::Flashcard => check_flashcard(id, fields),
    }
}

fn check_qcm(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(options) = field(fields, "options").as_array() else {
        findings.push(Finding::content(
            id,
            format!(
                "QCM options must be a list, not '{}'",
                json_type_name(field(fields, "options"))
            ),
        ));
        return findings;
    };

    if options.len() < MIN_CHOICES {
        findings.push(Finding::content(id, "QCM with fewer than 2 options"));
    }

    for (i, option) in options.iter().enumerate() {
        if !option.is_string() {
            findings.push(Finding::content(
                id,
                format!("QCM option {} must be text, not '{}'", i, json_type_name(option)),
            ));
        }
    }

    let correct = field(fields, "correct_answer");
    match integer_value(correct) {
        None => findings.push(Finding::content(
            id,
            format!(
                "correct_answer must be an integer (index), not '{}'",
                json_type_name(correct)
            ),
        )),
        Some(index) if index < 0 || index >= options.len() as i128 => {
            findings.push(Finding::content(
                id,
                format!(
                    "correct_answer index {} invalid (options: {})",
                    index,
                    options.len()
                ),
            ));
        }
        Some(_) => {}
    }

    findings
}

fn check_vrai_faux(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let correct = field(fields, "correct_answer");
    if correct.is_boolean() {
        return Vec::new();
    }
    vec![Finding::content(
        id,
        format!(
            "True/False: correct_answer must be boolean, not '{}'",
            json_type_name(correct)
        ),
    )]
}

fn check_matching(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(pairs) = field(fields, "pairs").as_array() else {
        findings.push(Finding::content(
            id,
            format!(
                "Matching pairs must be a list, not '{}'",
                json_type_name(field(fields, "pairs"))
            ),
        ));
        return findings;
    };

    if pairs.len() < MIN_CHOICES {
        findings.push(Finding::content(id, "Matching with fewer than 2 pairs"));
    }

    for (i, pair) in pairs.iter().enumerate() {
        let missing: Vec<&str> = ["left", "right"]
            .into_iter()
            .filter(|side| pair.get(side).is_none())
            .collect();
        if !missing.is_empty() {
            findings.push(Finding::content(
                id,
                format!("Pair {} incomplete (missing {})", i, missing.join(" and ")),
            ));
        }
    }

    findings
}

fn check_numerical(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let correct = field(fields, "correct_answer");
    if !correct.is_number() {
        findings.push(Finding::content(
            id,
            format!(
                "Numerical: correct_answer must be a number, not '{}'",
                json_type_name(correct)
            ),
        ));
    }

    if let Some(tolerance) = fields.get("tolerance") {
        match tolerance.as_f64() {
            None => findings.push(Finding::content(
                id,
                format!(
                    "Numerical: tolerance must be a number, not '{}'",
                    json_type_name(tolerance)
                ),
            )),
            Some(t) if t < 0.0 => findings.push(Finding::content(
                id,
                format!("Numerical: tolerance must not be negative ({})", t),
            )),
            Some(_) => {}
        }
    }

    if let Some(unit) = fields.get("unit").filter(|u| !u.is_string()) {
        findings.push(Finding::warning(
            FindingCategory::Content,
            id,
            format!("Numerical: unit should be text, not '{}'", json_type_name(unit)),
        ));
    }

    findings
}

fn check_interpretation(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    if !fields.contains_key("key_points") {
        return vec![Finding::quality(id, "Interpretation without key_points")];
    }
    Vec::new()
}

fn check_hotspot(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let Some(regions) = field(fields, "hotspots").as_array() else {
        findings.push(Finding::content(
            id,
            format!(
                "Hotspot regions must be a list, not '{}'",
                json_type_name(field(fields, "hotspots"))
            ),
        ));
        return findings;
    };

    if regions.len() < MIN_CHOICES {
        findings.push(Finding::content(id, "Hotspot with fewer than 2 regions"));
    }

    let mut region_ids = Vec::new();
    for (i, region) in regions.iter().enumerate() {
        match region.get("id").and_then(Value::as_str) {
            Some(region_id) if !region_id.is_empty() => region_ids.push(region_id),
            _ => findings.push(Finding::content(id, format!("Hotspot region {} has no id", i))),
        }

        let non_numeric: Vec<&str> = ["x", "y", "radius"]
            .into_iter()
            .filter(|coord| !region.get(coord).is_some_and(Value::is_number))
            .collect();
        if !non_numeric.is_empty() {
            findings.push(Finding::content(
                id,
                format!(
                    "Hotspot region {} needs numeric {}",
                    i,
                    non_numeric.join(", ")
                ),
            ));
        } else if region["radius"].as_f64().is_some_and(|r| r <= 0.0) {
            findings.push(Finding::content(
                id,
                format!("Hotspot region {} radius must be positive", i),
            ));
        }
    }

    let correct = field(fields, "correct_hotspot");
    match correct.as_str() {
        None if !fields.contains_key("correct_hotspot") => {
            findings.push(Finding::content(id, "Hotspot without correct_hotspot"))
        }
        None => findings.push(Finding::content(
            id,
            format!(
                "correct_hotspot must be a region id, not '{}'",
                json_type_name(correct)
            ),
        )),
        Some(target) if !region_ids.contains(&target) => findings.push(Finding::content(
            id,
            format!(
                "correct_hotspot '{}' matches no region (regions: {})",
                target,
                region_ids.join(", ")
            ),
        )),
        Some(_) => {}
    }

    if is_blank(fields.get("image_url")) {
        findings.push(Finding::quality(id, "Hotspot without image_url"));
    }

    findings
}

fn check_drag_drop(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let items = field(fields, "draggable_items").as_array();
    let zones = field(fields, "drop_zones").as_array();
    let matches = field(fields, "correct_matches").as_object();
    let (Some(items), Some(zones), Some(matches)) = (items, zones, matches) else {
        let shapes: [(&str, &str, fn(&Value) -> bool); 3] = [
            ("draggable_items", "a list", Value::is_array),
            ("drop_zones", "a list", Value::is_array),
            ("correct_matches", "an object", Value::is_object),
        ];
        for (name, expected, has_shape) in shapes {
            let value = field(fields, name);
            if !has_shape(value) {
                findings.push(Finding::content(
                    id,
                    format!(
                        "Drag & Drop {} must be {}, not '{}'",
                        name,
                        expected,
                        json_type_name(value)
                    ),
                ));
            }
        }
        return findings;
    };

    let item_ids = collect_ids(id, "item", items, &mut findings);
    let zone_ids = collect_ids(id, "zone", zones, &mut findings);

    if items.is_empty() {
        findings.push(Finding::content(id, "Drag & Drop without draggable items"));
    }
    if zones.is_empty() {
        findings.push(Finding::content(id, "Drag & Drop without drop zones"));
    }

    for (item, zone) in matches {
        if !item_ids.contains(item.as_str()) {
            findings.push(Finding::content(
                id,
                format!("correct_matches names unknown item '{}'", item),
            ));
        }
        match zone.as_str() {
            Some(zone) if zone_ids.contains(zone) => {}
            Some(zone) => findings.push(Finding::content(
                id,
                format!("correct_matches sends '{}' to unknown zone '{}'", item, zone),
            )),
            None => findings.push(Finding::content(
                id,
                format!(
                    "correct_matches zone for '{}' must be a zone id, not '{}'",
                    item,
                    json_type_name(zone)
                ),
            )),
        }
    }

    let mut unmatched: Vec<&str> = item_ids
        .iter()
        .copied()
        .filter(|item| !matches.contains_key(*item))
        .collect();
    unmatched.sort_unstable();
    for item in unmatched {
        findings.push(Finding::content(
            id,
            format!("Item '{}' has no zone in correct_matches", item),
        ));
    }

    findings
}

/// Collects the `id` of each entry, reporting entries without one.
fn collect_ids<'q>(
    id: &str,
    what: &str,
    entries: &'q [Value],
    findings: &mut Vec<Finding>,
) -> HashSet<&'q str> {
    let mut ids = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        match entry.get("id").and_then(Value::as_str) {
            Some(entry_id) if !entry_id.is_empty() => {
                if !ids.insert(entry_id) {
                    findings.push(Finding::content(
                        id,
                        format!("Drag & Drop {} id '{}' is repeated", what, entry_id),
                    ));
                }
            }
            _ => findings.push(Finding::content(
                id,
                format!("Drag & Drop {} {} has no id", what, i),
            )),
        }
    }
    ids
}

fn check_flashcard(id: &str, fields: &Map<String, Value>) -> Vec<Finding> {
    let mut findings = Vec::new();

    let back = field(fields, "back");
    if !back.as_str().is_some_and(|text| !text.trim().is_empty()) {
        findings.push(Finding::content(id, "Flashcard back must be non-empty text"));
    }

    if fields.contains_key("points") {
        findings.push(Finding::quality(
            id,
            "Flashcard carries points (flashcards are self-assessed)",
        ));
    }

    findings
}
