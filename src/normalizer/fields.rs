use serde_json::Value;

use super::matcher::{all_matches, first_match};
use crate::config::FieldRules;
use crate::model::{ANY_LODGING, RawSubmission};
use crate::utils::{is_truthy, scalar_text};

/// Canonical fields that come straight from the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub group_size: u32,
    pub preferred_lodging_type: Vec<String>,
    pub text_opt_in: bool,
    pub email_opt_in: bool,
    pub notes: String,
}

pub fn extract_fields(submission: &RawSubmission, rules: &FieldRules) -> ExtractedFields {
    ExtractedFields {
        group_size: extract_group_size(submission, &rules.group_size),
        preferred_lodging_type: extract_lodging(submission, &rules.lodging),
        text_opt_in: any_truthy(submission, &rules.text_opt_in),
        email_opt_in: any_truthy(submission, &rules.email_opt_in),
        notes: extract_notes(submission, &rules.notes),
    }
}

/// First matching field parsed as a positive integer, else 1.
pub fn extract_group_size(submission: &RawSubmission, fragments: &[String]) -> u32 {
    first_match(submission, fragments)
        .and_then(|(_, value)| parse_group_size(value))
        .unwrap_or(1)
}

fn parse_group_size(value: &Value) -> Option<u32> {
    let size = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        Value::Bool(true) => 1,
        _ => return None,
    };
    u32::try_from(size).ok().filter(|&s| s >= 1)
}

/// Union of every matching field's values, first occurrence kept.
pub fn extract_lodging(submission: &RawSubmission, fragments: &[String]) -> Vec<String> {
    let mut lodging: Vec<String> = Vec::new();
    for (_, value) in all_matches(submission, fragments) {
        let items: Vec<String> = match value {
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        };
        for item in items {
            if !lodging.contains(&item) {
                lodging.push(item);
            }
        }
    }

    if lodging.is_empty() {
        lodging.push(ANY_LODGING.to_string());
    }
    lodging
}

pub fn any_truthy(submission: &RawSubmission, fragments: &[String]) -> bool {
    all_matches(submission, fragments)
        .into_iter()
        .any(|(_, value)| is_truthy(value))
}

pub fn extract_notes(submission: &RawSubmission, fragments: &[String]) -> String {
    match first_match(submission, fragments) {
        Some((_, Value::Array(items))) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join("; "),
        Some((_, value)) => scalar_text(value).unwrap_or_default(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> RawSubmission {
        match value {
            Value::Object(map) => RawSubmission::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn group_size_parsing() {
        let rules = FieldRules::default();
        let cases = [
            (json!({ "Group Size": "4" }), 4),
            (json!({ "Group Size": " 12 " }), 12),
            (json!({ "Party size": 3 }), 3),
            (json!({ "Party size": 2.0 }), 2),
            (json!({ "Group Size": "four" }), 1),
            (json!({ "Group Size": "0" }), 1),
            (json!({ "Group Size": -3 }), 1),
            (json!({ "Group Size": "" }), 1),
            (json!({ "Group Size": ["2"] }), 1),
            (json!({ "Name": "Ann" }), 1),
        ];
        for (raw, expected) in cases {
            let sub = submission(raw.clone());
            assert_eq!(extract_group_size(&sub, &rules.group_size), expected, "{raw}");
        }
    }

    #[test]
    fn lodging_aggregates_every_matching_field() {
        let rules = FieldRules::default();
        let sub = submission(json!({
            "Lodging Options": ["Cabin", "Tent"],
            "Preferred lodging": "Cabin",
            "Backup Lodging": "  RV Site ",
            "Notes": "quiet please",
        }));
        assert_eq!(
            extract_lodging(&sub, &rules.lodging),
            vec!["Cabin", "Tent", "RV Site"]
        );
    }

    #[test]
    fn lodging_defaults_to_any() {
        let rules = FieldRules::default();
        let sub = submission(json!({ "Name": "Ann" }));
        assert_eq!(extract_lodging(&sub, &rules.lodging), vec![ANY_LODGING]);

        let sub = submission(json!({ "Lodging": [] }));
        assert_eq!(extract_lodging(&sub, &rules.lodging), vec![ANY_LODGING]);
    }

    #[test]
    fn checkbox_lodging_keeps_its_value() {
        let rules = FieldRules::default();
        let sub = submission(json!({ "Lodging: Cabin": true }));
        assert_eq!(extract_lodging(&sub, &rules.lodging), vec!["true"]);
    }

    #[test]
    fn opt_in_is_true_when_any_field_is_truthy() {
        let rules = FieldRules::default();
        let sub = submission(json!({
            "Text updates (SMS)": false,
            "Receive text updates?": "Yes",
            "Email Updates": "",
        }));
        let fields = extract_fields(&sub, &rules);
        assert!(fields.text_opt_in);
        assert!(!fields.email_opt_in);
    }

    #[test]
    fn notes_use_fragment_priority() {
        let rules = FieldRules::default();
        let sub = submission(json!({
            "Special instructions": "late arrival",
            "Comments": "first visit",
        }));
        assert_eq!(extract_notes(&sub, &rules.notes), "first visit");

        let sub = submission(json!({ "Notes": ["dog", "", "stroller"] }));
        assert_eq!(extract_notes(&sub, &rules.notes), "dog; stroller");

        let sub = submission(json!({ "Name": "Ann" }));
        assert_eq!(extract_notes(&sub, &rules.notes), "");
    }
}
