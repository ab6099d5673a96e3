// Batch request parsing: envelope shapes and individual lead entries
use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{LeadError, RawLead, RawSubmission};

const LEADS_KEY: &str = "leads";
const SUBMISSION_KEY: &str = "submission_data";

/// Unwraps `{"leads": [...]}`, a bare list, or a single lead object.
/// Anything else is treated as an empty batch.
pub fn lead_entries(payload: &Value) -> Vec<&Value> {
    match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(fields) => match fields.get(LEADS_KEY) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(other) => {
                warn!(found = %kind(other), "\"leads\" is not a list, treating batch as empty");
                Vec::new()
            }
            None if looks_like_lead(fields) => vec![payload],
            None => {
                warn!("Payload is neither a batch nor a lead, treating batch as empty");
                Vec::new()
            }
        },
        other => {
            warn!(found = %kind(other), "Unexpected batch payload, treating batch as empty");
            Vec::new()
        }
    }
}

fn looks_like_lead(fields: &Map<String, Value>) -> bool {
    fields.contains_key(SUBMISSION_KEY) || fields.contains_key("id") || fields.contains_key("_id")
}

/// Reads one lead entry. The id is mandatory, the submission is not.
pub fn parse_lead(entry: &Value) -> Result<RawLead, LeadError> {
    let fields = entry.as_object().ok_or(LeadError::MissingIdentifier)?;
    let id = lead_id(fields).ok_or(LeadError::MissingIdentifier)?;

    let submission = match fields.get(SUBMISSION_KEY) {
        Some(Value::Object(map)) => RawSubmission::new(map.clone()),
        None | Some(Value::Null) => RawSubmission::default(),
        Some(other) => {
            warn!(lead_id = %id, found = %kind(other), "submission_data is not an object, ignoring it");
            RawSubmission::default()
        }
    };

    Ok(RawLead { id, submission })
}

/// `id`, or a document-store `_id` given either as a string or as `{"$oid": ...}`.
fn lead_id(fields: &Map<String, Value>) -> Option<String> {
    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .and_then(non_blank)
        .or_else(|| match fields.get("_id")? {
            Value::Object(oid) => oid.get("$oid").and_then(Value::as_str).and_then(non_blank),
            other => other.as_str().and_then(non_blank),
        })?;
    Some(id.to_string())
}

fn non_blank(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty()).then_some(raw)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
