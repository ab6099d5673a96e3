use serde_json::Value;

use crate::model::RawSubmission;

/// Returns the first field whose lowercased name contains a fragment.
///
/// Fragments are tried in priority order; submission order only breaks ties
/// between keys matching the same fragment.
pub fn first_match<'a>(
    submission: &'a RawSubmission,
    fragments: &[String],
) -> Option<(&'a str, &'a Value)> {
    let keys: Vec<(String, &str, &Value)> = lowered(submission);

    fragments.iter().find_map(|fragment| {
        keys.iter()
            .find(|(lower, _, _)| lower.contains(fragment.as_str()))
            .map(|&(_, key, value)| (key, value))
    })
}

/// Every field whose lowercased name contains any fragment, in submission order.
pub fn all_matches<'a>(
    submission: &'a RawSubmission,
    fragments: &[String],
) -> Vec<(&'a str, &'a Value)> {
    submission
        .iter()
        .filter(|(key, _)| {
            let key = key.to_lowercase();
            fragments.iter().any(|fragment| key.contains(fragment.as_str()))
        })
        .collect()
}

fn lowered(submission: &RawSubmission) -> Vec<(String, &str, &Value)> {
    submission
        .iter()
        .map(|(key, value)| (key.to_lowercase(), key, value))
        .collect()
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

    fn frags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_case_insensitive_substring() {
        let sub = submission(json!({ "Name": "Ann", "Group Size (adults)": "4" }));
        let (key, value) = first_match(&sub, &frags(&["size"])).unwrap();
        assert_eq!(key, "Group Size (adults)");
        assert_eq!(value, &json!("4"));
    }

    #[test]
    fn no_match_returns_none() {
        let sub = submission(json!({ "Name": "Ann" }));
        assert!(first_match(&sub, &frags(&["size"])).is_none());
        assert!(all_matches(&sub, &frags(&["size"])).is_empty());
    }

    #[test]
    fn higher_priority_fragment_wins_over_key_order() {
        let sub = submission(json!({ "Shirt size": "L", "Group size": "3" }));
        let (key, _) = first_match(&sub, &frags(&["group size", "size"])).unwrap();
        assert_eq!(key, "Group size");
    }

    #[test]
    fn submission_order_breaks_ties_within_a_fragment() {
        let sub = submission(json!({ "Party size": "2", "Tent size": "6" }));
        let (key, _) = first_match(&sub, &frags(&["group size", "size"])).unwrap();
        assert_eq!(key, "Party size");
    }

    #[test]
    fn all_matches_keeps_submission_order() {
        let sub = submission(json!({
            "Lodging Options": ["Cabin"],
            "Email": "a@b.c",
            "Other lodging": "Tent",
        }));
        let keys: Vec<&str> = all_matches(&sub, &frags(&["lodging option", "lodging"]))
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["Lodging Options", "Other lodging"]);
    }
}
