use lead_normalizer::model::{ANY_LODGING, IssueKind};
use lead_normalizer::{LeadNormalizer, PresetTable, PricingTable, StaticTables};
use serde_json::{Value, json};

fn normalizer() -> LeadNormalizer {
    let pricing: PricingTable = [("Cabin", 100.0), ("Tent", 40.0)].into_iter().collect();
    LeadNormalizer::new(StaticTables::new(pricing, PresetTable::default()))
}

fn single(submission: Value) -> Value {
    json!({ "leads": [{ "id": "lead-1", "submission_data": submission }] })
}

#[test]
fn revenue_example() {
    let out = normalizer().normalize_batch(&single(json!({
        "Preferred Lodging": ["Tent"],
        "Group Size": "2",
        "SelectedDateRanges": ["2024-06-01 - 2024-06-04"],
    })));

    assert_eq!(out.leads[0].estimated_revenue, Some(3.0 * 40.0 * 2.0));
}

#[test]
fn longest_of_several_ranges_is_used() {
    let out = normalizer().normalize_batch(&single(json!({
        "Lodging": "Cabin",
        "SelectedDateRanges": ["2024-06-01 - 2024-06-03", "2024-07-01 - 2024-07-06"],
    })));

    let lead = &out.leads[0];
    assert_eq!(lead.desired_date_ranges.len(), 2);
    assert_eq!(lead.estimated_revenue, Some(5.0 * 100.0));
}

#[test]
fn malformed_range_is_discarded_not_fatal() {
    let out = normalizer().normalize_batch(&single(json!({
        "Lodging": "Cabin",
        "SelectedDateRanges": ["not-a-date - also-not-a-date", "2024-06-01 - 2024-06-05"],
    })));

    assert!(out.errors.is_empty());
    let lead = &out.leads[0];
    assert_eq!(lead.desired_date_ranges.len(), 1);
    assert_eq!(lead.estimated_revenue, Some(4.0 * 100.0));
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].kind, IssueKind::MalformedDateRange);
}

#[test]
fn no_ranges_means_revenue_key_is_absent() {
    let out = normalizer().normalize_batch(&single(json!({ "Lodging": "Cabin" })));
    let json = serde_json::to_value(&out).unwrap();
    let lead = json["leads"][0].as_object().unwrap();

    assert!(!lead.contains_key("estimated_revenue"));
    assert_eq!(lead["desired_date_ranges"], json!([]));
}

#[test]
fn only_bad_ranges_means_revenue_key_is_absent() {
    let out = normalizer().normalize_batch(&single(json!({
        "SelectedDateRanges": ["2024-06-05 - 2024-06-01"],
    })));
    assert!(out.leads[0].desired_date_ranges.is_empty());
    assert_eq!(out.leads[0].estimated_revenue, None);
}

#[test]
fn unresolved_price_yields_zero_and_a_warning() {
    let out = normalizer().normalize_batch(&single(json!({
        "Lodging": "Glamping Dome",
        "SelectedDateRanges": ["2024-06-01 - 2024-06-03"],
    })));

    assert_eq!(out.leads[0].estimated_revenue, Some(0.0));
    assert_eq!(out.warnings[0].kind, IssueKind::UnresolvedPricing);
    assert_eq!(out.warnings[0].id.as_deref(), Some("lead-1"));
}

#[test]
fn checkbox_lodging_is_kept_and_flagged_as_unpriced() {
    let out = normalizer().normalize_batch(&single(json!({
        "Lodging: Cabin": true,
        "SelectedDateRanges": ["2024-06-01 - 2024-06-03"],
    })));

    let lead = &out.leads[0];
    assert_ne!(lead.preferred_lodging_type, vec![ANY_LODGING]);
    assert_eq!(lead.estimated_revenue, Some(0.0));
    assert_eq!(out.warnings[0].kind, IssueKind::UnresolvedPricing);
}

#[test]
fn null_id_falls_back_to_document_store_id() {
    let out = normalizer().normalize_batch(&json!({
        "leads": [{ "id": null, "_id": { "$oid": "x" }, "submission_data": {} }]
    }));
    assert!(out.errors.is_empty());
    assert_eq!(out.leads[0].id, "x");
}

#[test]
fn renormalizing_canonical_defaults_keeps_them() {
    let first = normalizer().normalize_batch(&single(json!({ "Name": "Ann" })));
    let canonical = serde_json::to_value(&first.leads[0]).unwrap();

    let second = normalizer().normalize_batch(&single(canonical));
    let lead = &second.leads[0];
    assert_eq!(lead.group_size, 1);
    assert_eq!(lead.preferred_lodging_type, vec![ANY_LODGING]);
    assert!(!lead.text_opt_in);
    assert!(!lead.email_opt_in);
    assert_eq!(lead.notes, "");
    assert!(lead.desired_date_ranges.is_empty());
    assert_eq!(lead.estimated_revenue, None);
}

#[test]
fn output_preserves_input_order() {
    let payload = json!([
        { "id": "c", "submission_data": {} },
        { "id": "a", "submission_data": {} },
        { "id": "b", "submission_data": {} },
    ]);
    let ids: Vec<String> = normalizer()
        .normalize_batch(&payload)
        .leads
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn malformed_envelope_is_an_empty_batch() {
    let out = normalizer().normalize_batch(&json!({ "leads": { "id": "a" } }));
    assert!(out.leads.is_empty());
    assert!(out.errors.is_empty());
    assert_eq!(serde_json::to_value(&out).unwrap(), json!({ "leads": [] }));
}

#[test]
fn document_store_ids_are_accepted() {
    let out = normalizer().normalize_batch(&json!({
        "leads": [{ "_id": { "$oid": "64f0c2aa" }, "submission_data": {} }]
    }));
    assert_eq!(out.leads[0].id, "64f0c2aa");
}
