// Normalizer module: raw form submissions -> canonical leads.

pub mod dates;
pub mod fields;
pub mod matcher;

use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzer::{Estimator, EstimatorImpl};
use crate::config::{AppConfig, FieldRules};
use crate::model::{BatchOutput, CanonicalLead, LeadError, LeadOutcome, RawLead};
use crate::parser::{lead_entries, parse_lead};
use crate::tables::StaticTables;
use crate::utils::DEFAULT_DATE_FORMATS;
use dates::parse_ranges;
use fields::extract_fields;

/// Normalizes leads against read-only tables and field rules.
///
/// Holds no mutable state, so one instance can serve any number of batches
/// and workers at once.
#[derive(Debug, Clone)]
pub struct LeadNormalizer {
    tables: StaticTables,
    rules: FieldRules,
    date_formats: Vec<String>,
}

impl LeadNormalizer {
    pub fn new(tables: StaticTables) -> Self {
        Self {
            tables,
            rules: FieldRules::default(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_config(config: &AppConfig, tables: StaticTables) -> Self {
        Self {
            tables,
            rules: config.rules.clone().lowercased(),
            date_formats: config.date_formats.clone(),
        }
    }

    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules.lowercased();
        self
    }

    pub fn tables(&self) -> &StaticTables {
        &self.tables
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    pub fn normalize_lead(&self, raw: &RawLead) -> LeadOutcome {
        let fields = extract_fields(&raw.submission, &self.rules);

        let (ranges, mut warnings) = parse_ranges(
            raw.submission.get(&self.rules.date_ranges_field),
            &self.date_formats,
        );
        for warning in &warnings {
            debug!(lead_id = %raw.id, "{}", warning);
        }

        let estimate = EstimatorImpl::new(&self.tables.pricing).estimate(
            &ranges,
            &fields.preferred_lodging_type,
            fields.group_size,
        );
        warnings.extend(estimate.warnings);

        LeadOutcome {
            lead: CanonicalLead {
                id: raw.id.clone(),
                group_size: fields.group_size,
                preferred_lodging_type: fields.preferred_lodging_type,
                desired_date_ranges: ranges,
                text_opt_in: fields.text_opt_in,
                email_opt_in: fields.email_opt_in,
                notes: fields.notes,
                estimated_revenue: estimate.revenue,
            },
            warnings,
        }
    }

    /// Parses and normalizes one batch entry.
    pub fn normalize_entry(&self, entry: &Value) -> Result<LeadOutcome, LeadError> {
        let raw = parse_lead(entry)?;
        Ok(self.normalize_lead(&raw))
    }

    /// Normalizes every lead in the payload in order. Failed leads are
    /// reported in `errors` and never abort the batch.
    pub fn normalize_batch(&self, payload: &Value) -> BatchOutput {
        let entries = lead_entries(payload);
        info!("Normalizing batch of {} leads", entries.len());

        let mut output = BatchOutput::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let result = self.normalize_entry(entry);
            log_failure(index, &result);
            output.record(index, result);
        }
        log_summary(&output);
        output
    }
}

/// Same as [`LeadNormalizer::normalize_batch`], with one blocking worker per lead.
pub async fn normalize_batch_parallel(normalizer: Arc<LeadNormalizer>, payload: &Value) -> BatchOutput {
    let entries = lead_entries(payload);
    info!("Normalizing batch of {} leads in parallel", entries.len());

    let tasks: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let normalizer = normalizer.clone();
            let entry = entry.clone();
            tokio::task::spawn_blocking(move || normalizer.normalize_entry(&entry))
        })
        .collect();

    let mut output = BatchOutput::default();
    for (index, joined) in join_all(tasks).await.into_iter().enumerate() {
        let result = joined.unwrap_or_else(|e| Err(LeadError::Worker(e.to_string())));
        log_failure(index, &result);
        output.record(index, result);
    }
    log_summary(&output);
    output
}

fn log_failure(index: usize, result: &Result<LeadOutcome, LeadError>) {
    if let Err(e) = result {
        warn!(index, "Lead excluded from batch: {}", e);
    }
}

fn log_summary(output: &BatchOutput) {
    info!(
        leads = output.leads.len(),
        errors = output.errors.len(),
        warnings = output.warnings.len(),
        "Batch normalized"
    );
}
