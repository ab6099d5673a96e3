// Core structs: RawLead, CanonicalLead, BatchOutput
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Lodging preference used when the form names none.
pub const ANY_LODGING: &str = "Any";

/// As-entered form fields. Key order is the order the form submitted them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubmission(Map<String, Value>);

impl RawSubmission {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Exact-name lookup, for fields whose name is fixed by the form builder.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawSubmission {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawLead {
    pub id: String,
    pub submission: RawSubmission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Whole days between start and end.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLead {
    pub id: String,
    pub group_size: u32,
    pub preferred_lodging_type: Vec<String>,
    pub desired_date_ranges: Vec<DateRange>,
    pub text_opt_in: bool,
    pub email_opt_in: bool,
    pub notes: String,
    /// Absent when no date range could be parsed. Zero is a real estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_revenue: Option<f64>,
}

/// A lead that was normalized, plus whatever was degraded along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadOutcome {
    pub lead: CanonicalLead,
    pub warnings: Vec<LeadWarning>,
}

/// Failures that exclude a lead from the output batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeadError {
    #[error("lead has no usable identifier")]
    MissingIdentifier,
    #[error("normalization worker failed: {0}")]
    Worker(String),
}

impl LeadError {
    pub fn kind(&self) -> IssueKind {
        match self {
            LeadError::MissingIdentifier => IssueKind::MissingIdentifier,
            LeadError::Worker(_) => IssueKind::WorkerFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateRangeError {
    #[error("expected \"<start> - <end>\", got {0:?}")]
    MissingSeparator(String),
    #[error("unrecognised date {0:?}")]
    InvalidDate(String),
    #[error("range {start} - {end} spans {nights} nights")]
    NonPositiveNights {
        start: NaiveDate,
        end: NaiveDate,
        nights: i64,
    },
    #[error("date range entry is not text")]
    NotText,
}

/// Degradations that keep the lead in the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeadWarning {
    #[error("discarded date range {raw}: {reason}")]
    MalformedDateRange { raw: String, reason: DateRangeError },
    #[error("no nightly price for {}, estimating with 0", .lodging.join(", "))]
    UnresolvedPricing { lodging: Vec<String> },
}

impl LeadWarning {
    pub fn kind(&self) -> IssueKind {
        match self {
            LeadWarning::MalformedDateRange { .. } => IssueKind::MalformedDateRange,
            LeadWarning::UnresolvedPricing { .. } => IssueKind::UnresolvedPricing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingIdentifier,
    MalformedDateRange,
    UnresolvedPricing,
    WorkerFailed,
}

/// One entry of the batch error or warning list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadIssue {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutput {
    pub leads: Vec<CanonicalLead>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<LeadIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LeadIssue>,
}

impl BatchOutput {
    /// Appends one lead's result, keeping input order.
    pub fn record(&mut self, index: usize, result: Result<LeadOutcome, LeadError>) {
        match result {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    self.warnings.push(LeadIssue {
                        index,
                        id: Some(outcome.lead.id.clone()),
                        kind: warning.kind(),
                        message: warning.to_string(),
                    });
                }
                self.leads.push(outcome.lead);
            }
            Err(err) => self.errors.push(LeadIssue {
                index,
                id: None,
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}
