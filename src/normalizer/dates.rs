use serde_json::Value;

use crate::model::{DateRange, DateRangeError, LeadWarning};
use crate::utils::parse_date;

const SEPARATORS: &[&str] = &[" - ", " – "];

/// Parses one `"<start> - <end>"` string. Ranges must span at least one night.
pub fn parse_range(raw: &str, formats: &[String]) -> Result<DateRange, DateRangeError> {
    let (start, end) = split_range(raw)
        .ok_or_else(|| DateRangeError::MissingSeparator(raw.to_string()))?;

    let start = parse_date(start, formats)
        .ok_or_else(|| DateRangeError::InvalidDate(start.trim().to_string()))?;
    let end = parse_date(end, formats)
        .ok_or_else(|| DateRangeError::InvalidDate(end.trim().to_string()))?;

    let range = DateRange { start, end };
    let nights = range.nights();
    if nights <= 0 {
        return Err(DateRangeError::NonPositiveNights { start, end, nights });
    }
    Ok(range)
}

fn split_range(raw: &str) -> Option<(&str, &str)> {
    SEPARATORS
        .iter()
        .find_map(|sep| raw.split_once(*sep))
        .or_else(|| {
            // Bare hyphen only when it is the sole one, otherwise ISO dates get split apart.
            (raw.matches('-').count() == 1)
                .then(|| raw.split_once('-'))
                .flatten()
        })
}

/// Parses every range in the field, keeping the good ones and reporting the rest.
pub fn parse_ranges(value: Option<&Value>, formats: &[String]) -> (Vec<DateRange>, Vec<LeadWarning>) {
    let entries: Vec<&Value> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    };

    let mut ranges = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();
    for entry in entries {
        let parsed = match entry {
            Value::String(raw) => parse_range(raw, formats).map_err(|reason| (raw.clone(), reason)),
            other => Err((other.to_string(), DateRangeError::NotText)),
        };
        match parsed {
            Ok(range) => ranges.push(range),
            Err((raw, reason)) => warnings.push(LeadWarning::MalformedDateRange { raw, reason }),
        }
    }
    (ranges, warnings)
}

/// Longest stay among the alternatives the guest offered.
pub fn total_nights(ranges: &[DateRange]) -> Option<i64> {
    ranges.iter().map(DateRange::nights).max()
}
