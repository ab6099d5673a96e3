pub mod envelope;

pub use envelope::{lead_entries, parse_lead};
