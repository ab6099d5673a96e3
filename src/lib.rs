//! Lead normalization: turns customer-specific form submissions into the
//! fixed schema consumed by lead scoring, with a derived revenue estimate.
//!
//! The host service owns transport and IO. It loads [`StaticTables`] once at
//! startup and hands each batch body to [`LeadNormalizer::normalize_batch`].

pub mod analyzer;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod tables;
pub mod utils;

pub use config::{AppConfig, FieldRules, load_config};
pub use model::{BatchOutput, CanonicalLead, DateRange, LeadError, LeadIssue, LeadWarning, RawLead};
pub use normalizer::{LeadNormalizer, normalize_batch_parallel};
pub use tables::{PresetTable, PricingTable, StaticTables, TableError};
