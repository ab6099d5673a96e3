use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::DEFAULT_DATE_FORMATS;

/// Name fragments per canonical field, in priority order.
///
/// The matcher tries each fragment in turn and only falls back to the next
/// one when no key contains the current fragment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldRules {
    pub group_size: Vec<String>,
    pub lodging: Vec<String>,
    pub text_opt_in: Vec<String>,
    pub email_opt_in: Vec<String>,
    pub notes: Vec<String>,
    /// Exact field name holding the pre-selected date ranges.
    pub date_ranges_field: String,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            group_size: fragments(&["group size", "size"]),
            lodging: fragments(&["lodging option", "lodging"]),
            text_opt_in: fragments(&["text update"]),
            email_opt_in: fragments(&["email update"]),
            notes: fragments(&["comment", "instruction", "note"]),
            date_ranges_field: "SelectedDateRanges".into(),
        }
    }
}

impl FieldRules {
    /// Lowercases every fragment so hand-edited configs still match.
    pub fn lowercased(mut self) -> Self {
        for list in [
            &mut self.group_size,
            &mut self.lodging,
            &mut self.text_opt_in,
            &mut self.email_opt_in,
            &mut self.notes,
        ] {
            for fragment in list.iter_mut() {
                *fragment = fragment.to_lowercase();
            }
        }
        self
    }
}

fn fragments(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seeds_dir: PathBuf,
    pub pricing_file: String,
    pub presets_file: String,
    /// Normalize each lead on its own worker task.
    pub parallel: bool,
    pub date_formats: Vec<String>,
    pub rules: FieldRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seeds_dir: PathBuf::from("data"),
            pricing_file: "pricing_seed.json".into(),
            presets_file: "fixed_presets.json".into(),
            parallel: false,
            date_formats: fragments(DEFAULT_DATE_FORMATS),
            rules: FieldRules::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: AppConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    config.rules = config.rules.lowercased();
    Ok(config)
}
