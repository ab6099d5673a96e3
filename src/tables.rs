use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} must be a JSON object")]
    NotAnObject(String),
    #[error("price for {lodging:?} must be a non-negative number, got {value}")]
    InvalidPrice { lodging: String, value: Value },
}

/// Nightly price per lodging type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingTable {
    prices: HashMap<String, f64>,
}

impl PricingTable {
    pub fn from_json(value: &Value) -> Result<Self, TableError> {
        let object = value
            .as_object()
            .ok_or_else(|| TableError::NotAnObject("pricing table".into()))?;

        let mut prices = HashMap::with_capacity(object.len());
        for (lodging, raw) in object {
            let price = raw
                .as_f64()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or_else(|| TableError::InvalidPrice {
                    lodging: lodging.clone(),
                    value: raw.clone(),
                })?;
            prices.insert(lodging.clone(), price);
        }
        Ok(Self { prices })
    }

    pub fn price(&self, lodging: &str) -> Option<f64> {
        self.prices.get(lodging).copied()
    }

    /// Lowest price in the whole table.
    pub fn cheapest(&self) -> Option<f64> {
        self.prices.values().copied().reduce(f64::min)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PricingTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Fixed presets handed to downstream consumers untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetTable(Map<String, Value>);

impl PresetTable {
    pub fn from_json(value: Value) -> Result<Self, TableError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(TableError::NotAnObject("preset table".into())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read-only tables loaded once before any batch is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticTables {
    pub pricing: PricingTable,
    pub presets: PresetTable,
}

impl StaticTables {
    pub fn new(pricing: PricingTable, presets: PresetTable) -> Self {
        Self { pricing, presets }
    }

    pub fn load(dir: &Path, pricing_file: &str, presets_file: &str) -> Result<Self, TableError> {
        let pricing = PricingTable::from_json(&read_json(&dir.join(pricing_file))?)?;
        let presets = PresetTable::from_json(read_json(&dir.join(presets_file))?)?;
        info!(
            pricing_entries = pricing.len(),
            presets = presets.len(),
            "Loaded static tables from {}",
            dir.display()
        );
        Ok(Self { pricing, presets })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, TableError> {
        Self::load(&config.seeds_dir, &config.pricing_file, &config.presets_file)
    }
}

fn read_json(path: &Path) -> Result<Value, TableError> {
    let content = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TableError::Json {
        path: path.to_path_buf(),
        source,
    })
}
