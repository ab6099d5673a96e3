use lead_normalizer::{LeadNormalizer, StaticTables, load_config, normalize_batch_parallel};
use serde_json::Value;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

const CONFIG_ENV: &str = "LEAD_NORMALIZER_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for the batch response
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    // Load configuration from file
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Static tables must be in place before any batch is touched
    let tables = match StaticTables::from_config(&config) {
        Ok(t) => t,
        Err(e) => {
            error!("Static table load error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if tables.pricing.is_empty() {
        warn!("Pricing table is empty, every revenue estimate will be 0");
    }
    let normalizer = Arc::new(LeadNormalizer::from_config(&config, tables));

    let input_path = env::args().nth(1);
    let body = match read_input(input_path.as_deref()).await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to read batch: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let payload: Value = serde_json::from_str(&body).unwrap_or_else(|e| {
        warn!("Batch is not valid JSON ({}), treating it as empty", e);
        Value::Null
    });

    let output = if config.parallel {
        normalize_batch_parallel(normalizer.clone(), &payload).await
    } else {
        normalizer.normalize_batch(&payload)
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            info!("Wrote {} leads", output.leads.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize batch: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads the batch body from a file, or from stdin when no path is given.
async fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut body = String::new();
            tokio::io::stdin().read_to_string(&mut body).await?;
            Ok(body)
        }
    }
}
