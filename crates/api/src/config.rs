use std::path::PathBuf;

use aqar_core::analytics::TOTAL_COST_FILE;
use aqar_core::normalizer::NormalizationMode;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Price model artifact.
    pub model_path: PathBuf,
    /// Directory holding the `deals_<year>.csv` exports.
    pub data_dir: PathBuf,
    /// Years whose deal-count file is loaded.
    pub deal_years: Vec<i32>,
    /// Wide total-cost table.
    pub total_cost_file: PathBuf,
    /// Whether absent expected features fail the request instead of being zero-filled.
    pub normalization_mode: NormalizationMode,
    /// Largest accepted CSV upload in bytes.
    pub max_upload_bytes: usize,
    /// Idle time after which a map session is forgotten (default: `3600`).
    pub session_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `3000`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                         |
    /// | `MODEL_PATH`           | `model/price_model.json`     |
    /// | `DATA_DIR`             | `data`                       |
    /// | `DEAL_YEARS`           | `2022,2023`                  |
    /// | `TOTAL_COST_FILE`      | `$DATA_DIR/total_cost.csv`   |
    /// | `STRICT_FEATURES`      | `false`                      |
    /// | `MAX_UPLOAD_BYTES`     | `1048576`                    |
    /// | `SESSION_TTL_SECS`     | `3600`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let model_path = PathBuf::from(
            std::env::var("MODEL_PATH").unwrap_or_else(|_| "model/price_model.json".into()),
        );

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));

        let deal_years = parse_years(
            &std::env::var("DEAL_YEARS").unwrap_or_else(|_| "2022,2023".into()),
        )
        .expect("DEAL_YEARS must be a comma-separated list of years");

        let total_cost_file = std::env::var("TOTAL_COST_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join(TOTAL_COST_FILE));

        let strict: bool = std::env::var("STRICT_FEATURES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("STRICT_FEATURES must be true or false");
        let normalization_mode = if strict {
            NormalizationMode::Strict
        } else {
            NormalizationMode::Lenient
        };

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "1048576".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let session_ttl_secs: u64 = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            model_path,
            data_dir,
            deal_years,
            total_cost_file,
            normalization_mode,
            max_upload_bytes,
            session_ttl_secs,
        }
    }
}

/// Upper bound on the session TTL, ten years.
const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

impl ServerConfig {
    /// Session idle timeout, capped at ten years.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a comma-separated list of years, ignoring blanks.
pub fn parse_years(raw: &str) -> Result<Vec<i32>, std::num::ParseIntError> {
    split_list(raw).iter().map(|y| y.parse()).collect()
}
