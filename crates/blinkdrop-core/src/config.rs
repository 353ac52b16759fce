//! Configuration module
//!
//! Configuration is read from environment variables (a `.env` file is honoured
//! through `dotenvy`). Every option has a default except the S3 bucket and
//! credentials, which are required when the S3 backend is selected.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const UPLOAD_COUNT_THRESHOLD: u64 = 25;
const UPLOAD_SIZE_THRESHOLD_MB: f64 = 100.0;
const PAUSE_DURATION_SECS: u64 = 60 * 60;
const COUNTER_RESET_INTERVAL_SECS: u64 = 30 * 60;
const RETENTION_WINDOW_SECS: u64 = 30 * 60;
const SWEEP_INTERVAL_SECS: u64 = 30 * 60;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
}

/// Blob store connection settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket_name: Option<String>,
    pub region: String,
}

/// Load-shedding thresholds and timings
#[derive(Clone, Debug, PartialEq)]
pub struct AdmissionConfig {
    /// Pause once this many uploads land inside one window.
    pub upload_count_threshold: u64,
    /// Pause once this many megabytes land inside one window.
    pub upload_size_threshold_mb: f64,
    /// How long a pause lasts.
    pub pause_duration: Duration,
    /// Period of the unconditional counter reset.
    pub counter_reset_interval: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            upload_count_threshold: UPLOAD_COUNT_THRESHOLD,
            upload_size_threshold_mb: UPLOAD_SIZE_THRESHOLD_MB,
            pause_duration: Duration::from_secs(PAUSE_DURATION_SECS),
            counter_reset_interval: Duration::from_secs(COUNTER_RESET_INTERVAL_SECS),
        }
    }
}

/// Retention sweep settings
#[derive(Clone, Debug, PartialEq)]
pub struct RetentionConfig {
    /// Objects older than this are deleted by the sweep.
    pub retention_window: Duration,
    /// Period between sweeps.
    pub sweep_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_window: Duration::from_secs(RETENTION_WINDOW_SECS),
            sweep_interval: Duration::from_secs(SWEEP_INTERVAL_SECS),
        }
    }
}

/// Full relay configuration
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub admission: AdmissionConfig,
    pub retention: RetentionConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RelayConfig>);

impl Config {
    fn as_relay(&self) -> &RelayConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production(&self.as_relay().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = RelayConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_relay().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_relay().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_relay().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_relay().base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_relay().base.max_upload_size_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_relay().base.http_concurrency_limit
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.as_relay().storage
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_relay().storage.backend
    }

    pub fn admission(&self) -> &AdmissionConfig {
        &self.as_relay().admission
    }

    pub fn retention(&self) -> &RetentionConfig {
        &self.as_relay().retention
    }
}

fn is_production(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn first_of<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty())
}

impl RelayConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment =
            first_of(&lookup, &["ENVIRONMENT", "APP_ENV"]).unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let max_upload_size_bytes = parse_or(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            max_upload_size_bytes,
            http_concurrency_limit: parse_or(&lookup, "HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            endpoint: first_of(&lookup, &["S3_ENDPOINT", "CLOUDFLARE_R2_ENDPOINT"]),
            access_key_id: first_of(
                &lookup,
                &["S3_ACCESS_KEY_ID", "CLOUDFLARE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"],
            ),
            secret_access_key: first_of(
                &lookup,
                &[
                    "S3_SECRET_ACCESS_KEY",
                    "CLOUDFLARE_SECRET_ACCESS_KEY",
                    "AWS_SECRET_ACCESS_KEY",
                ],
            ),
            bucket_name: first_of(&lookup, &["S3_BUCKET_NAME", "S3_BUCKET"]),
            region: first_of(&lookup, &["S3_REGION", "AWS_REGION"])
                .unwrap_or_else(|| "auto".to_string()),
        };

        let admission = AdmissionConfig {
            upload_count_threshold: parse_or(&lookup, "UPLOAD_COUNT_THRESHOLD", UPLOAD_COUNT_THRESHOLD),
            upload_size_threshold_mb: parse_or(
                &lookup,
                "UPLOAD_SIZE_THRESHOLD_MB",
                UPLOAD_SIZE_THRESHOLD_MB,
            ),
            pause_duration: Duration::from_secs(parse_or(
                &lookup,
                "PAUSE_DURATION_SECS",
                PAUSE_DURATION_SECS,
            )),
            counter_reset_interval: Duration::from_secs(parse_or(
                &lookup,
                "COUNTER_RESET_INTERVAL_SECS",
                COUNTER_RESET_INTERVAL_SECS,
            )),
        };

        let retention = RetentionConfig {
            retention_window: Duration::from_secs(parse_or(
                &lookup,
                "RETENTION_WINDOW_SECS",
                RETENTION_WINDOW_SECS,
            )),
            sweep_interval: Duration::from_secs(parse_or(
                &lookup,
                "SWEEP_INTERVAL_SECS",
                SWEEP_INTERVAL_SECS,
            )),
        };

        let config = RelayConfig {
            base,
            storage,
            admission,
            retention,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.admission.upload_count_threshold == 0 {
            return Err(anyhow::anyhow!("UPLOAD_COUNT_THRESHOLD must be greater than 0"));
        }

        if !(self.admission.upload_size_threshold_mb > 0.0) {
            return Err(anyhow::anyhow!(
                "UPLOAD_SIZE_THRESHOLD_MB must be greater than 0"
            ));
        }

        for (name, value) in [
            ("PAUSE_DURATION_SECS", self.admission.pause_duration),
            ("COUNTER_RESET_INTERVAL_SECS", self.admission.counter_reset_interval),
            ("RETENTION_WINDOW_SECS", self.retention.retention_window),
            ("SWEEP_INTERVAL_SECS", self.retention.sweep_interval),
        ] {
            if value.is_zero() {
                return Err(anyhow::anyhow!("{} must be greater than 0", name));
            }
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.bucket_name.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET_NAME must be set when using S3 storage backend"
                    ));
                }
                if self.storage.access_key_id.is_none() || self.storage.secret_access_key.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {
                if is_production(&self.base.environment) {
                    return Err(anyhow::anyhow!(
                        "The memory storage backend is not allowed in production"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn s3_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("CLOUDFLARE_R2_ENDPOINT", "https://account.r2.cloudflarestorage.com"),
            ("S3_ACCESS_KEY_ID", "key"),
            ("S3_SECRET_ACCESS_KEY", "secret"),
            ("S3_BUCKET_NAME", "relay"),
        ]
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::from_lookup(lookup_from(&s3_vars())).unwrap();
        assert_eq!(config.server_port(), 4000);
        assert_eq!(config.cors_origins(), &["*".to_string()]);
        assert_eq!(config.storage_backend(), StorageBackend::S3);
        assert_eq!(config.storage().region, "auto");
        assert_eq!(config.admission(), &AdmissionConfig::default());
        assert_eq!(config.admission().upload_count_threshold, 25);
        assert_eq!(config.admission().pause_duration, Duration::from_secs(3600));
        assert_eq!(config.retention(), &RetentionConfig::default());
        assert_eq!(config.retention().retention_window, Duration::from_secs(1800));
        assert_eq!(config.max_upload_size_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn r2_variable_names_are_recognised() {
        let config = Config::from_lookup(lookup_from(&[
            ("CLOUDFLARE_R2_ENDPOINT", "https://r2.example"),
            ("CLOUDFLARE_ACCESS_KEY_ID", "key"),
            ("CLOUDFLARE_SECRET_ACCESS_KEY", "secret"),
            ("S3_BUCKET_NAME", "relay"),
        ]))
        .unwrap();
        let storage = config.storage();
        assert_eq!(storage.endpoint.as_deref(), Some("https://r2.example"));
        assert_eq!(storage.access_key_id.as_deref(), Some("key"));
        assert_eq!(storage.secret_access_key.as_deref(), Some("secret"));
        assert_eq!(storage.bucket_name.as_deref(), Some("relay"));
    }

    #[test]
    fn s3_backend_requires_bucket() {
        let err = Config::from_lookup(lookup_from(&[
            ("S3_ACCESS_KEY_ID", "key"),
            ("S3_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET_NAME"));
    }

    #[test]
    fn memory_backend_needs_no_credentials() {
        let config = Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Memory);
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let mut vars = s3_vars();
        vars.push(("ENVIRONMENT", "production"));
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());

        vars.push(("CORS_ORIGINS", "https://app.example, https://www.example"));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn thresholds_are_configurable() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("UPLOAD_COUNT_THRESHOLD", "3"),
            ("UPLOAD_SIZE_THRESHOLD_MB", "1.5"),
            ("PAUSE_DURATION_SECS", "10"),
            ("SWEEP_INTERVAL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.admission().upload_count_threshold, 3);
        assert_eq!(config.admission().upload_size_threshold_mb, 1.5);
        assert_eq!(config.admission().pause_duration, Duration::from_secs(10));
        assert_eq!(config.retention().sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("UPLOAD_COUNT_THRESHOLD", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("UPLOAD_COUNT_THRESHOLD"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("PORT", "not-a-port"),
        ]))
        .is_err());
    }

    #[test]
    fn oversized_upload_limit_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("MAX_UPLOAD_SIZE_MB", "18446744073709551615"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_SIZE_MB"));
    }

    #[test]
    fn concurrency_limit_is_configurable() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("HTTP_CONCURRENCY_LIMIT", "64"),
        ]))
        .unwrap();
        assert_eq!(config.http_concurrency_limit(), 64);

        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("HTTP_CONCURRENCY_LIMIT", "0"),
        ]))
        .unwrap();
        assert_eq!(config.http_concurrency_limit(), 1);
    }
}
