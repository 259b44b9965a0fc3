//! Configuration module
//!
//! Environment-driven configuration for the API service: server, database,
//! auth, storage backend selection, upload limits, signed-URL lifetime, and
//! the access-gate pricing knobs. Values are validated at startup so a
//! misconfigured service fails fast instead of failing on first request.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_UNLOCK_PRICE_CENTS: i32 = 999;
const DEFAULT_SETTLEMENT_DELAY_MS: u64 = 0;
const DEFAULT_OPERATOR_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_STALE_PENDING_AFTER_SECS: i64 = 24 * 60 * 60;
const DEFAULT_THUMBNAIL_PLACEHOLDER_URL: &str =
    "https://placehold.co/600x400/e2e8f0/475569?text=Encrypted+Document";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Auth (tokens are minted by the external identity provider)
    pub jwt_secret: String,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload limits
    pub max_document_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    // Signed URL lifetime for preview and download references
    pub signed_url_ttl_secs: u64,
    // Access gate
    pub unlock_price_cents: i32,
    pub settlement_delay_ms: u64,
    // Operator console
    pub operator_poll_interval_secs: u64,
    pub stale_pending_after_secs: i64,
    // Placeholder locator set on every record at creation
    pub thumbnail_placeholder_url: String,
}

impl Config {
    /// 25 MiB upload ceiling.
    pub const DEFAULT_MAX_DOCUMENT_SIZE_BYTES: usize = 25 * 1024 * 1024;

    pub fn default_allowed_extensions() -> Vec<String> {
        ["pdf", "doc", "docx", "xls", "xlsx", "csv"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn default_allowed_content_types() -> Vec<String> {
        [
            "application/pdf",
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "text/csv",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(v) => StorageBackend::from_str(&v).map_err(|e| anyhow::anyhow!(e))?,
            Err(_) => StorageBackend::S3,
        };

        let config = Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cors_origins: env_list("CORS_ORIGINS"),
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            jwt_secret,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or(env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_document_size_bytes: env_parse(
                "MAX_DOCUMENT_SIZE_BYTES",
                Self::DEFAULT_MAX_DOCUMENT_SIZE_BYTES,
            )?,
            allowed_extensions: env_list_or("ALLOWED_EXTENSIONS", Self::default_allowed_extensions),
            allowed_content_types: env_list_or(
                "ALLOWED_CONTENT_TYPES",
                Self::default_allowed_content_types,
            ),
            signed_url_ttl_secs: env_parse("SIGNED_URL_TTL_SECS", DEFAULT_SIGNED_URL_TTL_SECS)?,
            unlock_price_cents: env_parse("UNLOCK_PRICE_CENTS", DEFAULT_UNLOCK_PRICE_CENTS)?,
            settlement_delay_ms: env_parse("SETTLEMENT_DELAY_MS", DEFAULT_SETTLEMENT_DELAY_MS)?,
            operator_poll_interval_secs: env_parse(
                "OPERATOR_POLL_INTERVAL_SECS",
                DEFAULT_OPERATOR_POLL_INTERVAL_SECS,
            )?,
            stale_pending_after_secs: env_parse(
                "STALE_PENDING_AFTER_SECS",
                DEFAULT_STALE_PENDING_AFTER_SECS,
            )?,
            thumbnail_placeholder_url: env::var("THUMBNAIL_PLACEHOLDER_URL")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_PLACEHOLDER_URL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail-fast validation of backend-dependent settings.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters");
        }
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local");
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local");
                }
            }
        }
        if self.max_document_size_bytes == 0 {
            anyhow::bail!("MAX_DOCUMENT_SIZE_BYTES must be greater than zero");
        }
        if self.signed_url_ttl_secs == 0 {
            anyhow::bail!("SIGNED_URL_TTL_SECS must be greater than zero");
        }
        if self.unlock_price_cents < 0 {
            anyhow::bail!("UNLOCK_PRICE_CENTS must not be negative");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// A configuration suitable for tests: local storage, permissive defaults.
    pub fn for_tests(database_url: String, storage_path: String) -> Self {
        Config {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: vec![],
            database_url,
            db_max_connections: 5,
            db_timeout_seconds: 5,
            jwt_secret: "test-secret-test-secret-test-secret!".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(storage_path),
            local_storage_base_url: Some("http://localhost:3000/files".to_string()),
            max_document_size_bytes: Self::DEFAULT_MAX_DOCUMENT_SIZE_BYTES,
            allowed_extensions: Self::default_allowed_extensions(),
            allowed_content_types: Self::default_allowed_content_types(),
            signed_url_ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
            unlock_price_cents: DEFAULT_UNLOCK_PRICE_CENTS,
            settlement_delay_ms: 0,
            operator_poll_interval_secs: DEFAULT_OPERATOR_POLL_INTERVAL_SECS,
            stale_pending_after_secs: DEFAULT_STALE_PENDING_AFTER_SECS,
            thumbnail_placeholder_url: DEFAULT_THUMBNAIL_PLACEHOLDER_URL.to_string(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_list_or(key: &str, default: fn() -> Vec<String>) -> Vec<String> {
    let values = env_list(key);
    if values.is_empty() {
        default()
    } else {
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::for_tests("postgres://localhost/unseal".into(), "/tmp/unseal".into());
        assert_eq!(config.max_document_size_bytes, 25 * 1024 * 1024);
        assert_eq!(config.signed_url_ttl_secs, 86_400);
        assert_eq!(config.operator_poll_interval_secs, 10);
        assert_eq!(config.allowed_extensions.len(), 6);
        assert_eq!(config.allowed_content_types.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_s3_settings() {
        let mut config =
            Config::for_tests("postgres://localhost/unseal".into(), "/tmp/unseal".into());
        config.storage_backend = StorageBackend::S3;
        assert!(config.validate().is_err());

        config.s3_bucket = Some("unseal-documents".to_string());
        config.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config =
            Config::for_tests("postgres://localhost/unseal".into(), "/tmp/unseal".into());
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config =
            Config::for_tests("postgres://localhost/unseal".into(), "/tmp/unseal".into());
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
