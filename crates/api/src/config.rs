//! Environment-driven configuration.
//!
//! Defaults suit local development (MinIO on 9000, Vite dev server on
//! 5173); production deployments override via environment variables.

use wardrobe_storage::StorageConfig;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an env var, with a default when unset. A malformed
/// value panics so a typo aborts startup.
fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} has an invalid value: '{raw}'")),
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default `0.0.0.0`).
    pub host: String,
    /// Bind port (default `3000`).
    pub port: u16,
    /// Allowed CORS origins, from the comma-separated `CORS_ORIGINS` var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load from `HOST`, `PORT`, `CORS_ORIGINS`, and
    /// `REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parsed_env("PORT", 3000),
            cors_origins: env_or("CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", 30),
        }
    }
}

/// Load object storage configuration.
///
/// | Env Var                       | Default                        |
/// |-------------------------------|--------------------------------|
/// | `S3_ENDPOINT`                 | `http://localhost:9000`        |
/// | `S3_REGION`                   | `us-east-1`                    |
/// | `S3_BUCKET`                   | `wardrobe`                     |
/// | `S3_ACCESS_KEY`               | `minioadmin`                   |
/// | `S3_SECRET_KEY`               | `minioadmin`                   |
/// | `S3_PUBLIC_BASE_URL`          | `{S3_ENDPOINT}/{S3_BUCKET}`    |
/// | `STORAGE_UPLOAD_TIMEOUT_SECS` | `60`                           |
pub fn storage_config_from_env() -> StorageConfig {
    let endpoint = env_or("S3_ENDPOINT", "http://localhost:9000");
    let bucket = env_or("S3_BUCKET", "wardrobe");
    let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
        .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

    StorageConfig {
        region: env_or("S3_REGION", "us-east-1"),
        access_key: env_or("S3_ACCESS_KEY", "minioadmin"),
        secret_key: env_or("S3_SECRET_KEY", "minioadmin"),
        upload_timeout_secs: parsed_env("STORAGE_UPLOAD_TIMEOUT_SECS", 60),
        endpoint,
        bucket,
        public_base_url,
    }
}
