use std::env;
use std::time::Duration;

use crate::stores::DEFAULT_NAMESPACE;
use crate::wizard::DEFAULT_IDLE_TTL;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent means in-memory storage and no audit log.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub storage_prefix: String,
    pub catalog_url: Option<String>,
    pub catalog_path: Option<String>,
    pub comparison_url: Option<String>,
    pub comparison_delay: Duration,
    pub http_timeout: Duration,
    /// Wizard sessions untouched for this long are evicted.
    pub wizard_idle_ttl: Duration,
    /// Allowed browser origins. Empty allows any.
    pub cors_origins: Vec<String>,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let comparison_delay_ms = env::var("COMPARISON_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1500);
        let wizard_idle_ttl_secs = env::var("WIZARD_IDLE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30 * 60);
        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url: optional("DATABASE_URL"),
            host,
            port,
            storage_prefix: optional("STORAGE_PREFIX").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            catalog_url: optional("CATALOG_URL"),
            catalog_path: optional("CATALOG_PATH"),
            comparison_url: optional("COMPARISON_URL"),
            comparison_delay: Duration::from_millis(comparison_delay_ms),
            http_timeout: Duration::from_secs(http_timeout_secs),
            wizard_idle_ttl: Duration::from_secs(wizard_idle_ttl_secs),
            cors_origins: optional("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

impl Default for AppConfig {
    /// In-memory storage, bundled catalog, mock comparisons without delay.
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".to_string(),
            port: 3000,
            storage_prefix: DEFAULT_NAMESPACE.to_string(),
            catalog_url: None,
            catalog_path: None,
            comparison_url: None,
            comparison_delay: Duration::ZERO,
            http_timeout: Duration::from_secs(10),
            wizard_idle_ttl: DEFAULT_IDLE_TTL,
            cors_origins: Vec::new(),
        }
    }
}
