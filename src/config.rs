use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchSettings,
    pub email: EmailSettings,
    pub store: StoreSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_json_payload_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub base_url: String,
    /// Empty means degraded mode: searches answer with no results.
    pub api_key: String,
    pub timeout_secs: u64,
    pub max_limit: u32,
    pub max_page_size: u32,
    pub default_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    pub base_url: String,
    pub api_key: String,
    pub from: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Path of the SQLite database. Empty disables persistence.
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSettings {
    pub digest_max_subscribers: usize,
    pub digest_picks: u32,
    pub watch_max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
                workers: num_cpus::get(),
                max_json_payload_size: 256_000,
            },
            search: SearchSettings {
                base_url: "https://api.trychannel3.com/v0".to_string(),
                api_key: String::new(),
                timeout_secs: 15,
                max_limit: 120,
                max_page_size: 50,
                default_currency: "USD".to_string(),
            },
            email: EmailSettings {
                base_url: "https://api.resend.com".to_string(),
                api_key: String::new(),
                from: "Student Tech <noreply@example.com>".to_string(),
                batch_size: 50,
                timeout_secs: 10,
            },
            store: StoreSettings {
                path: "data/campus_deals.db".to_string(),
            },
            jobs: JobSettings {
                digest_max_subscribers: 1000,
                digest_picks: 6,
                watch_max_rows: 500,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        // Server configuration
        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port.parse()?;
        }
        if let Ok(workers) = env::var("WORKERS") {
            config.server.workers = workers.parse()?;
        }
        if let Ok(max_json_payload_size) = env::var("MAX_JSON_PAYLOAD_SIZE") {
            config.server.max_json_payload_size = max_json_payload_size.parse()?;
        }

        // Search provider
        if let Ok(base_url) = env::var("SEARCH_API_BASE") {
            if !base_url.trim().is_empty() {
                config.search.base_url = base_url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(api_key) = env::var("SEARCH_API_KEY") {
            config.search.api_key = api_key.trim().to_string();
        }
        if let Ok(timeout_secs) = env::var("SEARCH_TIMEOUT_SECS") {
            config.search.timeout_secs = timeout_secs.parse()?;
        }
        if let Ok(max_limit) = env::var("SEARCH_MAX_LIMIT") {
            config.search.max_limit = max_limit.parse()?;
        }
        if let Ok(currency) = env::var("DEFAULT_CURRENCY") {
            config.search.default_currency = currency.trim().to_string();
        }

        // Email provider
        if let Ok(base_url) = env::var("EMAIL_API_BASE") {
            if !base_url.trim().is_empty() {
                config.email.base_url = base_url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(api_key) = env::var("EMAIL_API_KEY") {
            config.email.api_key = api_key.trim().to_string();
        }
        if let Ok(from) = env::var("EMAIL_FROM") {
            config.email.from = from;
        }
        if let Ok(batch_size) = env::var("EMAIL_BATCH_SIZE") {
            config.email.batch_size = batch_size.parse()?;
        }

        // Store and jobs
        if let Ok(path) = env::var("STORE_PATH") {
            config.store.path = path.trim().to_string();
        }
        if let Ok(max) = env::var("DIGEST_MAX_SUBSCRIBERS") {
            config.jobs.digest_max_subscribers = max.parse()?;
        }
        if let Ok(max) = env::var("WATCH_MAX_ROWS") {
            config.jobs.watch_max_rows = max.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every request fail later on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.search.base_url.starts_with("http://")
            && !self.search.base_url.starts_with("https://")
        {
            anyhow::bail!("SEARCH_API_BASE must be an http(s) URL");
        }
        if !self.email.base_url.starts_with("http://")
            && !self.email.base_url.starts_with("https://")
        {
            anyhow::bail!("EMAIL_API_BASE must be an http(s) URL");
        }
        if self.search.max_limit == 0 {
            anyhow::bail!("SEARCH_MAX_LIMIT must be positive");
        }
        if self.search.timeout_secs == 0 {
            anyhow::bail!("SEARCH_TIMEOUT_SECS must be positive");
        }
        if self.email.batch_size == 0 || self.email.batch_size > 50 {
            anyhow::bail!("EMAIL_BATCH_SIZE must be between 1 and 50");
        }
        if self.search.default_currency.is_empty() {
            anyhow::bail!("DEFAULT_CURRENCY must not be empty");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
