use catalog_models::SortOrder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const PLACEHOLDER_TOKEN: &str = "YOUR_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Primary host, including the API root (e.g. "https://api.example.com/")
    pub base_url: String,
    /// Alternate hosts tried in order when the primary fails. Only scheme, host
    /// and port are taken from these; path and query come from the original request.
    #[serde(default)]
    pub fallback_hosts: Vec<String>,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Drop titles whose display name is not in Latin script
    #[serde(default = "default_true")]
    pub english_only: bool,
    #[serde(default)]
    pub default_order: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            english_only: default_true(),
            default_order: SortOrder::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed base URL, normalized to end with a slash so relative paths join under it
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| anyhow::anyhow!("Invalid base_url '{}': {}", self.base_url, e))
    }

    pub fn fallback_urls(&self) -> anyhow::Result<Vec<Url>> {
        self.fallback_hosts
            .iter()
            .map(|host| {
                Url::parse(host.trim())
                    .map_err(|e| anyhow::anyhow!("Invalid fallback host '{}': {}", host, e))
            })
            .collect()
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.example.com/".to_string(),
                fallback_hosts: Vec::new(),
                token: PLACEHOLDER_TOKEN.to_string(),
                connect_timeout_secs: default_timeout_secs(),
                request_timeout_secs: default_timeout_secs(),
            },
            browse: BrowseConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.token.trim().is_empty() || self.api.token == PLACEHOLDER_TOKEN {
            return Err(anyhow::anyhow!("api.token is not configured"));
        }

        let base = self.api.base_url()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!("api.base_url must use http or https"));
        }

        for host in self.api.fallback_urls()? {
            if host.host_str().is_none() {
                return Err(anyhow::anyhow!("Fallback host '{}' has no host part", host));
            }
        }

        if self.api.connect_timeout_secs == 0 || self.api.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Timeouts must be greater than zero"));
        }

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }
}
