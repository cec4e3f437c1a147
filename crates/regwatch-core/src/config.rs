use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// RSS feed to watch
    #[serde(default = "default_feed_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_feed_timeout")]
    pub request_timeout_secs: u64,
    /// Largest feed body accepted, in bytes
    #[serde(default = "default_max_feed_bytes")]
    pub max_bytes: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            request_timeout_secs: default_feed_timeout(),
            max_bytes: default_max_feed_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Trailing window in weeks
    #[serde(default = "default_window_weeks")]
    pub window_weeks: u32,
    /// Words or phrases matched case-insensitively on word boundaries
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_weeks: default_window_weeks(),
            keywords: default_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Look up the PDF behind each entry page
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Request timeout in seconds for entry pages
    #[serde(default = "default_pdf_timeout")]
    pub request_timeout_secs: u64,
    /// Entry pages fetched at the same time
    #[serde(default = "default_pdf_concurrency")]
    pub concurrency: usize,
    /// Follow `?file=...pdf` viewer frames to the document they display
    #[serde(default = "default_true")]
    pub unwrap_viewer_urls: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            request_timeout_secs: default_pdf_timeout(),
            concurrency: default_pdf_concurrency(),
            unwrap_viewer_urls: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show timestamps in the system time zone instead of UTC
    #[serde(default)]
    pub local_time: bool,
    /// Wrap width for descriptions rendered as text
    #[serde(default = "default_description_width")]
    pub description_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            local_time: false,
            description_width: default_description_width(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_feed_url() -> String {
    "https://www.sebi.gov.in/sebirss.xml".to_string()
}

fn default_feed_timeout() -> u64 {
    30
}

fn default_max_feed_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_window_weeks() -> u32 {
    3
}

fn default_keywords() -> Vec<String> {
    [
        "circular",
        "master circular",
        "regulation",
        "regulations",
        "amendment",
        "amendments",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_pdf_timeout() -> u64 {
    10
}

fn default_pdf_concurrency() -> usize {
    4
}

fn default_description_width() -> usize {
    100
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        Url::parse(&self.feed.url)
            .map_err(|e| crate::Error::Config(format!("Invalid feed URL '{}': {}", self.feed.url, e)))?;

        if self.filter.window_weeks == 0 {
            return Err(crate::Error::Config(
                "filter.window_weeks must be at least 1".to_string(),
            ));
        }
        if self.pdf.concurrency == 0 {
            return Err(crate::Error::Config(
                "pdf.concurrency must be at least 1".to_string(),
            ));
        }
        if self.feed.request_timeout_secs == 0 || self.pdf.request_timeout_secs == 0 {
            return Err(crate::Error::Config(
                "request timeouts must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/regwatch/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("regwatch")
            .join("config.toml")
    }
}
