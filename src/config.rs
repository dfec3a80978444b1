use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Provider scope: which hosts and path segment identify contributor photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Hostnames that serve the photos
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Path segment immediately after the host that marks photo content
    #[serde(default = "default_path_segment")]
    pub path_segment: String,
}

/// Grammar for the trailing size directive and its canonical replacement
///
/// Kept as configuration so a provider-side grammar change is a config edit,
/// not a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Regex matching the trailing size/transform directive to strip
    #[serde(default = "default_strip_pattern")]
    pub strip_pattern: String,

    /// Directive appended to produce the maximum-resolution form
    #[serde(default = "default_canonical_directive")]
    pub canonical_directive: String,
}

/// Configuration for the document scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Data attributes that may hold lazily loaded image URLs
    #[serde(default = "default_data_attributes")]
    pub data_attributes: Vec<String>,
}

/// Configuration for the sequential download run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Delay between downloads in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory the downloaded files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// Top-level configuration for the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    /// URL for the WebDriver instance used for live-page capture
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// How long to let the page settle before capturing it, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl ExtractorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            path_segment: default_path_segment(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strip_pattern: default_strip_pattern(),
            canonical_directive: default_canonical_directive(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            data_attributes: default_data_attributes(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            user_agent: default_user_agent(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            resolution: ResolutionConfig::default(),
            scan: ScanConfig::default(),
            download: DownloadConfig::default(),
            webdriver_url: default_webdriver_url(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Default photo hosts
fn default_hosts() -> Vec<String> {
    vec![
        "lh3.googleusercontent.com".to_string(),
        "lh4.googleusercontent.com".to_string(),
        "lh5.googleusercontent.com".to_string(),
        "lh6.googleusercontent.com".to_string(),
    ]
}

/// Default path segment for contributor photos
fn default_path_segment() -> String {
    "/gps-cs/".to_string()
}

/// Default size-directive grammar: a run of dash-joined tokens opened by a
/// width/height marker, optionally ending in a slash
fn default_strip_pattern() -> String {
    r"=[wh]\d+(-[wh]\d+)*(-[a-z-]+)*/?$".to_string()
}

/// Default canonical resolution directive
fn default_canonical_directive() -> String {
    "s2048-v1".to_string()
}

/// Default lazy-load data attributes to inspect
fn default_data_attributes() -> Vec<String> {
    vec![
        "data-src".to_string(),
        "data-lazy-src".to_string(),
        "data-original".to_string(),
    ]
}

/// Default delay between downloads
fn default_delay_ms() -> u64 {
    1000
}

/// Default User-Agent header value
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

/// Default output directory
fn default_output_dir() -> String {
    "photos".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default settle wait before a live capture
fn default_settle_ms() -> u64 {
    2000
}
