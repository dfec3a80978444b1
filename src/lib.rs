#![allow(clippy::too_many_arguments)]

// Re-export modules
pub mod config;
pub mod downloader;
pub mod filename;
pub mod filter;
pub mod records;
pub mod resolution;
pub mod scanner;
pub mod sources;
pub mod utils;

// Re-export commonly used types for convenience
pub use records::{ImageRecord, SourceClass};

use crate::config::ExtractorConfig;
use crate::scanner::Scanner;
use crate::sources::{LiveDocument, MarkupDocument};
use std::error::Error;

/// Where the document to scan comes from
#[derive(Debug, Clone)]
pub enum DocumentKind {
    /// A live page, captured over WebDriver
    Live(String),
    /// Static markup already in hand
    Markup(String),
}

/// Main builder for scanning a document for provider photos
pub struct Gallery {
    kind: DocumentKind,
    config: ExtractorConfig,
}

impl Gallery {
    /// Create a new Gallery builder for the given document
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            config: ExtractorConfig::default(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let config = ExtractorConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// The effective configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Capture the document and scan it for photos
    ///
    /// Each invocation produces a fresh record list; nothing is retained
    /// between scans.
    pub async fn scan(&self) -> Result<Vec<ImageRecord>, Box<dyn Error>> {
        let scanner = Scanner::new(&self.config)?;

        match &self.kind {
            DocumentKind::Live(url) => {
                let mut webdriver_url = self.config.webdriver_url.clone();

                // Override the WebDriver URL with an environment variable if provided
                if let Ok(from_env) = std::env::var("WEBDRIVER_URL") {
                    if !from_env.is_empty() {
                        webdriver_url = from_env;
                    }
                }

                let doc =
                    LiveDocument::capture(&webdriver_url, url, self.config.settle_ms).await?;
                Ok(scanner.scan(&doc))
            }
            DocumentKind::Markup(markup) => {
                let doc = MarkupDocument::new(markup);
                Ok(scanner.scan(&doc))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_static_markup() {
        let markup = r#"<html><body>
            <img src="https://lh3.googleusercontent.com/gps-cs/TOP11111=w400-h300" alt="Square">
        </body></html>"#;

        let gallery = Gallery::new(DocumentKind::Markup(markup.to_string()));
        let records = gallery.scan().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].canonical_url,
            "https://lh3.googleusercontent.com/gps-cs/TOP11111=s2048-v1"
        );
    }
}
