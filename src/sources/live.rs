use crate::sources::{DocumentSource, MarkupDocument, NodeRef};
use fantoccini::{Client, ClientBuilder};
use std::error::Error;
use std::time::Duration;

/// Script run in the page to snapshot computed background-image values,
/// element by element in document order. Computed styles never survive
/// serialization, so they have to be read while the session is open.
const BACKGROUND_SNAPSHOT: &str = "\
return Array.from(document.querySelectorAll('*')).map(function (el) { \
    var value = window.getComputedStyle(el).backgroundImage; \
    return value && value !== 'none' ? value : null; \
});";

/// Document source captured from a live page over WebDriver
///
/// The capture is taken once; scans run against the captured state, so the
/// page mutating afterwards cannot affect a scan in progress.
pub struct LiveDocument {
    inner: MarkupDocument,
    backgrounds: Vec<Option<String>>,
}

impl LiveDocument {
    /// Navigate to a page and capture it for scanning
    ///
    /// The session is closed before the captured markup is parsed, so the
    /// returned document has no remaining tie to the browser.
    pub async fn capture(
        webdriver_url: &str,
        page_url: &str,
        settle_ms: u64,
    ) -> Result<Self, Box<dyn Error>> {
        ::log::info!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::native().connect(webdriver_url).await?;

        let captured = Self::capture_with(&client, page_url, settle_ms).await;
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        let (markup, backgrounds) = captured?;
        let inner = MarkupDocument::new(&markup);
        if inner.element_count() != backgrounds.len() {
            // The serialized markup can parse to a slightly different element
            // list than the live DOM reported; positions past the shorter
            // list fall back to inline styles.
            ::log::debug!(
                "Captured {} background entries for {} parsed elements",
                backgrounds.len(),
                inner.element_count()
            );
        }

        ::log::info!("Captured page with {} elements", inner.element_count());
        Ok(Self { inner, backgrounds })
    }

    /// Raw capture: serialized markup plus the background snapshot
    async fn capture_with(
        client: &Client,
        page_url: &str,
        settle_ms: u64,
    ) -> Result<(String, Vec<Option<String>>), Box<dyn Error>> {
        ::log::debug!("CAPTURE: {}", page_url);
        client.goto(page_url).await?;

        // Give lazily loaded photos a chance to materialize
        if settle_ms > 0 {
            tokio::time::sleep(Duration::from_millis(settle_ms)).await;
        }

        let snapshot = client.execute(BACKGROUND_SNAPSHOT, vec![]).await?;
        let backgrounds = parse_snapshot(snapshot);
        let markup = client.source().await?;

        Ok((markup, backgrounds))
    }
}

impl DocumentSource for LiveDocument {
    fn query_by_selector(&self, selector: &str) -> Vec<NodeRef> {
        self.inner.query_by_selector(selector)
    }

    fn read_attribute(&self, node: NodeRef, name: &str) -> Option<String> {
        self.inner.read_attribute(node, name)
    }

    fn read_computed_background(&self, node: NodeRef) -> Option<String> {
        if let Some(Some(value)) = self.backgrounds.get(node.0) {
            return Some(value.clone());
        }
        self.inner.read_computed_background(node)
    }

    fn raw_markup(&self) -> &str {
        self.inner.raw_markup()
    }
}

/// Converts the snapshot script's return value into per-element entries
fn parse_snapshot(value: serde_json::Value) -> Vec<Option<String>> {
    match value {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .map(|entry| entry.as_str().map(|s| s.to_string()))
            .collect(),
        other => {
            ::log::warn!("Unexpected background snapshot shape: {}", other);
            Vec::new()
        }
    }
}
