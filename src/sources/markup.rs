use crate::sources::{DocumentSource, NodeRef};
use scraper::{ElementRef, Html, Selector};

/// Document source backed by parsed static markup
///
/// Backs both fixture-driven tests and file-based scans. Background values
/// come from inline `style` attributes, the only style input available
/// without a rendering engine.
pub struct MarkupDocument {
    html: Html,
    markup: String,
    all: Selector,
}

impl MarkupDocument {
    /// Parse markup into a queryable document
    pub fn new(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            markup: markup.to_string(),
            all: Selector::parse("*").unwrap(),
        }
    }

    /// Number of elements in the document
    pub fn element_count(&self) -> usize {
        self.html.select(&self.all).count()
    }

    /// Element behind a handle; handles index the document-order element list
    fn element(&self, node: NodeRef) -> Option<ElementRef<'_>> {
        self.html.select(&self.all).nth(node.0)
    }
}

impl DocumentSource for MarkupDocument {
    fn query_by_selector(&self, selector: &str) -> Vec<NodeRef> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                ::log::warn!("Skipping unparseable selector '{}': {}", selector, e);
                return Vec::new();
            }
        };

        let matched: Vec<_> = self.html.select(&parsed).map(|e| e.id()).collect();

        self.html
            .select(&self.all)
            .enumerate()
            .filter(|(_, e)| matched.contains(&e.id()))
            .map(|(i, _)| NodeRef(i))
            .collect()
    }

    fn read_attribute(&self, node: NodeRef, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|e| e.value().attr(name))
            .map(|v| v.to_string())
    }

    fn read_computed_background(&self, node: NodeRef) -> Option<String> {
        let style = self.read_attribute(node, "style")?;
        background_declaration(&style)
    }

    fn raw_markup(&self) -> &str {
        &self.markup
    }
}

/// Extracts the background-image declaration value from an inline style
fn background_declaration(style: &str) -> Option<String> {
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        if (property == "background-image" || property == "background") && value.contains("url(") {
            return Some(value.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html><body>
        <img id="a" src="https://img.test/one.jpg" alt="One">
        <div id="b" style="color: red; background-image: url('https://img.test/two.jpg')"></div>
        <p id="c">no style</p>
    </body></html>"#;

    #[test]
    fn test_query_and_attribute() {
        let doc = MarkupDocument::new(FIXTURE);
        let imgs = doc.query_by_selector("img");
        assert_eq!(imgs.len(), 1);
        assert_eq!(
            doc.read_attribute(imgs[0], "src").as_deref(),
            Some("https://img.test/one.jpg")
        );
        assert_eq!(doc.read_attribute(imgs[0], "alt").as_deref(), Some("One"));
        assert_eq!(doc.read_attribute(imgs[0], "data-src"), None);
    }

    #[test]
    fn test_inline_background() {
        let doc = MarkupDocument::new(FIXTURE);
        let divs = doc.query_by_selector("#b");
        assert_eq!(divs.len(), 1);
        let bg = doc.read_computed_background(divs[0]).unwrap();
        assert!(bg.contains("url('https://img.test/two.jpg')"));

        let plain = doc.query_by_selector("#c");
        assert_eq!(doc.read_computed_background(plain[0]), None);
    }

    #[test]
    fn test_invalid_selector_is_empty() {
        let doc = MarkupDocument::new(FIXTURE);
        assert!(doc.query_by_selector("img[").is_empty());
    }

    #[test]
    fn test_handles_are_document_ordered() {
        let doc = MarkupDocument::new(FIXTURE);
        let img = doc.query_by_selector("#a")[0];
        let div = doc.query_by_selector("#b")[0];
        assert!(img.0 < div.0);
    }

    #[test]
    fn test_raw_markup_round_trip() {
        let doc = MarkupDocument::new(FIXTURE);
        assert!(doc.raw_markup().contains("https://img.test/one.jpg"));
    }

    #[test]
    fn test_background_shorthand() {
        assert_eq!(
            background_declaration("background: url(https://img.test/x.jpg) no-repeat"),
            Some("url(https://img.test/x.jpg) no-repeat".to_string())
        );
        assert_eq!(background_declaration("background: none"), None);
        assert_eq!(background_declaration("color: blue"), None);
    }
}
