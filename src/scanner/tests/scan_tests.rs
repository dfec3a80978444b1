use crate::config::ExtractorConfig;
use crate::records::SourceClass;
use crate::scanner::Scanner;
use crate::sources::MarkupDocument;

fn scanner() -> Scanner {
    Scanner::new(&ExtractorConfig::default()).unwrap()
}

/// One photo per source class, plus an out-of-scope image
const FULL_PAGE: &str = r#"<html><body>
    <img src="https://lh3.googleusercontent.com/gps-cs/FIRST1111=w400-h300-no" alt="Harbour at dusk">
    <img src="https://example.com/unrelated.jpg" alt="Not ours">
    <div data-src="https://lh4.googleusercontent.com/gps-cs/SECOND222=w100-h100"></div>
    <div style="background-image: url('https://lh5.googleusercontent.com/gps-cs/THIRD3333=w640-h480-k-no')"></div>
    <script>var next = "https://lh6.googleusercontent.com/gps-cs/FOURTH444=w123-h456";</script>
</body></html>"#;

#[test]
fn test_finds_all_four_source_classes() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    assert_eq!(records.len(), 4);
    assert_eq!(
        records
            .iter()
            .map(|r| r.canonical_url.as_str())
            .collect::<Vec<_>>(),
        vec![
            "https://lh3.googleusercontent.com/gps-cs/FIRST1111=s2048-v1",
            "https://lh4.googleusercontent.com/gps-cs/SECOND222=s2048-v1",
            "https://lh5.googleusercontent.com/gps-cs/THIRD3333=s2048-v1",
            "https://lh6.googleusercontent.com/gps-cs/FOURTH444=s2048-v1",
        ]
    );
}

#[test]
fn test_order_follows_source_class_precedence() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    assert_eq!(
        records.iter().map(|r| r.source_class).collect::<Vec<_>>(),
        vec![
            SourceClass::RenderedImage,
            SourceClass::DataAttribute,
            SourceClass::Background,
            SourceClass::Markup,
        ]
    );
}

#[test]
fn test_labels() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    // Alt text wins for rendered images; the rest describe their location
    assert_eq!(records[0].label, "Harbour at dusk");
    assert_eq!(records[1].label, "data attribute (data-src)");
    assert_eq!(records[2].label, "background image");
    assert_eq!(records[3].label, "page markup");
}

#[test]
fn test_node_references() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    // Only the markup sweep yields records without a live node
    assert!(records[0].source_ref.is_some());
    assert!(records[1].source_ref.is_some());
    assert!(records[2].source_ref.is_some());
    assert!(records[3].source_ref.is_none());
}

#[test]
fn test_source_urls_are_preserved_unnormalized() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    assert_eq!(
        records[0].source_url,
        "https://lh3.googleusercontent.com/gps-cs/FIRST1111=w400-h300-no"
    );
}

#[test]
fn test_scan_is_deterministic() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let scanner = scanner();

    let first = scanner.scan(&doc);
    let second = scanner.scan(&doc);
    assert_eq!(first, second);
}

#[test]
fn test_out_of_scope_images_are_excluded() {
    let doc = MarkupDocument::new(FULL_PAGE);
    let records = scanner().scan(&doc);

    assert!(
        records
            .iter()
            .all(|r| !r.source_url.contains("example.com"))
    );
}
