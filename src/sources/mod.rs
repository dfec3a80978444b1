pub mod live;
pub mod markup;

pub use live::LiveDocument;
pub use markup::MarkupDocument;

/// Opaque handle to an element inside a document source
///
/// Handles are only meaningful to the source that minted them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) usize);

/// Read-only view over a host document
///
/// The scanner never touches a page directly; it goes through this trait so
/// it can run against synthetic fixtures as easily as a captured page.
pub trait DocumentSource {
    /// Elements matching a CSS selector, in document order
    fn query_by_selector(&self, selector: &str) -> Vec<NodeRef>;

    /// Value of an attribute on an element, if present
    fn read_attribute(&self, node: NodeRef, name: &str) -> Option<String>;

    /// The element's effective background-image value, if any
    fn read_computed_background(&self, node: NodeRef) -> Option<String>;

    /// The full serialized markup of the document
    fn raw_markup(&self) -> &str;
}
