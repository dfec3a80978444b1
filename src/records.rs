use crate::sources::NodeRef;
use serde::{Deserialize, Serialize};

/// The document location class a candidate URL was discovered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceClass {
    /// The rendered-image attribute of a matching element
    RenderedImage,
    /// A lazy-load data attribute
    DataAttribute,
    /// A computed background-image style value
    Background,
    /// The serialized page markup
    Markup,
}

impl SourceClass {
    /// Human-readable description of the location
    pub fn describe(&self) -> &'static str {
        match self {
            SourceClass::RenderedImage => "rendered image",
            SourceClass::DataAttribute => "data attribute",
            SourceClass::Background => "background image",
            SourceClass::Markup => "page markup",
        }
    }
}

/// Represents a photo discovered during a document scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// The URL as first observed, before normalization
    pub source_url: String,

    /// Normalized maximum-resolution form; unique within one scan result
    pub canonical_url: String,

    /// Human-readable description of where the photo was found
    pub label: String,

    /// Which of the four locations produced the record
    pub source_class: SourceClass,

    /// Opaque handle to the originating document node, if one exists
    #[serde(skip)]
    pub source_ref: Option<NodeRef>,
}

impl ImageRecord {
    /// Create a new image record
    pub fn new(
        source_url: String,
        canonical_url: String,
        label: String,
        source_class: SourceClass,
        source_ref: Option<NodeRef>,
    ) -> Self {
        Self {
            source_url,
            canonical_url,
            label,
            source_class,
            source_ref,
        }
    }
}
