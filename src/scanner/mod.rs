#[cfg(test)]
mod tests;

use crate::config::{ExtractorConfig, ProviderConfig};
use crate::filter::ProviderFilter;
use crate::records::{ImageRecord, SourceClass};
use crate::resolution::ResolutionRewriter;
use crate::sources::{DocumentSource, NodeRef};
use regex::Regex;
use std::collections::HashSet;

/// Walks a document source and produces the deduplicated, ordered list of
/// discovered photos
///
/// Four source classes are inspected in a fixed order: rendered-image
/// attributes, lazy-load data attributes, computed backgrounds, then the raw
/// markup. Deduplication is keyed on the canonical URL, first discovery
/// wins, and the same photo observed at several transient sizes collapses
/// to one record.
pub struct Scanner {
    filter: ProviderFilter,
    rewriter: ResolutionRewriter,
    image_selectors: Vec<String>,
    data_attributes: Vec<String>,
    markup_pattern: Regex,
    background_url: Regex,
}

impl Scanner {
    /// Build a scanner from the extractor configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self, regex::Error> {
        let image_selectors = config
            .provider
            .hosts
            .iter()
            .map(|host| format!("img[src*=\"{}{}\"]", host, config.provider.path_segment))
            .collect();

        Ok(Self {
            filter: ProviderFilter::new(&config.provider),
            rewriter: ResolutionRewriter::new(&config.resolution)?,
            image_selectors,
            data_attributes: config.scan.data_attributes.clone(),
            markup_pattern: Regex::new(&markup_pattern_for(&config.provider))?,
            background_url: Regex::new(r#"url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#)
                .expect("Background url() pattern should be valid"),
        })
    }

    /// Scan a document and return every in-scope photo, first-seen order
    ///
    /// Read-only with respect to the document; returns an empty list when
    /// nothing matches.
    pub fn scan(&self, doc: &dyn DocumentSource) -> Vec<ImageRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        self.scan_rendered_images(doc, &mut seen, &mut records);
        self.scan_data_attributes(doc, &mut seen, &mut records);
        self.scan_backgrounds(doc, &mut seen, &mut records);
        self.scan_markup(doc, &mut seen, &mut records);

        ::log::info!("Found {} photos in document", records.len());
        records
    }

    /// Source class 1: the rendered-image attribute of matching elements
    fn scan_rendered_images(
        &self,
        doc: &dyn DocumentSource,
        seen: &mut HashSet<String>,
        records: &mut Vec<ImageRecord>,
    ) {
        for selector in &self.image_selectors {
            for node in doc.query_by_selector(selector) {
                let Some(src) = doc.read_attribute(node, "src") else {
                    continue;
                };

                // The alt text, when the page carries one, makes a better
                // label than the location description
                let label = doc
                    .read_attribute(node, "alt")
                    .filter(|alt| !alt.trim().is_empty())
                    .unwrap_or_else(|| SourceClass::RenderedImage.describe().to_string());

                self.admit(
                    &src,
                    label,
                    SourceClass::RenderedImage,
                    Some(node),
                    seen,
                    records,
                );
            }
        }
    }

    /// Source class 2: lazy-load data attributes on arbitrary elements
    fn scan_data_attributes(
        &self,
        doc: &dyn DocumentSource,
        seen: &mut HashSet<String>,
        records: &mut Vec<ImageRecord>,
    ) {
        for node in doc.query_by_selector("*") {
            for attribute in &self.data_attributes {
                let Some(value) = doc.read_attribute(node, attribute) else {
                    continue;
                };

                let label = format!("{} ({})", SourceClass::DataAttribute.describe(), attribute);
                self.admit(
                    &value,
                    label,
                    SourceClass::DataAttribute,
                    Some(node),
                    seen,
                    records,
                );
            }
        }
    }

    /// Source class 3: computed background-image values
    fn scan_backgrounds(
        &self,
        doc: &dyn DocumentSource,
        seen: &mut HashSet<String>,
        records: &mut Vec<ImageRecord>,
    ) {
        for node in doc.query_by_selector("*") {
            let Some(background) = doc.read_computed_background(node) else {
                continue;
            };

            let Some(url) = self
                .background_url
                .captures(&background)
                .and_then(|captures| captures.get(1))
            else {
                continue;
            };

            self.admit(
                url.as_str(),
                SourceClass::Background.describe().to_string(),
                SourceClass::Background,
                Some(node),
                seen,
                records,
            );
        }
    }

    /// Source class 4: a raw-markup sweep
    ///
    /// Catches URLs referenced from inline scripts or attributes that have
    /// not materialized as live elements; the only class that yields records
    /// without a node reference.
    fn scan_markup(
        &self,
        doc: &dyn DocumentSource,
        seen: &mut HashSet<String>,
        records: &mut Vec<ImageRecord>,
    ) {
        for found in self.markup_pattern.find_iter(doc.raw_markup()) {
            self.admit(
                found.as_str(),
                SourceClass::Markup.describe().to_string(),
                SourceClass::Markup,
                None,
                seen,
                records,
            );
        }
    }

    /// Classify, normalize, and deduplicate one candidate
    fn admit(
        &self,
        candidate: &str,
        label: String,
        source_class: SourceClass,
        source_ref: Option<NodeRef>,
        seen: &mut HashSet<String>,
        records: &mut Vec<ImageRecord>,
    ) {
        if !self.filter.is_in_scope(candidate) {
            ::log::debug!("Out of scope: {}", candidate);
            return;
        }

        let canonical = self.rewriter.to_canonical(candidate);
        if !seen.insert(canonical.clone()) {
            ::log::debug!("Already recorded: {}", canonical);
            return;
        }

        records.push(ImageRecord::new(
            candidate.trim().to_string(),
            canonical,
            label,
            source_class,
            source_ref,
        ));
    }
}

/// Regex source for the raw-markup sweep, built from the provider scope
fn markup_pattern_for(provider: &ProviderConfig) -> String {
    let hosts = provider
        .hosts
        .iter()
        .map(|host| regex::escape(host))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r#"https://(?:{})(?:{})[^"'\s<>\\]+"#,
        hosts,
        regex::escape(&provider.path_segment)
    )
}
