use crate::utils::{truncate_chars, unix_millis};
use url::Url;

/// Longest identifier fragment carried into a filename
const ID_MAX_CHARS: usize = 16;

/// Longest sanitized label prefix
const LABEL_MAX_CHARS: usize = 40;

/// Extension every saved photo gets
const EXTENSION: &str = "jpg";

/// Derive a local filename for a canonical URL
///
/// Deterministic for a given (url, index, label) triple, and the ordinal
/// keeps names distinct even when two identifiers collide. Never fails: a
/// URL no identifier can be read from falls back to a timestamp name.
pub fn derive_filename(canonical_url: &str, index: usize, label: Option<&str>) -> String {
    let stem = match short_identifier(canonical_url) {
        Some(id) => format!("image_{}_{}", index + 1, id),
        None => {
            ::log::debug!(
                "No identifier found in '{}', falling back to timestamp name",
                canonical_url
            );
            format!("image_{}_{}", index + 1, unix_millis())
        }
    };

    match label.map(sanitize_label).filter(|l| !l.is_empty()) {
        Some(prefix) => format!("{}_{}.{}", prefix, stem, EXTENSION),
        None => format!("{}.{}", stem, EXTENSION),
    }
}

/// Short identifier: the last path segment up to the directive delimiter
fn short_identifier(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;

    let id = segment.split('=').next().unwrap_or("");
    if id.is_empty() {
        return None;
    }

    Some(truncate_chars(id, ID_MAX_CHARS).to_string())
}

/// Reduce a user-supplied label to a safe filename prefix
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    truncate_chars(&collapsed, LABEL_MAX_CHARS).to_string()
}
