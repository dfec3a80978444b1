use crate::config::ProviderConfig;

/// Decides whether a candidate string is an in-scope photo URL
///
/// Matching is a closed prefix set: scheme, host, and the photo path segment
/// must all line up. Unrelated images on the same page never match.
#[derive(Debug, Clone)]
pub struct ProviderFilter {
    prefixes: Vec<String>,
}

impl Default for ProviderFilter {
    fn default() -> Self {
        Self::new(&ProviderConfig::default())
    }
}

impl ProviderFilter {
    /// Build the filter from a provider configuration
    pub fn new(config: &ProviderConfig) -> Self {
        let prefixes = config
            .hosts
            .iter()
            .map(|host| format!("https://{}{}", host, config.path_segment))
            .collect();

        Self { prefixes }
    }

    /// Determine if a candidate string is a provider photo URL
    ///
    /// Pure string predicate; no network, no allocation on the hot path.
    pub fn is_in_scope(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }

        self.prefixes
            .iter()
            .any(|prefix| candidate.starts_with(prefix.as_str()))
    }
}
