use crate::config::ResolutionConfig;
use regex::Regex;

/// Rewrites provider photo URLs into their canonical maximum-resolution form
///
/// The trailing size directive is replaced wholesale; the host and path are
/// never touched.
#[derive(Debug, Clone)]
pub struct ResolutionRewriter {
    strip: Regex,
    canonical_suffix: String,
}

impl Default for ResolutionRewriter {
    fn default() -> Self {
        Self::new(&ResolutionConfig::default()).expect("Default strip pattern should be valid")
    }
}

impl ResolutionRewriter {
    /// Build the rewriter from a resolution configuration
    pub fn new(config: &ResolutionConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            strip: Regex::new(&config.strip_pattern)?,
            canonical_suffix: format!("={}", config.canonical_directive),
        })
    }

    /// Rewrite a URL to its canonical form
    ///
    /// Total: the worst case is the input with the canonical directive
    /// appended once. Idempotent: already-canonical URLs come back unchanged.
    pub fn to_canonical(&self, url: &str) -> String {
        // Host-page templating sometimes emits the directive delimiter
        // URL-encoded
        let url = url.trim().replace("%3D", "=").replace("%3d", "=");

        if url.ends_with(&self.canonical_suffix) {
            return url;
        }

        let stripped = self.strip.replace(&url, "");
        let stripped = stripped.trim_end_matches('/');

        format!("{}{}", stripped, self.canonical_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> ResolutionRewriter {
        ResolutionRewriter::default()
    }

    #[test]
    fn test_strips_size_directive() {
        assert_eq!(
            rewriter().to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123=w400-h300-no"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
    }

    #[test]
    fn test_strips_directive_with_transform_flags() {
        assert_eq!(
            rewriter()
                .to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123=w1200-h969-p-k-no"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
    }

    #[test]
    fn test_strips_directive_with_trailing_slash() {
        assert_eq!(
            rewriter().to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123=w400-h300/"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
    }

    #[test]
    fn test_appends_when_no_directive_present() {
        assert_eq!(
            rewriter().to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
        // A bare trailing slash is dropped before appending
        assert_eq!(
            rewriter().to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123/"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
    }

    #[test]
    fn test_decodes_encoded_delimiter() {
        assert_eq!(
            rewriter()
                .to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123%3Dw400-h300"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
        assert_eq!(
            rewriter()
                .to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123%3dw400-h300"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1"
        );
    }

    #[test]
    fn test_idempotent() {
        let rewriter = rewriter();
        let inputs = [
            "https://lh3.googleusercontent.com/gps-cs/ABC123=w400-h300-no",
            "https://lh3.googleusercontent.com/gps-cs/ABC123",
            "https://lh3.googleusercontent.com/gps-cs/ABC123/",
            "https://lh3.googleusercontent.com/gps-cs/ABC123%3Dw400-h300",
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s2048-v1",
        ];

        for input in inputs {
            let once = rewriter.to_canonical(input);
            let twice = rewriter.to_canonical(&once);
            assert_eq!(once, twice, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_host_and_path_untouched() {
        // A width-like token inside the path must not be stripped
        assert_eq!(
            rewriter().to_canonical("https://lh3.googleusercontent.com/gps-cs/w400abc"),
            "https://lh3.googleusercontent.com/gps-cs/w400abc=s2048-v1"
        );
    }

    #[test]
    fn test_custom_directive() {
        let config = ResolutionConfig {
            canonical_directive: "s4096".to_string(),
            ..ResolutionConfig::default()
        };
        let rewriter = ResolutionRewriter::new(&config).unwrap();

        assert_eq!(
            rewriter.to_canonical("https://lh3.googleusercontent.com/gps-cs/ABC123=w400-h300"),
            "https://lh3.googleusercontent.com/gps-cs/ABC123=s4096"
        );
    }
}
