//! Content fingerprints for the analysis cache.
//!
//! A fingerprint is the hex SHA-256 of the normalized input. Multi-field input
//! is joined with [`FIELD_SEPARATOR`] before hashing. Normalized fields never
//! contain a newline, so the separator cannot occur inside a field and the
//! field order is always recoverable from the hashed bytes.

use sha2::{Digest, Sha256};

/// Separator placed between normalized fields before hashing.
pub const FIELD_SEPARATOR: &str = "\n\n";

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hash already-normalized fields in order.
pub fn fingerprint<S: AsRef<str>>(normalized_fields: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (idx, field) in normalized_fields.iter().enumerate() {
        if idx > 0 {
            hasher.update(FIELD_SEPARATOR.as_bytes());
        }
        hasher.update(field.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Check that a string looks like a fingerprint (64 lowercase hex chars).
pub fn is_valid_fingerprint(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// An analysis request as seen by the cache: raw fields, their normalized
/// forms, and the resulting content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub raw_input: Vec<String>,
    pub normalized_input: Vec<String>,
    pub content_hash: String,
}

impl AnalysisRequest {
    pub fn new<S: AsRef<str>>(fields: &[S]) -> Self {
        let raw_input: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
        let normalized_input: Vec<String> = raw_input.iter().map(|f| normalize(f)).collect();
        let content_hash = fingerprint(&normalized_input);
        Self { raw_input, normalized_input, content_hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("hello   world"), "hello world");
        assert_eq!(normalize("  hello\t\n world \r\n"), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_normalize_unicode_whitespace() {
        assert_eq!(normalize("مرحبا\u{00a0}\u{2003}بالعالم"), "مرحبا بالعالم");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("  a  b\n\nc ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_same_normalized_input_same_fingerprint() {
        let a = AnalysisRequest::new(&["hello   world"]);
        let b = AnalysisRequest::new(&["hello world"]);
        let c = AnalysisRequest::new(&["\thello world\n"]);
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(b.content_hash, c.content_hash);
    }

    #[test]
    fn test_different_normalized_input_different_fingerprint() {
        let a = AnalysisRequest::new(&["hello world"]);
        let b = AnalysisRequest::new(&["hello world!"]);
        let c = AnalysisRequest::new(&["helloworld"]);
        assert_ne!(a.content_hash, b.content_hash);
        assert_ne!(a.content_hash, c.content_hash);
    }

    #[test]
    fn test_swapped_fields_differ() {
        let original = AnalysisRequest::new(&["my posts about growth", "competitor posts about pricing"]);
        let swapped = AnalysisRequest::new(&["competitor posts about pricing", "my posts about growth"]);
        assert_ne!(original.content_hash, swapped.content_hash);
    }

    #[test]
    fn test_field_boundary_matters() {
        let a = fingerprint(&["ab", "c"]);
        let b = fingerprint(&["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_field_is_not_dropped() {
        let a = fingerprint(&["", "x"]);
        let b = fingerprint(&["x", ""]);
        let c = fingerprint(&["x"]);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_single_field_matches_plain_sha256() {
        let hash = fingerprint(&["hello world"]);
        assert_eq!(hash, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    }

    #[test]
    fn test_fingerprint_format() {
        let hash = AnalysisRequest::new(&["some text"]).content_hash;
        assert!(is_valid_fingerprint(&hash));
        assert!(!is_valid_fingerprint("abc"));
        assert!(!is_valid_fingerprint(&hash.to_uppercase()));
    }

    #[test]
    fn test_request_keeps_raw_input() {
        let req = AnalysisRequest::new(&["  spaced   out  "]);
        assert_eq!(req.raw_input, vec!["  spaced   out  ".to_string()]);
        assert_eq!(req.normalized_input, vec!["spaced out".to_string()]);
    }
}
