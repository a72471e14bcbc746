//! Key Pattern Module
//!
//! Compiled glob patterns for bulk invalidation. The pattern language is
//! deliberately restricted to literal text and `*` wildcards matched by
//! ordered substring search, so untrusted input can never become a
//! pathological regular expression.

use crate::error::{BackstopError, Result};

// == Key Pattern ==
/// A compiled invalidation pattern.
///
/// `*` matches any (possibly empty) run of characters; everything else is
/// literal. `store:42:*` matches every key with that prefix; `*:sales:*`
/// matches any key containing `:sales:`.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    /// Literal fragments in order of appearance
    segments: Vec<String>,
    /// Pattern began with `*` (first segment is not anchored to the start)
    leading_wildcard: bool,
    /// Pattern ended with `*` (last segment is not anchored to the end)
    trailing_wildcard: bool,
}

impl KeyPattern {
    // == Compile ==
    /// Compiles a glob pattern.
    ///
    /// The empty pattern is rejected: a caller passing one almost certainly
    /// built the pattern string incorrectly, and matching nothing silently
    /// would mask a failed invalidation.
    pub fn compile(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(BackstopError::InvalidPattern(
                "Pattern cannot be empty".to_string(),
            ));
        }

        let segments: Vec<String> = pattern
            .split('*')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        Ok(Self {
            segments,
            leading_wildcard: pattern.starts_with('*'),
            trailing_wildcard: pattern.ends_with('*'),
        })
    }

    // == Matches ==
    /// Tests a key against the compiled pattern.
    pub fn matches(&self, key: &str) -> bool {
        // Pattern was entirely wildcards
        if self.segments.is_empty() {
            return true;
        }

        let last = self.segments.len() - 1;
        let mut pos = 0usize;

        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 && !self.leading_wildcard {
                // Anchored to the start
                if !key.starts_with(segment.as_str()) {
                    return false;
                }
                pos = segment.len();
            } else if i == last && !self.trailing_wildcard {
                // Anchored to the end; must not overlap what's already matched
                let tail = &key[pos..];
                if tail.len() < segment.len() || !tail.ends_with(segment.as_str()) {
                    return false;
                }
                pos = key.len();
            } else {
                // Floating segment: first occurrence at or after pos
                match key[pos..].find(segment.as_str()) {
                    Some(offset) => pos = pos + offset + segment.len(),
                    None => return false,
                }
            }
        }

        // A single start-anchored segment with no trailing wildcard must
        // consume the whole key (exact match)
        self.trailing_wildcard || pos == key.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_rejects_empty_pattern() {
        let result = KeyPattern::compile("");
        assert!(matches!(result, Err(BackstopError::InvalidPattern(_))));
    }

    #[test]
    fn test_exact_match_without_wildcard() {
        let pattern = KeyPattern::compile("store:42").unwrap();

        assert!(pattern.matches("store:42"));
        assert!(!pattern.matches("store:42:sales"));
        assert!(!pattern.matches("store:4"));
    }

    #[test]
    fn test_prefix_match() {
        let pattern = KeyPattern::compile("store:42:*").unwrap();

        assert!(pattern.matches("store:42:sales:2024-01"));
        assert!(pattern.matches("store:42:"));
        assert!(!pattern.matches("store:421:sales"));
        assert!(!pattern.matches("shift:42:roster"));
    }

    #[test]
    fn test_suffix_match() {
        let pattern = KeyPattern::compile("*:2024-01").unwrap();

        assert!(pattern.matches("store:42:sales:2024-01"));
        assert!(!pattern.matches("store:42:sales:2024-02"));
    }

    #[test]
    fn test_contains_match() {
        let pattern = KeyPattern::compile("*:sales:*").unwrap();

        assert!(pattern.matches("store:42:sales:2024-01"));
        assert!(pattern.matches("store:7:sales:"));
        assert!(!pattern.matches("store:42:shifts:2024-01"));
    }

    #[test]
    fn test_multiple_segments_in_order() {
        let pattern = KeyPattern::compile("store:*:sales:*").unwrap();

        assert!(pattern.matches("store:42:sales:2024-01"));
        // Segments present but out of order
        assert!(!pattern.matches("sales:42:store:2024-01"));
    }

    #[test]
    fn test_wildcard_matches_empty_run() {
        let pattern = KeyPattern::compile("a*b").unwrap();

        assert!(pattern.matches("ab"));
        assert!(pattern.matches("axxb"));
        assert!(!pattern.matches("a"));
        assert!(!pattern.matches("ba"));
    }

    #[test]
    fn test_suffix_does_not_overlap_prefix() {
        let pattern = KeyPattern::compile("ab*ba").unwrap();

        assert!(pattern.matches("abba"));
        assert!(pattern.matches("abxba"));
        // "aba" would need the prefix and suffix to share the middle byte
        assert!(!pattern.matches("aba"));
    }

    #[test]
    fn test_lone_wildcard_matches_everything() {
        let pattern = KeyPattern::compile("*").unwrap();

        assert!(pattern.matches("anything"));
        assert!(pattern.matches(""));
    }

    #[test]
    fn test_consecutive_wildcards_collapse() {
        let pattern = KeyPattern::compile("store:**:sales").unwrap();

        assert!(pattern.matches("store:42:sales"));
        assert!(!pattern.matches("store:42:shifts"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = KeyPattern::compile("store:(.+):*").unwrap();

        assert!(pattern.matches("store:(.+):sales"));
        assert!(!pattern.matches("store:42:sales"));
    }
}
