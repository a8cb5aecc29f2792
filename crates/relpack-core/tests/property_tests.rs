//! Property-based tests for whitelist normalization and validation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use relpack_core::PackError;
use relpack_core::WhitelistEntry;
use relpack_core::whitelist::normalize_line;
use relpack_core::whitelist::parse_whitelist;

proptest! {
    /// Comment lines never produce entries, whatever follows the `#`.
    #[test]
    fn prop_comments_skipped(indent in "[ \t]{0,4}", body in "[ -~]{0,40}") {
        let line = format!("{indent}#{body}");
        prop_assert_eq!(normalize_line(&line), None);
    }

    /// Whitespace-only lines never produce entries.
    #[test]
    fn prop_blank_lines_skipped(blank in "[ \t]{0,10}") {
        prop_assert_eq!(normalize_line(&blank), None);
    }

    /// Any `..` segment is rejected, with either separator style.
    #[test]
    fn prop_parent_traversal_rejected(
        prefix in prop::collection::vec("[a-z]{1,8}", 0..4),
        suffix in prop::collection::vec("[a-z]{1,8}", 0..4),
        backslash in any::<bool>(),
    ) {
        let sep = if backslash { "\\" } else { "/" };
        let mut parts = prefix;
        parts.push("..".to_string());
        parts.extend(suffix);
        let text = parts.join(sep);

        let rejected = matches!(
            parse_whitelist(&text),
            Err(PackError::PathTraversal { line: 1, .. })
        );
        prop_assert!(rejected, "{} should be rejected", text);
    }

    /// Normalized relative paths are accepted unchanged.
    #[test]
    fn prop_valid_relative_paths_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..5)
    ) {
        let rel = components.join("/");
        let entry = WhitelistEntry::new(rel.clone(), 1);
        prop_assert!(entry.is_ok());
        let entry = entry.unwrap();
        prop_assert_eq!(entry.as_str(), rel.as_str());
    }

    /// Normalization output has no backslashes and no leading `./`.
    #[test]
    fn prop_normalized_form(
        dots in 0usize..4,
        components in prop::collection::vec("[a-z0-9]{1,8}", 1..4),
    ) {
        let line = format!("{}{}", ".\\".repeat(dots), components.join("\\"));
        let normalized = normalize_line(&line).expect("line should survive");
        prop_assert!(!normalized.contains('\\'));
        prop_assert!(!normalized.starts_with("./"));
        prop_assert_eq!(normalized, components.join("/"));
    }

    /// Leading `/` is always an absolute path.
    #[test]
    fn prop_absolute_rejected(components in prop::collection::vec("[a-z]{1,8}", 1..4)) {
        let text = format!("/{}", components.join("/"));
        let rejected = matches!(
            parse_whitelist(&text),
            Err(PackError::AbsolutePath { .. })
        );
        prop_assert!(rejected, "{} should be rejected", text);
    }
}
