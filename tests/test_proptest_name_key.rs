//! Property tests for identifier parsing.
#![cfg(feature = "proptest")]

use std::path::PathBuf;

use classmap::NameKey;
use proptest::prelude::*;

/// Strategy for a single identifier segment.
fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn leaf_is_last_segment(segments in prop::collection::vec(arb_segment(), 1..6)) {
        let identifier = segments.join("\\");
        let key = NameKey::parse(&identifier, '\\');

        prop_assert_eq!(key.full(), identifier.as_str());
        prop_assert_eq!(key.leaf(), segments.last().unwrap().as_str());
        prop_assert_eq!(key.has_namespace(), segments.len() > 1);
        prop_assert!(key.is_path_safe());
    }

    #[test]
    fn package_path_plus_leaf_is_full_path(segments in prop::collection::vec(arb_segment(), 1..6)) {
        let key = NameKey::parse(&segments.join("\\"), '\\');

        prop_assert_eq!(key.package_path().join(key.leaf()), key.full_path());
        prop_assert_eq!(key.full_path(), segments.iter().collect::<PathBuf>());
    }

    #[test]
    fn leading_delimiter_does_not_change_views(segments in prop::collection::vec(arb_segment(), 1..6)) {
        let plain = NameKey::parse(&segments.join("\\"), '\\');
        let qualified = NameKey::parse(&format!("\\{}", segments.join("\\")), '\\');

        prop_assert_eq!(plain.full_path(), qualified.full_path());
        prop_assert_eq!(plain.leaf(), qualified.leaf());
    }
}
