#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use rowbind_core::naming::table_name;
use rowbind_core::RowbindError;

fn segment() -> impl Strategy<Value = String> {
    "[A-Z][a-z0-9]{0,6}"
}

proptest! {
    #[test]
    fn prop_segments_join_with_underscores(segments in prop::collection::vec(segment(), 1..5)) {
        let type_name: String = segments.concat();
        let expected = segments
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join("_");
        prop_assert_eq!(table_name(&type_name).unwrap(), expected);
    }

    #[test]
    fn prop_deterministic(name in "[A-Za-z0-9_]{0,16}") {
        prop_assert_eq!(table_name(&name), table_name(&name));
    }

    #[test]
    fn prop_no_uppercase_means_naming_error(name in "[a-z0-9_]{0,16}") {
        let is_naming_error = matches!(table_name(&name), Err(RowbindError::Naming { .. }));
        prop_assert!(is_naming_error);
    }

    #[test]
    fn prop_output_is_identifier(name in "[A-Z][A-Za-z0-9]{0,16}") {
        let table = table_name(&name).unwrap();
        prop_assert!(table.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!table.starts_with('_'));
    }
}
