//! Indexed list parameters.
//!
//! Parameters named `<list>[<digits>]` form one sequence keyed by `<list>`.
//! Nothing is materialized at parse time; each query scans the names.

/// Returns the index encoded in `name` if it has the form `<list_name>[<digits>]`.
///
/// Digits that overflow `u64` yield `None`.
pub(crate) fn parse_index(name: &str, list_name: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(list_name)?
        .strip_prefix('[')?
        .strip_suffix(']')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Collects the `(name, value)` entries of `list_name`, ordered by ascending
/// index. Equal indices (`a[1]`, `a[01]`) keep their scan order.
pub(crate) fn collect<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    list_name: &str,
) -> Vec<(&'a str, &'a str)> {
    let mut matched: Vec<(u64, &str, &str)> = entries
        .into_iter()
        .filter_map(|(name, value)| parse_index(name, list_name).map(|i| (i, name, value)))
        .collect();

    matched.sort_by_key(|(index, _, _)| *index);
    matched
        .into_iter()
        .map(|(_, name, value)| (name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("tags[0]", "tags"), Some(0));
        assert_eq!(parse_index("tags[42]", "tags"), Some(42));
        assert_eq!(parse_index("tags[007]", "tags"), Some(7));
    }

    #[test]
    fn test_parse_index_rejects_other_shapes() {
        assert_eq!(parse_index("tags", "tags"), None);
        assert_eq!(parse_index("tags[]", "tags"), None);
        assert_eq!(parse_index("tags[-1]", "tags"), None);
        assert_eq!(parse_index("tags[1]x", "tags"), None);
        assert_eq!(parse_index("tags[a]", "tags"), None);
        assert_eq!(parse_index("xtags[1]", "tags"), None);
        assert_eq!(parse_index("tag[1]", "tags"), None);
        assert_eq!(parse_index("tags[1][2]", "tags"), None);
    }

    #[test]
    fn test_parse_index_overflow() {
        assert_eq!(parse_index("tags[99999999999999999999999]", "tags"), None);
    }

    #[test]
    fn test_list_name_with_brackets() {
        assert_eq!(parse_index("user[0].tags[3]", "user[0].tags"), Some(3));
    }

    #[test]
    fn test_collect_sorts_by_index() {
        let entries = [
            ("tags[0]", "red"),
            ("other", "x"),
            ("tags[2]", "blue"),
            ("tags[1]", "green"),
        ];

        let values: Vec<_> = collect(entries, "tags").into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, ["red", "green", "blue"]);
    }

    #[test]
    fn test_collect_keeps_scan_order_for_equal_indices() {
        let entries = [("a[01]", "second"), ("a[1]", "first"), ("a[0]", "zero")];

        let names: Vec<_> = collect(entries, "a").into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a[0]", "a[01]", "a[1]"]);
    }

    proptest! {
        #[test]
        fn collected_indices_are_ascending(indices in proptest::collection::vec(0u32..1000, 0..20)) {
            let names: Vec<String> = indices.iter().map(|i| format!("items[{i}]")).collect();
            let entries = names.iter().map(|n| (n.as_str(), "v"));

            let collected = collect(entries, "items");
            prop_assert_eq!(collected.len(), indices.len());

            let parsed: Vec<u64> = collected
                .iter()
                .filter_map(|(name, _)| parse_index(name, "items"))
                .collect();
            prop_assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
