//! Property tests for on-disk snapshot lookups.

use proptest::prelude::*;

use clusterforge::domain::value_objects::OnDiskFiles;

fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(foo|bar)-[0-9a-z]{0,3}\\.(bar|baz)").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Pattern loads return exactly the matching files, sorted by path,
    /// no matter the insertion order.
    #[test]
    fn property_pattern_load_is_sorted_and_exact(
        names in proptest::collection::vec(file_name(), 0..=12),
    ) {
        let files: OnDiskFiles = names
            .iter()
            .rev()
            .map(|name| (name.clone(), name.as_bytes().to_vec()))
            .collect();

        let mut expected: Vec<String> = names
            .iter()
            .filter(|n| n.starts_with("foo-") && n.ends_with(".bar"))
            .filter(|n| n.as_bytes().get(4).is_some_and(u8::is_ascii_digit))
            .cloned()
            .collect();
        expected.sort();
        expected.dedup();

        let loaded = files.load_pattern("foo-[0-9]*.bar").unwrap();

        match loaded {
            None => prop_assert!(expected.is_empty()),
            Some(state) => {
                let got: Vec<String> = state.contents().iter().map(|c| c.name.clone()).collect();
                prop_assert_eq!(&got, &expected);
                for content in state.contents() {
                    prop_assert_eq!(&content.data, &content.name.as_bytes().to_vec());
                }
            }
        }
    }

    /// PROPERTY: Exact loads succeed only when every requested path exists,
    /// and keep the requested order.
    #[test]
    fn property_exact_load_is_all_or_nothing(
        present in proptest::collection::btree_set(file_name(), 1..=6),
        extra in file_name(),
    ) {
        let files: OnDiskFiles = present
            .iter()
            .map(|name| (name.clone(), b"x".to_vec()))
            .collect();
        let mut wanted: Vec<&str> = present.iter().map(String::as_str).rev().collect();

        let state = files.load_exact(&wanted).unwrap();
        let names: Vec<&str> = state.contents().iter().map(|c| c.name.as_str()).collect();
        prop_assert_eq!(&names, &wanted);

        wanted.push(&extra);
        prop_assert_eq!(files.load_exact(&wanted).is_some(), present.contains(&extra));
    }
}
