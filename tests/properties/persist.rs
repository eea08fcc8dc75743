//! Property tests for persisting states and reading them back.

use proptest::prelude::*;
use tempfile::TempDir;

use clusterforge::domain::entities::{Content, State};
use clusterforge::infrastructure::load_on_disk_files;

fn relative_path() -> impl Strategy<Value = String> {
    proptest::string::string_regex("(tls/|auth/)?[a-z]{1,8}\\.(crt|key|yml)").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every named content persisted to a directory comes back
    /// byte-for-byte from a snapshot; unnamed contents never touch disk.
    #[test]
    fn property_persist_then_snapshot_round_trip(
        files in proptest::collection::btree_map(
            relative_path(),
            proptest::collection::vec(any::<u8>(), 0..64),
            0..=8,
        ),
        in_memory in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let dir = TempDir::new().unwrap();
        let mut state = State::new().with_content(Content::in_memory(in_memory));
        for (path, data) in &files {
            state.push(Content::new(path.clone(), data.clone()));
        }

        state.persist_to_file(dir.path()).unwrap();
        let snapshot = load_on_disk_files(dir.path()).unwrap();

        prop_assert_eq!(snapshot.len(), files.len());
        for (path, data) in &files {
            prop_assert_eq!(snapshot.get(path), Some(data.as_slice()));
        }
    }
}
