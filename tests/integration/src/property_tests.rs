//! Property tests over generated single-item archives.

use std::collections::BTreeSet;

use extpack_core::{Error, InstallOrchestrator, JsonPluginLocator};
use extpack_test_utils::{TestRoots, ZipFixture};
use proptest::prelude::*;

fn orchestrator(roots: &TestRoots) -> InstallOrchestrator {
    InstallOrchestrator::new("4.60", JsonPluginLocator::new(roots.plugins_dir()))
        .with_staging_dir(roots.staging_dir())
}

fn directory_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9.]{0,11}".prop_filter("not a dot segment", |s| !s.ends_with('.'))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_archive_file_is_installed(
        dir in directory_name(),
        files in prop::collection::btree_set("[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.txt", 0..6),
    ) {
        let roots = TestRoots::new();
        let mut fixture = ZipFixture::new().plugin(&dir, &dir, &["4.50", "4.60"]);
        for file in &files {
            fixture = fixture.file(&format!("{dir}/{file}"), file.as_bytes());
        }

        let bytes = fixture.to_bytes();
        let installed = orchestrator(&roots)
            .install_from_upload("upload.zip", Some(bytes.as_slice()))
            .unwrap();

        prop_assert_eq!(installed.len(), 1);
        prop_assert_eq!(installed[0].system_name(), dir.as_str());

        let mut expected: BTreeSet<String> = files.clone();
        expected.insert("plugin.json".to_string());
        prop_assert_eq!(roots.files_under(&roots.plugins_dir().join(&dir)), expected);
        prop_assert!(roots.staged_files().is_empty());
    }

    #[test]
    fn several_top_level_directories_are_ambiguous(
        dirs in prop::collection::btree_set(directory_name(), 2..5),
    ) {
        let roots = TestRoots::new();
        let mut fixture = ZipFixture::new();
        for dir in &dirs {
            fixture = fixture.plugin(dir, dir, &["4.60"]);
        }

        let bytes = fixture.to_bytes();
        let err = orchestrator(&roots)
            .install_from_upload("upload.zip", Some(bytes.as_slice()))
            .unwrap_err();

        match err {
            Error::AmbiguousArchiveLayout { directories } => {
                prop_assert_eq!(directories.len(), dirs.len());
            }
            other => prop_assert!(false, "expected AmbiguousArchiveLayout, got {:?}", other),
        }
        prop_assert!(roots.staged_files().is_empty());
    }
}
