//! End-to-end install flows through `InstallOrchestrator`.
//!
//! Every test uploads archive bytes the way a web handler would, then checks
//! the install roots and the staging directory.

use std::fs;

use extpack_core::{
    ArchiveLayout, Error, ExtensionKind, InstallOrchestrator, InstallerConfig, JsonPluginLocator,
    JsonThemeLocator,
};
use extpack_test_utils::{TestRoots, ZipFixture, plugin_json, theme_json, tree_snapshot};
use pretty_assertions::assert_eq;
use rstest::rstest;

const APP_VERSION: &str = "4.60";

fn orchestrator(roots: &TestRoots) -> InstallOrchestrator {
    InstallOrchestrator::new(APP_VERSION, JsonPluginLocator::new(roots.plugins_dir()))
        .with_theme_locator(JsonThemeLocator::new(roots.themes_dir()))
        .with_staging_dir(roots.staging_dir())
}

fn upload(
    orchestrator: &InstallOrchestrator,
    name: &str,
    fixture: &ZipFixture,
) -> extpack_core::Result<Vec<extpack_core::ExtensionDescriptor>> {
    let bytes = fixture.to_bytes();
    orchestrator.install_from_upload(name, Some(bytes.as_slice()))
}

// ============================================================================
// Single-item archives
// ============================================================================

#[test]
fn single_plugin_install_returns_descriptor_and_files() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .plugin("Payments.Demo", "Payments.Demo", &["4.50", "4.60"])
        .file("Payments.Demo/Payments.Demo.dll", "bin")
        .file("Payments.Demo/Views/Configure.cshtml", "<div/>");

    let installed = upload(&orchestrator(&roots), "Payments.Demo.zip", &fixture).unwrap();

    assert_eq!(installed.len(), 1);
    let plugin = installed[0].as_plugin().unwrap();
    assert_eq!(plugin.system_name, "Payments.Demo");
    assert_eq!(plugin.supported_versions, vec!["4.50", "4.60"]);
    roots.assert_files(
        &roots.plugins_dir().join("Payments.Demo"),
        &["Payments.Demo.dll", "Views/Configure.cshtml", "plugin.json"],
    );
    assert!(roots.staged_files().is_empty());
}

#[rstest]
#[case::no_directories(ZipFixture::new().file("plugin.json", plugin_json("Loose", &["4.60"])))]
#[case::root_file_only(ZipFixture::new().file("readme.txt", "nothing here"))]
#[case::two_directories(
    ZipFixture::new()
        .plugin("First", "First", &["4.60"])
        .plugin("Second", "Second", &["4.60"])
)]
#[case::files_without_directory_entry(
    ZipFixture::new()
        .file("Demo/plugin.json", plugin_json("Demo", &["4.60"]))
        .file("Demo/Demo.dll", "bin")
)]
#[case::nested_directory_entry_only(
    ZipFixture::new()
        .dir("Plugins/Demo")
        .file("Plugins/Demo/plugin.json", plugin_json("Demo", &["4.60"]))
)]
fn ambiguous_layouts_are_rejected(#[case] fixture: ZipFixture) {
    let roots = TestRoots::new();

    let err = upload(&orchestrator(&roots), "bundle.zip", &fixture).unwrap_err();

    assert!(matches!(err, Error::AmbiguousArchiveLayout { .. }), "got {err:?}");
    assert!(roots.files_under(&roots.plugins_dir()).is_empty());
    assert!(roots.staged_files().is_empty());
}

#[test]
fn single_directory_entry_with_loose_nested_files_installs() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .plugin("Demo", "Demo", &["4.60"])
        .file("Extra/readme.txt", "extracted alongside");

    let installed = upload(&orchestrator(&roots), "demo.zip", &fixture).unwrap();

    assert_eq!(installed[0].system_name(), "Demo");
    assert!(roots.plugins_dir().join("Extra").join("readme.txt").is_file());
    assert!(roots.staged_files().is_empty());
}

#[test]
fn unsupported_version_fails_single_install() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new().plugin("Legacy", "Legacy", &["4.40"]);

    let err = upload(&orchestrator(&roots), "legacy.zip", &fixture).unwrap_err();

    assert!(matches!(err, Error::UnsupportedVersion { .. }));
    assert!(!roots.plugins_dir().join("Legacy").exists());
    assert!(roots.staged_files().is_empty());
}

#[test]
fn reinstall_leaves_no_stale_files() {
    let roots = TestRoots::new();
    let orchestrator = orchestrator(&roots);
    let first = ZipFixture::new()
        .plugin("Widgets.Demo", "Widgets.Demo", &["4.60"])
        .file("Widgets.Demo/x.txt", "x")
        .file("Widgets.Demo/y.txt", "y1");
    let second = ZipFixture::new()
        .plugin("Widgets.Demo", "Widgets.Demo", &["4.60"])
        .file("Widgets.Demo/y.txt", "y2")
        .file("Widgets.Demo/z.txt", "z");

    upload(&orchestrator, "Widgets.Demo.zip", &first).unwrap();
    upload(&orchestrator, "Widgets.Demo.zip", &second).unwrap();

    let target = roots.plugins_dir().join("Widgets.Demo");
    roots.assert_files(&target, &["plugin.json", "y.txt", "z.txt"]);
    assert_eq!(fs::read_to_string(target.join("y.txt")).unwrap(), "y2");
}

#[test]
fn installing_twice_yields_identical_tree() {
    let roots = TestRoots::new();
    let orchestrator = orchestrator(&roots);
    let fixture = ZipFixture::new()
        .theme("Midnight", "Midnight")
        .file("Midnight/Content/site.css", "body{}")
        .file("Midnight/Views/Shared/_Layout.cshtml", "<html/>");

    upload(&orchestrator, "midnight.zip", &fixture).unwrap();
    let first = tree_snapshot(roots.root());
    upload(&orchestrator, "midnight.zip", &fixture).unwrap();
    let second = tree_snapshot(roots.root());

    assert_eq!(first, second);
    assert!(first.contains_key("Themes/Midnight/Content/site.css"));
}

// ============================================================================
// Manifest archives
// ============================================================================

#[test]
fn untyped_manifest_entry_is_dropped_from_result() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .manifest(
            r#"[
                {"SystemName":"Untyped","DirectoryPath":"Untyped"},
                {"Type":"Plugin","SystemName":"Valid","DirectoryPath":"Valid"}
            ]"#,
        )
        .file("Untyped/plugin.json", plugin_json("Untyped", &["4.60"]))
        .file("Valid/plugin.json", plugin_json("Valid", &["4.60"]));

    let installed = upload(&orchestrator(&roots), "bundle.zip", &fixture).unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].system_name(), "Valid");
    assert_eq!(
        roots.files_under(&roots.plugins_dir()).into_iter().collect::<Vec<_>>(),
        vec!["Valid/plugin.json"]
    );
}

#[test]
fn manifest_entry_without_descriptor_writes_nothing() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .manifest(
            r#"[
                {"Type":"Theme","SystemName":"Ghost","DirectoryPath":"Themes/Ghost"},
                {"Type":"Theme","SystemName":"Midnight","DirectoryPath":"Themes/Midnight"}
            ]"#,
        )
        .file("Themes/Ghost/Content/site.css", "body{}")
        .file("Themes/Midnight/theme.json", theme_json("Midnight"));

    let installed = upload(&orchestrator(&roots), "bundle.zip", &fixture).unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].kind(), ExtensionKind::Theme);
    assert!(!roots.themes_dir().join("Ghost").exists());
    roots.assert_files(&roots.themes_dir().join("Midnight"), &["theme.json"]);
}

#[test]
fn unsupported_version_is_skipped_in_manifest_mode() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .manifest(r#"[{"Type":"Plugin","SystemName":"Legacy","DirectoryPath":"Legacy"}]"#)
        .file("Legacy/plugin.json", plugin_json("Legacy", &["4.40"]));

    let installed = upload(&orchestrator(&roots), "bundle.zip", &fixture).unwrap();

    assert!(installed.is_empty());
    assert!(roots.staged_files().is_empty());
}

#[test]
fn empty_manifest_falls_back_to_single_item() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .manifest("[]")
        .plugin("Demo", "Demo", &["4.60"]);

    let installed = upload(&orchestrator(&roots), "demo.zip", &fixture).unwrap();

    assert_eq!(installed[0].system_name(), "Demo");
    roots.assert_files(&roots.plugins_dir().join("Demo"), &["plugin.json"]);
}

#[test]
fn malformed_manifest_fails_the_upload() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new()
        .manifest("[{\"Type\":")
        .plugin("Demo", "Demo", &["4.60"]);

    let err = upload(&orchestrator(&roots), "demo.zip", &fixture).unwrap_err();

    assert!(matches!(err, Error::MalformedManifest { .. }));
    assert!(!roots.plugins_dir().join("Demo").exists());
    assert!(roots.staged_files().is_empty());
}

// ============================================================================
// Upload handling
// ============================================================================

#[rstest]
#[case("demo.zip")]
#[case("DEMO.ZIP")]
#[case("uploads/nested/demo.zip")]
#[case("C:\\Users\\someone\\demo.zip")]
fn staged_file_is_removed_after_success(#[case] name: &str) {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new().plugin("Demo", "Demo", &["4.60"]);

    upload(&orchestrator(&roots), name, &fixture).unwrap();

    assert!(roots.staged_files().is_empty());
    assert!(roots.plugins_dir().join("Demo").join("plugin.json").is_file());
}

#[test]
fn staged_file_is_removed_after_failure() {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new().dir("Empty");

    let err = upload(&orchestrator(&roots), "empty.zip", &fixture).unwrap_err();

    assert!(matches!(err, Error::DescriptorNotFound { .. }));
    assert!(roots.staging_dir().is_dir());
    assert!(roots.staged_files().is_empty());
}

#[cfg(unix)]
#[test]
fn relative_staging_dir_with_parent_segments() {
    let roots = TestRoots::new();
    let staging_dir = roots.relative_staging_dir();
    assert!(staging_dir.starts_with(".."));
    let orchestrator =
        InstallOrchestrator::new(APP_VERSION, JsonPluginLocator::new(roots.plugins_dir()))
            .with_staging_dir(&staging_dir);
    let fixture = ZipFixture::new().plugin("Demo", "Demo", &["4.60"]);

    let installed = upload(&orchestrator, "demo.zip", &fixture).unwrap();

    assert_eq!(installed[0].system_name(), "Demo");
    assert!(roots.staging_dir().is_dir());
    assert!(roots.staged_files().is_empty());
}

#[rstest]
#[case("demo.rar")]
#[case("demo.zip.txt")]
#[case("demo")]
fn non_zip_upload_is_rejected(#[case] name: &str) {
    let roots = TestRoots::new();
    let fixture = ZipFixture::new().plugin("Demo", "Demo", &["4.60"]);

    let err = upload(&orchestrator(&roots), name, &fixture).unwrap_err();

    assert!(matches!(err, Error::UnsupportedFileType { .. }));
    assert!(roots.staged_files().is_empty());
}

#[test]
fn themes_disabled_orchestrator_skips_theme_items() {
    let roots = TestRoots::new();
    let orchestrator =
        InstallOrchestrator::new(APP_VERSION, JsonPluginLocator::new(roots.plugins_dir()))
            .with_staging_dir(roots.staging_dir());
    let fixture = ZipFixture::new()
        .manifest(
            r#"[
                {"Type":"Theme","DirectoryPath":"Midnight"},
                {"Type":"Plugin","DirectoryPath":"Demo"}
            ]"#,
        )
        .file("Midnight/theme.json", theme_json("Midnight"))
        .file("Demo/plugin.json", plugin_json("Demo", &["4.60"]));

    let installed = upload(&orchestrator, "bundle.zip", &fixture).unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].kind(), ExtensionKind::Plugin);
    assert!(roots.files_under(&roots.themes_dir()).is_empty());
}

// ============================================================================
// Config-driven setup
// ============================================================================

#[test]
fn orchestrator_from_config_file() {
    let roots = TestRoots::new();
    let config_path = roots.root().join("extpack.json");
    let mut config = InstallerConfig::new(APP_VERSION, roots.plugins_dir());
    config.themes_dir = Some(roots.themes_dir());
    config.staging_dir = Some(roots.staging_dir());
    config.manifest_file_name = "bundle.json".to_string();
    config.save(&config_path).unwrap();

    let config = InstallerConfig::load(&config_path).unwrap();
    let orchestrator = InstallOrchestrator::from_config(&config).unwrap();
    let fixture = ZipFixture::new()
        .file("bundle.json", r#"[{"Type":"Theme","DirectoryPath":"Midnight"}]"#)
        .file("Midnight/theme.json", theme_json("Midnight"));
    let archive = fixture.write_to(&roots.upload_path("bundle.zip"));

    assert!(matches!(
        orchestrator.inspect(&archive).unwrap(),
        ArchiveLayout::Multi { ref entries } if entries.len() == 1
    ));
    let installed = orchestrator.install_file(&archive).unwrap();

    assert_eq!(installed[0].system_name(), "Midnight");
    assert!(archive.is_file());
    assert!(roots.staged_files().is_empty());
}
