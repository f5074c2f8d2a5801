//! Integration test: generated theme directories and lazy initialization.

use std::fs;
use std::path::Path;
use std::thread;

use tekton_core::config::{Config, RegistryConfig};
use tekton_core::registry::{RegistryError, RegistryInitError, ThemeSource};
use tekton_core::{LazyRegistry, ThemeRegistry};

const OCEAN: &str = include_str!("fixtures/ocean-breeze.json");
const BROKEN: &str = include_str!("fixtures/broken-sunset.json");

fn generated(dir: &Path) -> RegistryConfig {
    RegistryConfig {
        generated_dir: Some(dir.to_path_buf()),
        include_builtin: true,
    }
}

#[test]
fn generated_themes_join_builtins() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("ocean-breeze.json"), OCEAN).expect("write");
    fs::write(dir.path().join("notes.txt"), "not a theme").expect("write");

    let registry = ThemeRegistry::initialize(&generated(dir.path())).expect("registry");
    assert_eq!(
        registry.ids(),
        vec!["calm-wellness", "ocean-breeze", "premium-editorial", "saas-modern"]
    );
    assert!(matches!(
        registry.source("ocean-breeze"),
        Some(ThemeSource::Generated(_))
    ));
    let ocean = registry.load("ocean-breeze").expect("valid generated theme");
    assert_eq!(ocean.contrast_pairs.len(), 2);
}

#[test]
fn invalid_generated_theme_is_known_but_not_listed() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("broken-sunset.json"), BROKEN).expect("write");

    let registry = ThemeRegistry::initialize(&generated(dir.path())).expect("registry");
    assert!(registry.is_known("broken-sunset"));
    assert!(!registry.ids().contains(&"broken-sunset".to_string()));

    let Err(RegistryError::InvalidDefinition { id, report }) = registry.load("broken-sunset") else {
        panic!("expected an invalid definition");
    };
    assert_eq!(id, "broken-sunset");
    let paths: Vec<&str> = report.violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"brandTone"), "{paths:?}");
    assert!(paths.contains(&"schemaVersion"), "{paths:?}");
    assert!(paths.contains(&"tokens.atomic.spacing.4"), "{paths:?}");
    assert!(paths.contains(&"tokens.semantic.color.text.primary"), "{paths:?}");
    assert!(paths.contains(&"tokens.semantic.loop.a"), "{paths:?}");
}

#[test]
fn duplicate_ids_are_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.json"), OCEAN).expect("write");
    fs::write(dir.path().join("b.json"), OCEAN).expect("write");

    let err = ThemeRegistry::initialize(&generated(dir.path())).expect_err("duplicate");
    let RegistryInitError::DuplicateTheme { id, first, second } = err else {
        panic!("expected a duplicate theme error");
    };
    assert_eq!(id, "ocean-breeze");
    assert!(first.ends_with("a.json"));
    assert!(second.ends_with("b.json"));
}

#[test]
fn non_json_document_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("half.json"), "{ \"id\": ").expect("write");
    let err = ThemeRegistry::initialize(&generated(dir.path())).expect_err("parse error");
    assert!(matches!(err, RegistryInitError::Parse { .. }));
}

#[test]
fn missing_directory_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = RegistryConfig {
        generated_dir: Some(dir.path().join("absent")),
        include_builtin: false,
    };
    let registry = ThemeRegistry::initialize(&config).expect("registry");
    assert!(registry.list().is_empty());
}

#[test]
fn config_file_drives_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let themes = dir.path().join("themes");
    fs::create_dir(&themes).expect("mkdir");
    fs::write(themes.join("ocean-breeze.json"), OCEAN).expect("write");
    let config_path = dir.path().join("tekton.toml");
    fs::write(
        &config_path,
        format!(
            "[registry]\ngenerated_dir = {:?}\ninclude_builtin = false\n",
            themes.display().to_string()
        ),
    )
    .expect("write");

    let config = Config::load(&config_path).expect("config");
    let registry = ThemeRegistry::initialize(&config.registry).expect("registry");
    assert_eq!(registry.ids(), vec!["ocean-breeze"]);
}

#[test]
fn lazy_registry_scans_once_across_threads() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("ocean-breeze.json"), OCEAN).expect("write");
    let lazy = LazyRegistry::new(generated(dir.path()));

    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let registry = lazy.get().expect("registry");
                    assert!(registry.is_known("ocean-breeze"));
                    registry as *const ThemeRegistry as usize
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));

    // Later changes to the directory are not seen.
    fs::remove_file(dir.path().join("ocean-breeze.json")).expect("remove");
    assert!(lazy.get().expect("registry").is_known("ocean-breeze"));
}

#[test]
fn lazy_registry_caches_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("half.json"), "[").expect("write");
    let lazy = LazyRegistry::new(generated(dir.path()));
    let first = lazy.get().expect_err("parse error");
    fs::remove_file(dir.path().join("half.json")).expect("remove");
    let second = lazy.get().expect_err("still failed");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn theme_without_declared_pairs_is_audited_on_its_roles() {
    let mut doc: serde_json::Value = serde_json::from_str(OCEAN).expect("fixture json");
    doc.as_object_mut().expect("object").remove("contrastPairs");
    let theme = tekton_core::schema::parse_theme(&doc).expect("valid theme");
    assert!(theme.contrast_pairs.is_empty());

    let audit = tekton_core::wcag::audit_theme(&theme);
    assert!(audit.derived);
    let pairs: Vec<String> = audit.entries.iter().map(|e| e.pair.to_string()).collect();
    assert_eq!(
        pairs,
        vec![
            "semantic.color.text.primary on semantic.color.background.canvas",
            "semantic.color.text.primary on semantic.color.background.surface",
        ]
    );
    assert!(audit.is_publishable(tekton_core::wcag::WcagLevel::Aa));
}

#[test]
fn document_without_usable_id_or_stem_is_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut doc: serde_json::Value = serde_json::from_str(OCEAN).expect("fixture json");
    doc["id"] = serde_json::json!("Ocean Breeze");
    fs::write(dir.path().join("My Theme.json"), doc.to_string()).expect("write");
    fs::write(dir.path().join("ocean-breeze.json"), OCEAN).expect("write");

    let registry = ThemeRegistry::initialize(&RegistryConfig {
        generated_dir: Some(dir.path().to_path_buf()),
        include_builtin: false,
    })
    .expect("registry");
    assert!(!registry.is_known("My Theme"));
    assert!(!registry.is_known("Ocean Breeze"));
    assert_eq!(registry.ids(), vec!["ocean-breeze"]);
    assert!(matches!(
        registry.load("My Theme"),
        Err(RegistryError::NotFound { .. })
    ));
}
