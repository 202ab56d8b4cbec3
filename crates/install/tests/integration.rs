//! Integration tests for staging and bootstrap

use nutforge_errors::{Error, InstallError};
use nutforge_install::{bootstrap_user_config, stage_install};
use nutforge_types::{BuildSpec, PackageDescriptor, Recipe, ResourceSpec};
use semver::Version;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;

fn test_recipe() -> Recipe {
    Recipe {
        package: PackageDescriptor {
            name: "nutshell".to_string(),
            display_name: "Nutshell".to_string(),
            version: Version::new(0, 0, 4),
            source_url: "file:///unused".to_string(),
            sha256: "d3cd4b9b64fb6d657195beb7ea9d47a193ace561d8d54b64e9890304e41c6829"
                .to_string(),
            license: "MIT".to_string(),
            homepage: "https://example.com".to_string(),
        },
        dependencies: Vec::new(),
        resources: ResourceSpec {
            docs: vec!["README.md".to_string(), "CHANGELOG.md".to_string()],
            theme_dir: "themes".to_string(),
            theme_extension: "json".to_string(),
        },
        build: BuildSpec {
            tool: "make".to_string(),
            args: Vec::new(),
            artifact: "nutshell".to_string(),
        },
    }
}

/// Lay out a fake source tree with an artifact, docs, and themes
async fn fake_source_tree(root: &Path) -> std::path::PathBuf {
    let source = root.join("source");
    fs::create_dir_all(source.join("themes")).await.unwrap();
    fs::write(source.join("nutshell"), b"#!/bin/sh\necho Nutshell\n")
        .await
        .unwrap();
    fs::write(source.join("README.md"), b"# Nutshell\n")
        .await
        .unwrap();
    fs::write(source.join("CHANGELOG.md"), b"## 0.0.4\n")
        .await
        .unwrap();
    fs::write(source.join("themes/default.json"), b"{\"name\":\"default\"}")
        .await
        .unwrap();
    fs::write(source.join("themes/minimal.json"), b"{\"name\":\"minimal\"}")
        .await
        .unwrap();
    // A non-theme file that must not be staged
    fs::write(source.join("themes/notes.txt"), b"ignore me")
        .await
        .unwrap();
    source
}

async fn dir_entries(path: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut entries = fs::read_dir(path).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    names
}

#[tokio::test]
async fn test_stage_creates_full_prefix_layout() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let (tx, _rx) = nutforge_events::channel();

    let staged = stage_install(
        &prefix,
        &source.join("nutshell"),
        &source,
        &test_recipe(),
        &tx,
    )
    .await
    .unwrap();

    assert_eq!(staged.binary, prefix.join("bin/nutshell"));
    assert!(prefix.join("bin/nutshell").exists());
    assert!(prefix.join("doc/README.md").exists());
    assert!(prefix.join("doc/CHANGELOG.md").exists());
    assert_eq!(
        dir_entries(&prefix.join("themes")).await,
        BTreeSet::from(["default.json".to_string(), "minimal.json".to_string()])
    );
    // packages/ exists and is empty
    assert!(dir_entries(&prefix.join("packages")).await.is_empty());
    // binary + 2 docs + 2 themes
    assert_eq!(staged.staged_files.len(), 5);
}

#[tokio::test]
async fn test_stage_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let (tx, _rx) = nutforge_events::channel();

    let recipe = test_recipe();
    let artifact = source.join("nutshell");

    stage_install(&prefix, &artifact, &source, &recipe, &tx)
        .await
        .unwrap();
    let first_bin = fs::read(prefix.join("bin/nutshell")).await.unwrap();
    let first_themes = dir_entries(&prefix.join("themes")).await;

    stage_install(&prefix, &artifact, &source, &recipe, &tx)
        .await
        .unwrap();
    assert_eq!(fs::read(prefix.join("bin/nutshell")).await.unwrap(), first_bin);
    assert_eq!(dir_entries(&prefix.join("themes")).await, first_themes);
}

#[tokio::test]
async fn test_stage_missing_doc_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    fs::remove_file(source.join("CHANGELOG.md")).await.unwrap();
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let (tx, _rx) = nutforge_events::channel();

    let err = stage_install(
        &prefix,
        &source.join("nutshell"),
        &source,
        &test_recipe(),
        &tx,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Install(InstallError::FilesystemError { .. })
    ));
    // No partial cleanup: earlier copies stay where they landed
    assert!(prefix.join("bin/nutshell").exists());
    assert!(prefix.join("doc/README.md").exists());
}

#[tokio::test]
async fn test_bootstrap_seeds_absent_user_root() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let user_root = temp.path().join("home/.nutshell");
    let (tx, _rx) = nutforge_events::channel();

    let recipe = test_recipe();
    stage_install(&prefix, &source.join("nutshell"), &source, &recipe, &tx)
        .await
        .unwrap();

    let summary =
        bootstrap_user_config(&prefix, &user_root, &recipe.resources, "Nutshell", &tx).await;

    assert_eq!(summary.seeded, 2);
    // Seeded set equals the prefix theme set
    assert_eq!(
        dir_entries(&user_root.join("themes")).await,
        dir_entries(&prefix.join("themes")).await
    );
    assert!(dir_entries(&user_root.join("packages")).await.is_empty());
    // No staging leftovers
    assert_eq!(
        dir_entries(&user_root).await,
        BTreeSet::from(["themes".to_string(), "packages".to_string()])
    );
}

#[tokio::test]
async fn test_bootstrap_never_touches_populated_themes() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let user_root = temp.path().join("home/.nutshell");
    let (tx, _rx) = nutforge_events::channel();

    let recipe = test_recipe();
    stage_install(&prefix, &source.join("nutshell"), &source, &recipe, &tx)
        .await
        .unwrap();

    // User has already customized a theme
    fs::create_dir_all(user_root.join("themes")).await.unwrap();
    fs::write(user_root.join("themes/mine.json"), b"{\"name\":\"mine\"}")
        .await
        .unwrap();

    let summary =
        bootstrap_user_config(&prefix, &user_root, &recipe.resources, "Nutshell", &tx).await;

    assert_eq!(summary.seeded, 0);
    assert_eq!(
        dir_entries(&user_root.join("themes")).await,
        BTreeSet::from(["mine.json".to_string()])
    );
    assert_eq!(
        fs::read(user_root.join("themes/mine.json")).await.unwrap(),
        b"{\"name\":\"mine\"}"
    );
}

#[tokio::test]
async fn test_bootstrap_is_idempotent_after_seeding() {
    let temp = tempfile::tempdir().unwrap();
    let source = fake_source_tree(temp.path()).await;
    let prefix = temp.path().join("cellar/nutshell/0.0.4");
    let user_root = temp.path().join("home/.nutshell");
    let (tx, _rx) = nutforge_events::channel();

    let recipe = test_recipe();
    stage_install(&prefix, &source.join("nutshell"), &source, &recipe, &tx)
        .await
        .unwrap();

    let first =
        bootstrap_user_config(&prefix, &user_root, &recipe.resources, "Nutshell", &tx).await;
    assert_eq!(first.seeded, 2);

    // User edits a seeded theme, then upgrades
    fs::write(user_root.join("themes/default.json"), b"{\"edited\":true}")
        .await
        .unwrap();
    let second =
        bootstrap_user_config(&prefix, &user_root, &recipe.resources, "Nutshell", &tx).await;

    assert_eq!(second.seeded, 0);
    assert_eq!(
        fs::read(user_root.join("themes/default.json")).await.unwrap(),
        b"{\"edited\":true}"
    );
}

#[tokio::test]
async fn test_bootstrap_failure_degrades_to_warning() {
    let temp = tempfile::tempdir().unwrap();
    let recipe = test_recipe();
    let (tx, mut rx) = nutforge_events::channel();

    // A file where the user root should be makes directory creation fail
    let user_root = temp.path().join("occupied");
    fs::write(&user_root, b"not a directory").await.unwrap();

    let summary = bootstrap_user_config(
        &temp.path().join("missing-prefix"),
        &user_root,
        &recipe.resources,
        "Nutshell",
        &tx,
    )
    .await;

    // Bootstrap reports rather than fails
    assert_eq!(summary.seeded, 0);
    let mut saw_warning = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(
            event,
            nutforge_events::AppEvent::General(
                nutforge_events::GeneralEvent::Warning { .. }
            )
        ) {
            saw_warning = true;
        }
    }
    assert!(saw_warning);
}
