//! Unit tests for the config store: load, write-through commit, reload,
//! and change notification. File watching itself is covered in the
//! integration suite.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::{fs, time::Duration};

use tempfile::TempDir;
use tokio::time::timeout;

use crate::store::{ConfigError, ConfigStore};
use crate::tree::{SectionNode, SectionPath, resolve_branch, resolve_branch_mut};

fn backing(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("project.cfg");
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn loads_existing_backing_file() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\npath = app\n");

    let store = ConfigStore::load(&path).unwrap();

    assert!(!store.backing_was_missing());
    let tree = store.snapshot();
    let app = resolve_branch(&tree, &SectionPath::parse("application")).unwrap();
    assert_eq!(app.get("path").unwrap().as_leaf(), Some("app"));
}

#[tokio::test]
async fn missing_backing_file_yields_empty_tree_and_flag() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("project.cfg");

    let store = ConfigStore::load(&path).unwrap();

    assert!(store.backing_was_missing());
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn unparseable_backing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "not a header or assignment\n");

    let result = ConfigStore::load(&path);
    assert!(matches!(result, Err(ConfigError::Tree(_))));
}

#[tokio::test]
async fn commit_writes_through_and_reparses() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\ndependencies =\n");
    let store = ConfigStore::load(&path).unwrap();

    store
        .commit::<_, ConfigError>(|tree| {
            let app = resolve_branch_mut(tree, &SectionPath::parse("application"))?;
            app.insert(
                "path".to_string(),
                SectionNode::Leaf("app".to_string()),
            );
            Ok(())
        })
        .unwrap();

    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("path = app"));

    // Disk and memory stay convergent after the write-through re-parse.
    let reread = ConfigStore::load(&path).unwrap();
    assert_eq!(reread.snapshot(), store.snapshot());
}

#[tokio::test]
async fn failed_commit_leaves_tree_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\npath = app\n");
    let store = ConfigStore::load(&path).unwrap();
    let before_tree = store.snapshot();
    let before_text = fs::read_to_string(&path).unwrap();

    let result = store.commit::<_, ConfigError>(|tree| {
        let app = resolve_branch_mut(tree, &SectionPath::parse("application"))?;
        app.insert("junk".to_string(), SectionNode::Leaf("junk".to_string()));
        // Fail after mutating the working copy.
        resolve_branch_mut(tree, &SectionPath::parse("does.not.exist"))?;
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(store.snapshot(), before_tree);
    assert_eq!(fs::read_to_string(&path).unwrap(), before_text);
}

#[tokio::test]
async fn commit_into_a_missing_file_creates_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("project.cfg");
    let store = ConfigStore::load(&path).unwrap();
    assert!(store.backing_was_missing());

    store
        .commit::<_, ConfigError>(|tree| {
            tree.root_mut().insert(
                "application".to_string(),
                SectionNode::Branch(crate::tree::Branch::new()),
            );
            Ok(())
        })
        .unwrap();

    assert!(path.exists());
    assert!(!store.backing_was_missing());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[application]\n");
}

#[tokio::test]
async fn reload_replaces_tree_wholesale() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\npath = app\n");
    let store = ConfigStore::load(&path).unwrap();

    fs::write(&path, "[library.mathlib]\npath = mathlib\n").unwrap();
    store.reload().unwrap();

    let tree = store.snapshot();
    assert!(resolve_branch(&tree, &SectionPath::parse("application")).is_err());
    assert!(resolve_branch(&tree, &SectionPath::parse("library.mathlib")).is_ok());
}

#[tokio::test]
async fn get_node_distinguishes_leaf_branch_and_missing() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\npath = app\n");
    let store = ConfigStore::load(&path).unwrap();

    let leaf = store.get_node(&SectionPath::parse("application.path")).unwrap();
    assert_eq!(leaf.as_leaf(), Some("app"));

    let branch = store.get_node(&SectionPath::parse("application")).unwrap();
    assert!(branch.is_branch());

    let missing = store.get_node(&SectionPath::parse("nope"));
    assert!(matches!(missing, Err(ConfigError::Tree(_))));
}

#[tokio::test]
async fn subscribers_are_notified_after_commit_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\ndependencies =\n");
    let store = ConfigStore::load(&path).unwrap();
    let mut subscription = store.subscribe().await.unwrap();

    store
        .commit::<_, ConfigError>(|tree| {
            let app = resolve_branch_mut(tree, &SectionPath::parse("application"))?;
            app.insert("path".to_string(), SectionNode::Leaf("app".to_string()));
            Ok(())
        })
        .unwrap();

    let event = timeout(Duration::from_secs(1), subscription.changed())
        .await
        .unwrap();
    assert!(event.is_some());

    store.reload().unwrap();
    let event = timeout(Duration::from_secs(1), subscription.changed())
        .await
        .unwrap();
    assert!(event.is_some());
}

#[tokio::test]
async fn dropped_subscription_unsubscribes() {
    let dir = TempDir::new().unwrap();
    let path = backing(&dir, "[application]\ndependencies =\n");
    let store = ConfigStore::load(&path).unwrap();

    let subscription = store.subscribe().await.unwrap();
    drop(subscription);

    // The store keeps working with no live observers.
    store.reload().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn render_matches_backing_text_after_load() {
    let dir = TempDir::new().unwrap();
    let text = "[application]\npath = app\ndependencies = mathlib\n\n[library.mathlib]\npath = mathlib\n";
    let path = backing(&dir, text);
    let store = ConfigStore::load(&path).unwrap();

    assert_eq!(store.render(), text);
}
