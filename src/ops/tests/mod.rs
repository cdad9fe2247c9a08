//! Unit tests for the operations layer, run against tempdir-backed
//! stores with a stubbed scaffolder.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::fs;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::ops::{
    DependencyOutcome, LibraryKind, OpError, add_dependency, add_library, children_of,
    is_buildable_unit, join_dependency_list, list_buildable_units, parse_dependency_list,
    sanitize_name, update_value,
};
use crate::scaffold::{NoopScaffolder, ScaffoldError, ScaffoldOutput, Scaffolder};
use crate::store::ConfigStore;
use crate::tree::{SectionPath, resolve_branch};

/// Scaffolder that ran but reported failure, with diagnostics.
struct FailingScaffolder;

#[async_trait]
impl Scaffolder for FailingScaffolder {
    async fn scaffold(
        &self,
        _name: &str,
        _kind: LibraryKind,
    ) -> Result<ScaffoldOutput, ScaffoldError> {
        Ok(ScaffoldOutput {
            success: false,
            stdout: String::new(),
            stderr: "generator exploded".to_string(),
        })
    }
}

fn store_with(dir: &TempDir, content: &str) -> (ConfigStore, std::path::PathBuf) {
    let path = dir.path().join("project.cfg");
    fs::write(&path, content).unwrap();
    (ConfigStore::load(&path).unwrap(), path)
}

mod dependency_lists {
    use super::*;

    #[test]
    fn parse_trims_and_dedupes() {
        assert_eq!(
            parse_dependency_list(" a , b ,a,,b , c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(parse_dependency_list("").is_empty());
        assert!(parse_dependency_list(" , ,").is_empty());
    }

    #[test]
    fn join_emits_canonical_form() {
        let entries = vec!["a".to_string(), "b".to_string()];
        assert_eq!(join_dependency_list(&entries), "a,b");
        assert_eq!(join_dependency_list(&[]), "");
    }

    #[tokio::test]
    async fn add_dependency_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");

        let outcome =
            add_dependency(&store, &SectionPath::parse("application"), "mathlib").unwrap();

        assert_eq!(outcome, DependencyOutcome::Added);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[application]\ndependencies = mathlib\n"
        );
    }

    #[tokio::test]
    async fn duplicate_add_is_a_distinct_no_op() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");
        let section = SectionPath::parse("application");

        add_dependency(&store, &section, "mathlib").unwrap();
        let text_after_first = fs::read_to_string(&path).unwrap();

        let outcome = add_dependency(&store, &section, "mathlib").unwrap();

        assert_eq!(outcome, DependencyOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(&path).unwrap(), text_after_first);
    }

    #[tokio::test]
    async fn add_twice_equals_add_once() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\ndependencies = strlib\n");
        let section = SectionPath::parse("application");

        add_dependency(&store, &section, "mathlib").unwrap();
        add_dependency(&store, &section, "mathlib").unwrap();

        let node = store.get_node(&SectionPath::parse("application.dependencies")).unwrap();
        assert_eq!(node.as_leaf(), Some("strlib,mathlib"));
    }

    #[tokio::test]
    async fn missing_section_is_reported() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\ndependencies =\n");

        let err = add_dependency(&store, &SectionPath::parse("library.nope"), "mathlib")
            .unwrap_err();
        assert!(matches!(err, OpError::SectionNotFound(p) if p == "library.nope"));
    }

    #[tokio::test]
    async fn corrupted_list_normalizes_on_next_write() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies = a , a,  b\n");

        add_dependency(&store, &SectionPath::parse("application"), "c").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[application]\ndependencies = a,b,c\n"
        );
    }

    #[tokio::test]
    async fn rejects_names_that_would_corrupt_the_list() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\ndependencies =\n");
        let section = SectionPath::parse("application");

        for bad in ["", "   ", "a,b", "a b"] {
            let err = add_dependency(&store, &section, bad).unwrap_err();
            assert!(matches!(err, OpError::InvalidName(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn missing_dependencies_key_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\npath = app\n");

        add_dependency(&store, &SectionPath::parse("application"), "mathlib").unwrap();

        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("dependencies = mathlib"));
    }
}

mod value_updates {
    use super::*;

    #[tokio::test]
    async fn sets_and_replaces_values() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\npath = app\n");
        let section = SectionPath::parse("application");

        update_value(&store, &section, "type", "static").unwrap();
        update_value(&store, &section, "path", "renamed").unwrap();

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("type = static"));
        assert!(on_disk.contains("path = renamed"));
        assert!(!on_disk.contains("path = app"));
    }

    #[tokio::test]
    async fn missing_section_is_section_not_found() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\npath = app\n");

        let err = update_value(&store, &SectionPath::parse("library.nope"), "k", "v").unwrap_err();
        assert!(matches!(err, OpError::SectionNotFound(_)));
    }

    #[tokio::test]
    async fn root_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\npath = app\n");

        let err = update_value(&store, &SectionPath::root(), "k", "v").unwrap_err();
        assert!(matches!(err, OpError::RootSection));
    }

    #[tokio::test]
    async fn structural_keys_and_multiline_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\npath = app\n");
        let section = SectionPath::parse("application");

        assert!(matches!(
            update_value(&store, &section, "a.b", "v"),
            Err(OpError::Tree(_))
        ));
        assert!(matches!(
            update_value(&store, &section, "k", "line1\nline2"),
            Err(OpError::InvalidValue(_))
        ));
    }
}

mod library_names {
    use super::*;

    #[test]
    fn accepts_allow_listed_names() {
        assert_eq!(sanitize_name("lib-1").unwrap(), "lib-1");
        assert_eq!(sanitize_name("my_lib").unwrap(), "my_lib");
    }

    #[test]
    fn strips_path_prefixes_before_validating() {
        assert_eq!(sanitize_name("../evil").unwrap(), "evil");
        assert_eq!(sanitize_name("./lib").unwrap(), "lib");
        assert_eq!(sanitize_name("/lib").unwrap(), "lib");
        assert_eq!(sanitize_name("../../lib").unwrap(), "lib");
        assert_eq!(sanitize_name("..\\lib").unwrap(), "lib");
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "a/b", "a.b", "ev!l", "a b", "a..b"] {
            assert!(
                matches!(sanitize_name(bad), Err(OpError::InvalidName(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn kind_parses_and_displays() {
        assert_eq!("static".parse::<LibraryKind>().unwrap(), LibraryKind::Static);
        assert_eq!(
            "dynamic".parse::<LibraryKind>().unwrap(),
            LibraryKind::Dynamic
        );
        assert!("shared".parse::<LibraryKind>().is_err());
        assert_eq!(LibraryKind::Static.to_string(), "static");
    }
}

mod library_creation {
    use super::*;

    #[tokio::test]
    async fn creates_the_library_section() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");

        let name = add_library(&store, "mathlib", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap();
        assert_eq!(name, "mathlib");

        let tree = store.snapshot();
        let lib = resolve_branch(&tree, &SectionPath::parse("library.mathlib")).unwrap();
        assert_eq!(lib.get("path").unwrap().as_leaf(), Some("mathlib"));
        assert_eq!(lib.get("type").unwrap().as_leaf(), Some("static"));
        assert_eq!(lib.get("dependencies").unwrap().as_leaf(), Some(""));

        assert!(fs::read_to_string(&path).unwrap().contains("[library.mathlib]"));
    }

    #[tokio::test]
    async fn second_add_is_duplicate_and_leaves_tree_unchanged() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");

        add_library(&store, "foo", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let err = add_library(&store, "foo", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap_err();

        assert!(matches!(err, OpError::DuplicateLibrary(n) if n == "foo"));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn sanitized_duplicate_is_still_a_duplicate() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[library.evil]\npath = evil\n");

        let err = add_library(&store, "../evil", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::DuplicateLibrary(n) if n == "evil"));
    }

    #[tokio::test]
    async fn invalid_name_fails_before_any_mutation() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");
        let before = fs::read_to_string(&path).unwrap();

        let err = add_library(&store, "ev!l", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap_err();

        assert!(matches!(err, OpError::InvalidName(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn scaffold_failure_gates_the_mutation() {
        let dir = TempDir::new().unwrap();
        let (store, path) = store_with(&dir, "[application]\ndependencies =\n");
        let before = fs::read_to_string(&path).unwrap();

        let err = add_library(&store, "mathlib", LibraryKind::Dynamic, &FailingScaffolder)
            .await
            .unwrap_err();

        match err {
            OpError::ScaffoldFailed { name, details } => {
                assert_eq!(name, "mathlib");
                assert_eq!(details, "generator exploded");
            }
            other => panic!("expected ScaffoldFailed, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(store.snapshot().root().get("library").is_none());
    }

    #[tokio::test]
    async fn new_library_can_be_registered_as_a_dependency() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(&dir, "[application]\ndependencies =\n");

        let name = add_library(&store, "mathlib", LibraryKind::Static, &NoopScaffolder)
            .await
            .unwrap();
        let outcome =
            add_dependency(&store, &SectionPath::parse("application"), &name).unwrap();

        assert_eq!(outcome, DependencyOutcome::Added);
        let node = store
            .get_node(&SectionPath::parse("application.dependencies"))
            .unwrap();
        assert_eq!(node.as_leaf(), Some("mathlib"));
    }
}

mod classification {
    use super::*;

    #[test]
    fn buildable_units_are_positional() {
        assert!(is_buildable_unit(&SectionPath::parse("application")));
        assert!(is_buildable_unit(&SectionPath::parse("library")));
        assert!(is_buildable_unit(&SectionPath::parse("library.mathlib")));

        assert!(!is_buildable_unit(&SectionPath::root()));
        assert!(!is_buildable_unit(&SectionPath::parse("general")));
        assert!(!is_buildable_unit(&SectionPath::parse("general.sub")));
        assert!(!is_buildable_unit(&SectionPath::parse("library.a.b")));
    }

    #[tokio::test]
    async fn children_report_kind_value_and_buildability() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(
            &dir,
            "[application]\npath = app\n\n[library.mathlib]\npath = mathlib\n",
        );

        let top = children_of(&store, &SectionPath::root()).unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|child| child.buildable));

        let app = children_of(&store, &SectionPath::parse("application")).unwrap();
        assert_eq!(app[0].name, "path");
        assert_eq!(app[0].value.as_deref(), Some("app"));
        assert!(!app[0].buildable);

        let err = children_of(&store, &SectionPath::parse("application.path")).unwrap_err();
        assert!(matches!(err, OpError::SectionNotFound(_)));
    }

    #[tokio::test]
    async fn lists_buildable_units_with_dependencies() {
        let dir = TempDir::new().unwrap();
        let (store, _) = store_with(
            &dir,
            "[application]\ndependencies = mathlib\n\n[library.mathlib]\ndependencies =\n",
        );

        let units = list_buildable_units(&store);

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].path, "application");
        assert_eq!(units[0].dependencies, vec!["mathlib".to_string()]);
        assert_eq!(units[1].path, "library.mathlib");
        assert!(units[1].dependencies.is_empty());
    }
}
