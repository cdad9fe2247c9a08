//! Unit tests for the CLI command registry and the command surface.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::{fs, sync::Arc};

use tempfile::TempDir;

use crate::cli::{CliError, CliService};
use crate::scaffold::NoopScaffolder;
use crate::store::ConfigStore;

fn service_with(dir: &TempDir, content: &str) -> (CliService, std::path::PathBuf) {
    let path = dir.path().join("project.cfg");
    fs::write(&path, content).unwrap();
    let store = ConfigStore::load(&path).unwrap();

    (CliService::new(store, Arc::new(NoopScaffolder)), path)
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn unknown_category_and_command_are_reported() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\npath = app\n");

    let err = service.execute_command("nope", "get", &[]).await.unwrap_err();
    assert!(matches!(err, CliError::CommandNotFound(_)));

    let err = service
        .execute_command("config", "nope", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::CommandNotFound(_)));
}

#[tokio::test]
async fn argument_counts_are_validated_from_metadata() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\npath = app\n");

    let err = service.execute_command("config", "get", &[]).await.unwrap_err();
    assert!(matches!(err, CliError::InvalidArguments(_)));

    let err = service
        .execute_command("config", "get", &args(&["a", "b"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArguments(_)));
}

#[tokio::test]
async fn get_prints_values_and_sections() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\npath = app\n");

    let output = service
        .execute_command("config", "get", &args(&["application.path"]))
        .await
        .unwrap();
    assert_eq!(output, "application.path = app");

    let output = service
        .execute_command("config", "get", &args(&["application"]))
        .await
        .unwrap();
    assert!(output.contains("path = app"));
}

#[tokio::test]
async fn set_writes_through_to_disk() {
    let dir = TempDir::new().unwrap();
    let (service, path) = service_with(&dir, "[application]\npath = app\n");

    service
        .execute_command("config", "set", &args(&["application", "type", "static"]))
        .await
        .unwrap();

    assert!(fs::read_to_string(&path).unwrap().contains("type = static"));
}

#[tokio::test]
async fn show_renders_text_and_json() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\npath = app\n");

    let text = service.execute_command("config", "show", &[]).await.unwrap();
    assert_eq!(text, "[application]\npath = app\n");

    let json = service
        .execute_command("config", "show", &args(&["json"]))
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["application"]["path"], "app");
}

#[tokio::test]
async fn library_add_and_list_round_trip() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\ndependencies =\n");

    let output = service
        .execute_command(
            "library",
            "add",
            &args(&["mathlib", "static", "application"]),
        )
        .await
        .unwrap();
    assert!(output.contains("Added library 'mathlib'"));
    assert!(output.contains("dependency of 'application'"));

    let listing = service
        .execute_command("library", "list", &[])
        .await
        .unwrap();
    assert!(listing.contains("application"));
    assert!(listing.contains("library.mathlib"));

    // Distinct outcome for a duplicate.
    let err = service
        .execute_command("library", "add", &args(&["mathlib", "static"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Operation(msg) if msg.contains("already exists")));
}

#[tokio::test]
async fn add_dependency_reports_already_exists() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\ndependencies = mathlib\n");

    let output = service
        .execute_command(
            "library",
            "add-dependency",
            &args(&["application", "mathlib"]),
        )
        .await
        .unwrap();
    assert!(output.contains("already exists"));
}

#[tokio::test]
async fn invalid_library_type_is_an_argument_error() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_with(&dir, "[application]\ndependencies =\n");

    let err = service
        .execute_command("library", "add", &args(&["mathlib", "shared"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArguments(_)));
}
