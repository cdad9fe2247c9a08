//! Mortar front end - routes command-line invocations into the CLI
//! service over a store for the project's backing file.

use std::{env, path::PathBuf, process, sync::Arc};

use mortar::{
    cli::{CliService, formatting::format_error},
    scaffold::{CommandScaffolder, NoopScaffolder, Scaffolder},
    store::ConfigStore,
    tracing_config,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::var("MORTAR_LOG_DIR") {
        Ok(dir) => tracing_config::init_with_file(dir.as_ref())?,
        Err(_) => tracing_config::init()?,
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let (backing, args) = split_backing_flag(args);

    let category = args.first().map(String::as_str).unwrap_or("help");

    let store = match ConfigStore::load(&backing) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{}: {}", format_error("Error"), e);
            process::exit(1);
        }
    };
    let service = CliService::new(store, scaffolder_from_env());

    if category == "help" {
        println!("{}", service.help_text());
        return Ok(());
    }

    let command = args.get(1).map(String::as_str).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    match service.execute_command(category, command, command_args).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", format_error("Error"), e);
            process::exit(1);
        }
    }
}

/// Extracts a leading `--file <path>` flag; the backing file otherwise
/// comes from MORTAR_PROJECT_FILE or defaults to ./project.cfg.
fn split_backing_flag(args: Vec<String>) -> (PathBuf, Vec<String>) {
    if args.first().map(String::as_str) == Some("--file")
        && let Some(path) = args.get(1)
    {
        return (PathBuf::from(path), args[2..].to_vec());
    }

    let backing = env::var("MORTAR_PROJECT_FILE").unwrap_or_else(|_| "project.cfg".to_string());
    (PathBuf::from(backing), args)
}

/// The scaffolding collaborator: the framework's generator script when
/// MORTAR_GENERATOR is set, otherwise a no-op.
fn scaffolder_from_env() -> Arc<dyn Scaffolder> {
    match env::var("MORTAR_GENERATOR") {
        Ok(program) => Arc::new(CommandScaffolder::new(program)),
        Err(_) => Arc::new(NoopScaffolder),
    }
}
