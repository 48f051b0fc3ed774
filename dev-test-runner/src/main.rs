//! Runs every `fixtures/*.json` case through descriptor → document and
//! compares against the expected document (or error message).
//!
//! usage: dev-test-runner [FIXTURE_DIR]   (defaults to ./fixtures)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use gql_shape::builder::{OperationOptions, OperationType, QueryBuilder};
use gql_shape::descriptor::NodeDescriptor;
use gql_shape::path_de::from_str_with_path;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    operation: Operation,
    #[serde(default)]
    operation_name: Option<String>,
    #[serde(default)]
    variables: IndexMap<String, String>,
    shape: NodeDescriptor,
    #[serde(flatten)]
    expect: Expect,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    #[default]
    Query,
    Mutation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Expect {
    Document(String),
    Error(String),
}

fn run_fixture(path: &Path) -> Result<std::result::Result<(), String>> {
    let source = std::fs::read_to_string(path)?;
    let fixture: Fixture = from_str_with_path(&source)?;

    let mut builder = QueryBuilder::new();
    let root = gql_shape::lower::lower_to_node(&fixture.shape, &mut builder)?;
    let operation_type = match fixture.operation {
        Operation::Query => OperationType::Query,
        Operation::Mutation => OperationType::Mutation,
    };
    let options = OperationOptions {
        operation_name: fixture.operation_name,
        variable_definitions: fixture.variables,
    };
    let actual = builder.build(operation_type, &root, &options).map_err(|e| e.to_string());

    Ok(match (&fixture.expect, actual) {
        (Expect::Document(expected), Ok(actual)) if *expected == actual => Ok(()),
        (Expect::Error(expected), Err(actual)) if *expected == actual => Ok(()),
        (Expect::Document(expected), actual) => Err(format!("expected document {expected:?}, got {actual:?}")),
        (Expect::Error(expected), actual) => Err(format!("expected error {expected:?}, got {actual:?}")),
    })
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("fixtures"));
    let mut paths = std::fs::read_dir(&dir)
        .with_context(|| format!("failed to read fixture dir {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut failed = 0usize;
    for path in &paths {
        let name = path.file_stem().unwrap_or_default().to_string_lossy();
        match run_fixture(path) {
            Ok(Ok(())) => eprintln!("✅ {name}"),
            Ok(Err(mismatch)) => {
                failed += 1;
                eprintln!("❌ {name}: {}", mismatch.red());
            }
            Err(error) => {
                failed += 1;
                eprintln!("❌ {name}: {}", format!("{error:#}").red());
            }
        }
    }

    eprintln!("—— {} fixtures, {} failed ——", paths.len(), failed);
    if failed > 0 {
        anyhow::bail!("{failed} fixture(s) failed");
    }
    Ok(())
}
