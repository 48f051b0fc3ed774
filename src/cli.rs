//! Minimal CLI: shape descriptor → (query | mutation) document
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::builder::{OperationOptions, OperationType, QueryBuilder};
use crate::request::{Variable, Variables};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// build a GraphQL operation from a JSON shape descriptor
#[derive(Parser, Debug)]
#[command(name = "gql-shape", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit a query document
    Query(OperationOut),
    /// emit a mutation document
    Mutation(OperationOut),
}

#[derive(Args, Debug, Clone)]
struct OperationOut {
    /// JSON shape descriptor describing the selection
    #[arg(long, short)]
    input: PathBuf,

    /// operation name placed after the keyword
    #[arg(long)]
    operation_name: Option<String>,

    /// variable definition as `$name=Type` (repeatable)
    #[arg(long = "variable", short = 'v', value_parser = parse_variable_definition)]
    variables: Vec<(String, String)>,

    /// emit the JSON request payload (`query`, `operationName`) instead of the bare document
    #[arg(long, default_value_t = false)]
    request: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Query(target) => target.run(OperationType::Query),
            Command::Mutation(target) => target.run(OperationType::Mutation),
        }
    }
}

impl OperationOut {
    fn run(&self, operation_type: OperationType) -> Result<()> {
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read shape descriptor {}", self.input.display()))?;
        let descriptor = crate::descriptor::parse(&source)
            .with_context(|| format!("failed to parse shape descriptor {}", self.input.display()))?;

        let mut builder = QueryBuilder::new();
        let root = crate::lower::lower_to_node(&descriptor, &mut builder)?;
        tracing::debug!(input = %self.input.display(), registered = builder.registry().len(), "loaded descriptor");

        let output = if self.request {
            // Values are unknown here; the payload carries the document and name only.
            let variables = self
                .variables
                .iter()
                .fold(Variables::new(), |acc, (name, ty)| {
                    acc.with(name.trim_start_matches('$'), Variable::new(ty.clone(), serde_json::Value::Null))
                });
            let mut request = builder.request(operation_type, &root, self.operation_name.as_deref(), &variables)?;
            request.variables = None;
            serde_json::to_string_pretty(&request)?
        } else {
            let options = OperationOptions {
                operation_name: self.operation_name.clone(),
                variable_definitions: self.variables.iter().cloned().collect(),
            };
            builder.build(operation_type, &root, &options)?
        };

        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &output).with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            println!("{output}");
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_variable_definition(raw: &str) -> Result<(String, String), String> {
    let (name, ty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `$name=Type`, got `{raw}`"))?;
    Ok((name.trim().to_owned(), ty.trim().to_owned()))
}
