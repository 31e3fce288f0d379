//! # Check Subcommand
//!
//! `mapval check --rules <descriptor> [--document <file>] [--print-tree]`
//!
//! Validates one JSON document. The materialized document (or the tracking
//! tree with `--print-tree`) goes to stdout; a rejected document prints its
//! violation to stderr and exits with status 1.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use mapval_engine::{Validated, ValidationError, Validator};
use mapval_ingest::load_json_reader;
use mapval_rules::RuleSetDescriptor;

/// Path separator used by `--print-tree`.
const TREE_SEPARATOR: &str = ".";

/// Arguments for the `mapval check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule descriptor (.yaml, .yml or .json).
    #[arg(long)]
    pub rules: PathBuf,

    /// JSON document to validate. Reads stdin when omitted.
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Print the tracking tree as `path : value` lines instead of JSON.
    #[arg(long)]
    pub print_tree: bool,
}

/// Build a validator from a descriptor file.
pub fn load_validator(path: &Path) -> Result<Validator> {
    let rules = RuleSetDescriptor::from_path(path)
        .and_then(RuleSetDescriptor::into_rule_set)
        .with_context(|| format!("loading rules from {}", path.display()))?;
    tracing::debug!(path = %path.display(), fields = rules.len(), "rules loaded");
    Ok(Validator::new(rules))
}

/// Validate the document named by `args`. Rule and input failures are
/// errors; a rejected document is a normal outcome.
pub fn check(args: &CheckArgs) -> Result<std::result::Result<Validated, ValidationError>> {
    let validator = load_validator(&args.rules)?;
    let payload = match &args.document {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            load_json_reader(file).with_context(|| format!("reading {}", path.display()))?
        }
        None => load_json_reader(std::io::stdin().lock()).context("reading stdin")?,
    };
    Ok(validator.validate(payload))
}

/// Run `mapval check`, returning the process exit code.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match check(args)? {
        Ok(validated) => {
            if args.print_tree {
                print!("{}", validated.tree().render_hierarchy(TREE_SEPARATOR));
            } else {
                println!("{}", serde_json::to_string_pretty(&validated.to_json())?);
            }
            Ok(0)
        }
        Err(err) if err.is_data_error() => {
            eprintln!("{err}");
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}
