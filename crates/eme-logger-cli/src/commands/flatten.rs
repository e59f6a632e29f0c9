//! Flatten command - Flatten a JSON-described value.

use anyhow::{Context, Result};
use clap::Args;

use eme_logger::prelude::*;

use crate::OutputFormat;
use crate::commands::print_item;
use crate::config::CliConfig;
use crate::input::{read_input, to_value};

/// Arguments for the flatten command.
#[derive(Args)]
pub struct FlattenArgs {
    /// JSON file to flatten (`-` for standard input)
    #[arg(required = true)]
    pub input: String,

    /// Maximum nesting depth (overrides the config file)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Disable cycle detection
    #[arg(long)]
    pub no_cycle_check: bool,
}

/// Execute the flatten command.
pub fn execute(args: FlattenArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    let mut flatten_config = config.flatten.clone();
    if let Some(depth) = args.max_depth {
        flatten_config = flatten_config.with_max_depth(depth);
    }
    if args.no_cycle_check {
        flatten_config = flatten_config.with_cycle_detection(false);
    }

    let text = read_input(&args.input)?;
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", args.input))?;
    let value = to_value(&json).context("Failed to convert input")?;

    tracing::info!(input = %args.input, title = %value.type_name(), "Flattening value");

    let item = flatten_with(&value, &flatten_config).context("Failed to flatten value")?;

    print_item(&item, format)
}
