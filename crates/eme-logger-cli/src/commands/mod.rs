//! CLI subcommands.

pub mod flatten;
pub mod replay;

use anyhow::Result;

use eme_logger::prelude::*;

use crate::OutputFormat;

/// Print one log item in the requested format.
pub(crate) fn print_item(item: &LogItem, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print!("{}", item.to_text()),
        OutputFormat::Json => println!("{}", item.to_json_pretty()),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(item)?),
    }
    Ok(())
}
