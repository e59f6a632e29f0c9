//! Replay command - Log a JSON Lines capture of EME activity.
//!
//! Each line is one observation:
//!
//! ```text
//! {"kind": "call", "name": "update", "args": [...], "labels": [...], "keySystem": "org.w3.clearkey"}
//! {"kind": "event", "event": {"$class": "MediaKeyMessageEvent", "type": "message", ...}}
//! {"kind": "promise", "title": "update", "status": "resolved"}
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use serde_json::{Value as Json, json};

use eme_logger::prelude::*;

use crate::OutputFormat;
use crate::commands::print_item;
use crate::config::CliConfig;
use crate::input::{read_input, to_object, to_value};

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// JSON Lines capture to replay (`-` for standard input)
    #[arg(required = true)]
    pub input: String,

    /// Keep going after a line fails
    #[arg(long)]
    pub keep_going: bool,
}

fn undefined() -> Json {
    json!({"$undefined": true})
}

/// One captured observation.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Observation {
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Json>,
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default = "undefined")]
        result: Json,
        #[serde(default = "undefined")]
        target: Json,
        #[serde(default = "undefined")]
        data: Json,
        #[serde(default, rename = "keySystem")]
        key_system: Option<String>,
    },
    Event {
        event: Json,
    },
    Promise {
        title: String,
        status: PromiseStatus,
        #[serde(default = "undefined")]
        result: Json,
    },
}

impl Observation {
    fn log(&self, logger: &EmeLogger) -> Result<LogItem> {
        let item = match self {
            Observation::Call {
                name,
                args,
                labels,
                result,
                target,
                data,
                key_system,
            } => {
                let mut call = MethodCall::new(name.as_str())
                    .args(args.iter().map(to_value).collect::<Result<Vec<_>>>()?)
                    .labels(labels.iter().cloned())
                    .with_result(to_value(result)?)
                    .with_target(to_value(target)?)
                    .with_data(to_value(data)?);
                if let Some(key_system) = key_system {
                    call = call.with_key_system(key_system.as_str());
                }
                logger.log_method_call(&call)?
            }
            Observation::Event { event } => logger.log_event(&to_object(event)?)?,
            Observation::Promise {
                title,
                status,
                result,
            } => logger.log_promise_result(title.as_str(), status.clone(), to_value(result)?)?,
        };
        Ok(item)
    }
}

/// Replay every line of a capture. Blank lines are skipped.
pub fn replay(text: &str, logger: &EmeLogger, keep_going: bool) -> Result<Vec<LogItem>> {
    let mut items = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let result = serde_json::from_str::<Observation>(line)
            .context("Invalid observation")
            .and_then(|observation| observation.log(logger))
            .with_context(|| format!("Line {}", line_no));

        match result {
            Ok(item) => items.push(item),
            Err(e) if keep_going => {
                tracing::warn!(line = line_no, error = %format!("{:#}", e), "Skipping line");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(items)
}

/// Execute the replay command.
pub fn execute(
    args: ReplayArgs,
    config: &CliConfig,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let logger = config
        .logger_builder()
        .with_subscriber(Arc::new(
            TracingSubscriber::new().with_level(tracing::Level::DEBUG),
        ))
        .build()
        .context("Failed to create logger")?;

    let text = read_input(&args.input)?;
    let items = replay(&text, &logger, args.keep_going)?;

    for item in &items {
        print_item(item, format)?;
        if matches!(format, OutputFormat::Human) {
            println!();
        }
    }

    if !quiet && matches!(format, OutputFormat::Human) {
        println!("Replayed {} records", items.len());
    }

    Ok(())
}
