//! Formatted-message resolution.
//!
//! Asks every formatter registered for a call/event name to describe its
//! data, and joins the answers into one message.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use eme_logger_core::Value;

use crate::registry::FormatterRegistry;

/// Where newline separators go between formatter outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorPolicy {
    /// Prefix the output of every formatter not first in registration
    /// order, whether or not an earlier formatter produced anything or
    /// handles the name at all.
    #[default]
    LoopIndex,
    /// Separate only outputs that were actually produced.
    BetweenContributions,
}

/// Configuration for the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Separator placement.
    pub separator: SeparatorPolicy,
}

impl ResolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator policy.
    pub fn with_separator(mut self, separator: SeparatorPolicy) -> Self {
        self.separator = separator;
        self
    }
}

/// Resolve a formatted message with the default configuration.
///
/// Returns `None` when there is no registry, when no formatter applies, or
/// when all applicable formatters produced empty text.
pub fn resolve_formatted_message(
    registry: Option<&FormatterRegistry>,
    name: &str,
    data: &Value,
    key_system: Option<&str>,
) -> Option<String> {
    resolve_formatted_message_with(registry, name, data, key_system, &ResolverConfig::default())
}

/// Resolve a formatted message.
///
/// Formatters registered for `name` are consulted in registration order.
/// Under [`SeparatorPolicy::LoopIndex`] a formatter's index is its position
/// among all registered formatters, including those for other names. A
/// formatter is skipped when a non-empty `key_system` is given and it does
/// not support it. A formatter that fails is logged and contributes nothing.
pub fn resolve_formatted_message_with(
    registry: Option<&FormatterRegistry>,
    name: &str,
    data: &Value,
    key_system: Option<&str>,
    config: &ResolverConfig,
) -> Option<String> {
    let registry = registry?;
    let key_system = key_system.filter(|ks| !ks.is_empty());

    let mut message = String::new();
    let mut contributed = false;

    for (index, formatter) in registry.indexed_formatters_for(name) {
        if let Some(ks) = key_system {
            if !formatter.is_key_system_supported(ks) {
                debug!(formatter = %formatter.id(), key_system = ks, "Key system not supported");
                continue;
            }
        }

        match formatter.format(name, data) {
            Ok(text) => {
                let separate = match config.separator {
                    SeparatorPolicy::LoopIndex => index > 0,
                    SeparatorPolicy::BetweenContributions => contributed && !text.is_empty(),
                };
                if separate {
                    message.push('\n');
                }
                if !text.is_empty() {
                    contributed = true;
                }
                message.push_str(&text);
            }
            Err(e) => {
                warn!(formatter = %formatter.id(), name = name, error = %e, "Formatter failed");
            }
        }
    }

    if message.is_empty() {
        return None;
    }

    Some(message)
}
