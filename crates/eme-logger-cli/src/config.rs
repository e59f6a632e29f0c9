//! TOML configuration for the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use eme_logger::prelude::*;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Flattener settings.
    pub flatten: FlattenConfig,
    /// Resolver settings.
    pub resolver: ResolverConfig,
    /// Built-in formatter selection.
    pub formatters: FormatterConfig,
}

/// Which built-in formatters are registered.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    /// Register the Clear Key license formatter.
    pub clearkey: bool,
    /// Register the hex dump formatter.
    pub hexdump: bool,
    /// Largest payload dumped by the hex formatter.
    pub hexdump_max_bytes: Option<usize>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            clearkey: true,
            hexdump: true,
            hexdump_max_bytes: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a file, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// A logger builder reflecting this configuration.
    pub fn logger_builder(&self) -> EmeLoggerBuilder {
        let mut builder = EmeLogger::builder()
            .with_flatten_config(self.flatten.clone())
            .with_resolver_config(self.resolver.clone());

        if self.formatters.clearkey {
            builder = builder.with_formatter(ClearKeyFormatter::new());
        }

        if self.formatters.hexdump {
            let mut hexdump = HexDumpFormatter::new();
            if let Some(max_bytes) = self.formatters.hexdump_max_bytes {
                hexdump = hexdump.with_max_bytes(max_bytes);
            }
            builder = builder.with_formatter(hexdump);
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::load(None).unwrap();

        assert!(config.flatten.detect_cycles);
        assert_eq!(config.resolver.separator, SeparatorPolicy::LoopIndex);
        assert!(config.formatters.clearkey);
        assert!(config.formatters.hexdump);
    }

    #[test]
    fn test_parse_full() {
        let config = CliConfig::parse(
            r#"
            [flatten]
            detect_cycles = false
            max_depth = 64

            [resolver]
            separator = "between-contributions"

            [formatters]
            clearkey = true
            hexdump = false
            "#,
        )
        .unwrap();

        assert!(!config.flatten.detect_cycles);
        assert_eq!(config.flatten.max_depth, Some(64));
        assert_eq!(config.resolver.separator, SeparatorPolicy::BetweenContributions);
        assert!(!config.formatters.hexdump);

        let logger = config.logger_builder().build().unwrap();
        assert_eq!(logger.registry().unwrap().len(), 1);
    }

    #[test]
    fn test_partial_sections() {
        let config = CliConfig::parse("[flatten]\nmax_depth = 3\n").unwrap();

        assert!(config.flatten.detect_cycles);
        assert_eq!(config.flatten.max_depth, Some(3));
        assert!(config.formatters.clearkey);
    }

    #[test]
    fn test_unknown_separator_rejected() {
        assert!(CliConfig::parse("[resolver]\nseparator = \"comma\"\n").is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(CliConfig::parse("[output]\ncolor = true\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/eme-logger.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
