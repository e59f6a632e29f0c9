//! EME Logger Formatters
//!
//! This crate turns raw EME data into human-readable text through
//! pluggable formatters.
//!
//! # Formatter Plugins
//!
//! A formatter declares the event/call names it understands (`message`,
//! `update`, `generateRequest`, ...) and which key systems it applies to.
//! Formatters are held in a [`FormatterRegistry`], which keeps an ordered
//! list of formatters per name.
//!
//! # Built-in Formatters
//!
//! - [`ClearKeyFormatter`]: Clear Key license requests and licenses
//! - [`HexDumpFormatter`]: raw byte payloads for any key system
//!
//! # Usage
//!
//! ```
//! use eme_logger_core::Value;
//! use eme_logger_format::{FormatterRegistryBuilder, resolve_formatted_message};
//! use eme_logger_format::builtin::{ClearKeyFormatter, HexDumpFormatter};
//!
//! let registry = FormatterRegistryBuilder::new()
//!     .with(ClearKeyFormatter::new())
//!     .with(HexDumpFormatter::new())
//!     .build()
//!     .unwrap();
//!
//! let request = Value::array_buffer(br#"{"kids":["abc"],"type":"temporary"}"#.to_vec());
//! let message = resolve_formatted_message(
//!     Some(&registry),
//!     "message",
//!     &request,
//!     Some("org.w3.clearkey"),
//! );
//! assert!(message.unwrap().starts_with("Clear Key license request"));
//! ```

pub mod builtin;
pub mod error;
pub mod formatter;
pub mod registry;
pub mod resolve;

// Re-export main types
pub use error::{FormatError, FormatResult, RegistryError, RegistryResult};
pub use formatter::{
    BoxedFormatter, Formatter, FormatterId, SharedFormatter, key_systems, standard_ids,
};
pub use registry::{FormatterRegistry, FormatterRegistryBuilder};
pub use resolve::{
    ResolverConfig, SeparatorPolicy, resolve_formatted_message, resolve_formatted_message_with,
};

// Re-export built-in formatters
pub use builtin::{ClearKeyFormatter, HexDumpFormatter};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FormatError, FormatResult, RegistryError, RegistryResult};
    pub use crate::formatter::{Formatter, FormatterId};
    pub use crate::registry::{FormatterRegistry, FormatterRegistryBuilder};
    pub use crate::resolve::{ResolverConfig, SeparatorPolicy, resolve_formatted_message};

    // Built-in formatters
    pub use crate::builtin::{ClearKeyFormatter, HexDumpFormatter};
}

#[cfg(test)]
mod tests {
    use super::*;
    use eme_logger_core::Value;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _ = FormatterId::new("test");
        let _ = FormatterRegistry::new();
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = FormatterRegistryBuilder::new()
            .with(ClearKeyFormatter::new())
            .with(HexDumpFormatter::new())
            .build()
            .unwrap();

        assert!(registry.has(&standard_ids::CLEARKEY));
        assert!(registry.has(&standard_ids::HEXDUMP));
        assert_eq!(registry.formatters_for("message").len(), 2);
        assert_eq!(registry.formatters_for("generateRequest").len(), 1);
    }

    #[test]
    fn test_builtins_combined_for_clearkey() {
        let registry = FormatterRegistryBuilder::new()
            .with(ClearKeyFormatter::new())
            .with(HexDumpFormatter::new())
            .build()
            .unwrap();

        let request = Value::array_buffer(br#"{"kids":[]}"#.to_vec());
        let message = resolve_formatted_message(
            Some(&registry),
            "message",
            &request,
            Some(key_systems::CLEARKEY),
        )
        .unwrap();

        let mut lines = message.lines();
        assert_eq!(lines.next(), Some("Clear Key license request (unknown)"));
        assert!(lines.next().unwrap().starts_with("0000: 7b 22 6b 69"));
    }

    #[test]
    fn test_builtins_for_other_key_system() {
        let registry = FormatterRegistryBuilder::new()
            .with(ClearKeyFormatter::new())
            .with(HexDumpFormatter::new())
            .build()
            .unwrap();

        let message = resolve_formatted_message(
            Some(&registry),
            "message",
            &Value::array_buffer(vec![0x08u8, 0x04]),
            Some(key_systems::WIDEVINE),
        );
        // Clear Key is skipped, so the hex dump is still prefixed by its
        // loop-index separator.
        assert_eq!(message, Some("\n0000: 08 04".to_string()));
    }

    #[test]
    fn test_global_registry_starts_empty_per_name() {
        // Other tests never register into the global registry.
        assert!(!FormatterRegistry::global().handles("onencrypted-test-only"));
    }
}
