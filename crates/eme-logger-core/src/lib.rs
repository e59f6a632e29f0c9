//! EME Logger Core - Host values and message flattening
//!
//! This crate provides the data layer of the EME logger:
//!
//! - [`Value`], [`Object`], [`Array`]: an explicit, tagged model of host
//!   values (call arguments, events, promise results)
//! - [`LogItem`]: the flattened, serializable `{title, names, values}` tree
//! - [`flatten`]: recursive conversion from one to the other
//! - [`FlattenConfig`]: cycle detection and depth limits
//!
//! # Quick Start
//!
//! ```
//! use eme_logger_core::prelude::*;
//!
//! let video = Object::new("HTMLVideoElement")
//!     .with("id", "player")
//!     .into_ref();
//! let call = Object::new("EmeMethodCall")
//!     .with("title", "setMediaKeys")
//!     .with("target", video);
//!
//! let item = flatten(&Value::from(call)).unwrap();
//! assert_eq!(item.title, "setMediaKeys");
//! assert_eq!(item.names, vec!["target"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Application                │
//! ├─────────────────────────────────────────┤
//! │          eme-logger (facade)            │
//! ├─────────────────────────────────────────┤
//! │ eme-logger-records │ eme-logger-format  │
//! ├─────────────────────────────────────────┤
//! │            eme-logger-core              │
//! └─────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod log_item;
pub mod value;

// Re-export main types at crate root
pub use config::FlattenConfig;
pub use error::{FlattenError, FlattenResult};
pub use flatten::{flatten, flatten_with};
pub use log_item::{LogItem, LogValue};
pub use value::{Array, ArrayRef, Object, ObjectRef, Value, number_to_string};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use eme_logger_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FlattenConfig;
    pub use crate::error::{FlattenError, FlattenResult};
    pub use crate::flatten::{flatten, flatten_with};
    pub use crate::log_item::{LogItem, LogValue};
    pub use crate::value::{Array, Object, ObjectRef, Value};
}
