//! EME Logger Records
//!
//! This crate builds the records the EME logger emits and delivers their
//! flattened form to subscribers:
//!
//! - [`MethodCallRecord`]: an EME method call with labeled arguments
//! - [`EventRecord`]: a dispatched EME event
//! - [`PromiseResultRecord`]: a settled promise
//! - [`TargetInfo`]: the identifying attributes of a call or event target
//! - [`LogDispatcher`]: fan-out of flattened items to [`LogSubscriber`]s
//!
//! # Building Records
//!
//! ```
//! use eme_logger_core::{Object, Value};
//! use eme_logger_records::{MethodCall, MethodCallRecord, Record};
//!
//! let video = Object::new("HTMLVideoElement").with("id", "player");
//! let call = MethodCall::new("setMediaKeys")
//!     .arg("mediaKeys", Object::new("MediaKeys"))
//!     .with_target(video);
//!
//! let item = MethodCallRecord::new(&call, None).flatten().unwrap();
//! assert_eq!(
//!     item.names,
//!     vec!["mediaKeys", "returned", "target", "formattedMessage"]
//! );
//! ```
//!
//! # Subscribing
//!
//! ```
//! use std::sync::Arc;
//! use eme_logger_core::LogItem;
//! use eme_logger_records::{CollectingSubscriber, LogDispatcher, LogSubscriber};
//!
//! let dispatcher = LogDispatcher::new();
//! let collector = Arc::new(CollectingSubscriber::new(16));
//! dispatcher.subscribe(Arc::clone(&collector) as Arc<dyn LogSubscriber>);
//!
//! dispatcher.emit(&LogItem::new("closeEvent"));
//! assert_eq!(collector.len(), 1);
//! ```

pub mod dispatch;
pub mod event;
pub mod method_call;
pub mod promise;
pub mod record;
pub mod target;
pub mod timestamp;

// Re-export main types
pub use dispatch::{CollectingSubscriber, LogDispatcher, LogSubscriber, TracingSubscriber};
pub use event::EventRecord;
pub use method_call::{MethodCall, MethodCallRecord};
pub use promise::{PromiseResultRecord, PromiseStatus};
pub use record::{
    EVENT_CLASS, FORMATTED_MESSAGE, METHOD_CALL_CLASS, PROMISE_RESULT_CLASS, Record,
};
pub use target::{TARGET_CLASS, TargetInfo};
pub use timestamp::{INVALID_DATE, render_timestamp, render_timestamp_in};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::dispatch::{CollectingSubscriber, LogDispatcher, LogSubscriber};
    pub use crate::event::EventRecord;
    pub use crate::method_call::{MethodCall, MethodCallRecord};
    pub use crate::promise::{PromiseResultRecord, PromiseStatus};
    pub use crate::record::Record;
    pub use crate::target::TargetInfo;
}
