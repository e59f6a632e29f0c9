//! Promise result records.

use std::fmt;

use serde::{Deserialize, Serialize};

use eme_logger_core::{Object, Value};

use crate::record::{PROMISE_RESULT_CLASS, Record};

/// Settlement status of a promise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromiseStatus {
    /// The promise was fulfilled.
    Resolved,
    /// The promise was rejected.
    Rejected,
    /// Any other caller-supplied status.
    Other(String),
}

impl PromiseStatus {
    /// Status as logged.
    pub fn as_str(&self) -> &str {
        match self {
            PromiseStatus::Resolved => "resolved",
            PromiseStatus::Rejected => "rejected",
            PromiseStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PromiseStatus {
    fn from(s: &str) -> Self {
        match s {
            "resolved" => PromiseStatus::Resolved,
            "rejected" => PromiseStatus::Rejected,
            other => PromiseStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PromiseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "resolved" => PromiseStatus::Resolved,
            "rejected" => PromiseStatus::Rejected,
            _ => PromiseStatus::Other(s),
        }
    }
}

impl From<PromiseStatus> for String {
    fn from(status: PromiseStatus) -> Self {
        match status {
            PromiseStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Record of a settled promise.
#[derive(Debug, Clone)]
pub struct PromiseResultRecord {
    title: String,
    status: PromiseStatus,
    result: Value,
}

impl PromiseResultRecord {
    /// Build a record.
    pub fn new(
        title: impl Into<String>,
        status: impl Into<PromiseStatus>,
        result: impl Into<Value>,
    ) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            result: result.into(),
        }
    }

    /// Settlement status.
    pub fn status(&self) -> &PromiseStatus {
        &self.status
    }

    /// Settled value or rejection reason.
    pub fn result(&self) -> &Value {
        &self.result
    }
}

impl Record for PromiseResultRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_value(&self) -> Value {
        Object::new(PROMISE_RESULT_CLASS)
            .with("title", self.title.as_str())
            .with("status", self.status.as_str())
            .with("result", self.result.clone())
            .into()
    }
}
