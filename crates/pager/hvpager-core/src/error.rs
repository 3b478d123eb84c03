//! Error types for the pager.
//!
//! Runtime conditions (missing widget, foreign scroll locks, absent visual
//! targets) are not errors: they degrade to native scrolling and are logged.
//! Only invalid configuration and malformed traces surface here.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PagerError {
    /// A configuration value is out of range or inconsistent with another.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A recorded trace cannot be replayed.
    #[error("trace event {index} at {at_ms}ms: {reason}")]
    Trace {
        index: usize,
        at_ms: f64,
        reason: String,
    },
}

impl PagerError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PagerError>;
