//! Structured error types shared across ASM crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AsmError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (orders, depths, offending rows, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the ASM sampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AsmError {
    /// The requested order is zero or beyond the supported bound.
    #[error("invalid size: {0}")]
    InvalidSize(ErrorInfo),
    /// The doubling depth passed its ceiling before the chains coalesced.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(ErrorInfo),
    /// A produced configuration or matrix broke a structural invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(ErrorInfo),
    /// Rejected run configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and artefact I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl AsmError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AsmError::InvalidSize(info)
            | AsmError::ResourceExhausted(info)
            | AsmError::InvariantViolation(info)
            | AsmError::Config(info)
            | AsmError::Serde(info) => info,
        }
    }

    /// Wraps an I/O or encoding failure tied to a filesystem path.
    pub fn io(code: &str, err: impl ToString, path: &std::path::Path) -> Self {
        AsmError::Serde(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display()),
        )
    }
}
