//! Error types for migration operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type, returned to the host at the API boundary
#[derive(Debug, Error)]
pub enum ShifterError {
    /// The supplied tree violates the builder or root contract
    #[error("Invalid syntax tree: {message}")]
    InvalidTree { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule registration errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// A file could not be read
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidTree,
    Config,
    Rule,
    Io,
}

impl ShifterError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShifterError::InvalidTree { .. } => ErrorKind::InvalidTree,
            ShifterError::ConfigError { .. } => ErrorKind::Config,
            ShifterError::RuleError { .. } => ErrorKind::Rule,
            ShifterError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if processing can continue with the next document
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidTree)
    }

    pub fn invalid_tree(message: impl Into<String>) -> Self {
        Self::InvalidTree {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// A rewrite's structural expectation no longer holds for the tree
///
/// Raised when the tree changed between matching and fixing. Never fatal:
/// the fix is skipped and the diagnostic stays reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stale match: {reason}")]
pub struct StaleMatch {
    pub reason: String,
}

impl StaleMatch {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why a single fix was not applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    #[error("fix for '{rule_id}' not applied: {source}")]
    StaleMatch {
        rule_id: String,
        #[source]
        source: StaleMatch,
    },

    #[error("no registered rule with id '{0}'")]
    UnknownRule(String),

    #[error("diagnostic belongs to '{found}', tree is '{expected}'")]
    DocumentMismatch { expected: String, found: String },

    #[error("fix limit of {0} per document reached")]
    LimitReached(usize),

    #[error("cancelled before the fix was attempted")]
    Cancelled,
}

impl FixError {
    pub fn stale(rule_id: impl Into<String>, source: StaleMatch) -> Self {
        Self::StaleMatch {
            rule_id: rule_id.into(),
            source,
        }
    }

    /// Check if this is a stale-match outcome
    pub fn is_stale(&self) -> bool {
        matches!(self, FixError::StaleMatch { .. })
    }
}
