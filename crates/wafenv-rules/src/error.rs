//! Error types for rule database operations.

use std::path::PathBuf;

use wafenv_core::WafEnvError;

/// Errors that can occur while loading or evaluating rules.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a rule file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule file not found.
    #[error("rule file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A rule entry could not be converted.
    #[error("invalid rule #{index}: {source}")]
    InvalidRule {
        /// Zero-based position of the rule in the file.
        index: usize,
        /// The underlying identifier error.
        source: WafEnvError,
    },

    /// No rule file was given and `waf` could not be found.
    #[error(
        "cannot find the waf rule database: make sure that waf can be found in PATH \
         and that {file} exists in its lib directory, or pass --rules"
    )]
    WafNotFound {
        /// The rule file name that was searched for.
        file: String,
    },

    /// A required option was not set by any rule.
    #[error("no rule defines '{key}' for {uplid}")]
    MissingKey { key: String, uplid: String },

    /// `$(KEY)` substitution did not settle.
    #[error("recursive substitution in '{key}'")]
    RecursiveExpansion { key: String },

    /// Identifier or resolution error.
    #[error(transparent)]
    Core(#[from] WafEnvError),
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RulesError>;
