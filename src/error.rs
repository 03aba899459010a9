//! Error types.
//!
//! Only configuration problems are errors. Every JSON shape renders (unions
//! fall back to the target's most permissive type), and naming problems are
//! reported as `naming::NamingWarning` next to a successful result.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown target language '{name}' (known: {known})")]
    UnknownTargetLanguage { name: String, known: String },

    #[error("{language} does not support {option}")]
    UnsupportedOption { language: &'static str, option: String },

    #[error("invalid option combination: {0}")]
    InvalidCombination(String),

    #[error("invalid root name '{0}': it contains no identifier characters")]
    InvalidRootName(String),

    #[error("failed to parse configuration at {path}: {message}")]
    Parse { path: String, message: String },
}
