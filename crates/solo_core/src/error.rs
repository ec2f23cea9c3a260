//! Error types for profile loading and reply rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a character file into a [`CharacterProfile`](crate::CharacterProfile).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read character file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid character YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("character file is empty")]
    Empty,

    #[error("character file must be a mapping at the top level")]
    NotAMapping,

    #[error("character YAML missing required top-level key: {0}")]
    MissingKey(&'static str),

    #[error("invalid `{key}` section: {reason}")]
    InvalidSection { key: &'static str, reason: String },
}

/// Failure to substitute placeholders into a reply template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("template references unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),

    #[error("unbalanced `{brace}` at byte {position} in template")]
    UnbalancedBrace { brace: char, position: usize },
}
