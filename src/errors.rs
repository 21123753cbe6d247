use std::path::PathBuf;
use thiserror::Error;

/// Failure while parsing a manifest literal. Offsets are byte positions in the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid number literal {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
    #[error("name {name:?} at offset {offset} is not a literal")]
    UnsupportedName { name: String, offset: usize },
    #[error("cannot mix bytes and str literals at offset {offset}")]
    MixedStringKinds { offset: usize },
    #[error("non-ASCII character in bytes literal at offset {offset}")]
    NonAsciiBytes { offset: usize },
    #[error("unhashable {kind} used as mapping key or set element at offset {offset}")]
    Unhashable { kind: &'static str, offset: usize },
    #[error("literal nested deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

#[derive(Debug, Error)]
pub enum ModGraphError {
    #[error("Module {name} not found")]
    ModuleNotFound { name: String },

    #[error("No manifest found in {name}")]
    ManifestNotFound { name: String },

    #[error("Error parsing {file}: {source}")]
    Manifest { file: PathBuf, source: ParseError },

    #[error("Error reading {file}: {source}")]
    ReadManifest { file: PathBuf, source: std::io::Error },

    #[error("Malformed manifest {file}: {reason}")]
    MalformedDepends { file: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to list modules: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid configuration {file}: {reason}")]
    Config { file: PathBuf, reason: String },

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
