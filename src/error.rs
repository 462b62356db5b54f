//! Error types for the preset and the tag stabilizer.
//!
//! Every variant carries a stable code so that a bundler host can match on failures
//! without parsing messages.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreppyError>;

pub const ERR_PARSE: &str = "PREPPY-ERR-PARSE-001";
pub const ERR_MALFORMED_SENTINEL: &str = "PREPPY-ERR-RESOLVE-001";
pub const ERR_UNRESOLVED_MARKER: &str = "PREPPY-ERR-RESOLVE-002";
pub const ERR_NON_IDENTIFIER: &str = "PREPPY-ERR-RESOLVE-003";
pub const ERR_STAGE: &str = "PREPPY-ERR-STAGE-001";
pub const ERR_MISSING_INPUT: &str = "PRESET-ERR-CONFIG-001";
pub const ERR_MANIFEST: &str = "PRESET-ERR-CONFIG-002";
pub const ERR_IO: &str = "PRESET-ERR-IO-001";
pub const ERR_JSON: &str = "PRESET-ERR-JSON-001";

#[derive(Error, Debug)]
pub enum PreppyError {
    #[error("Failed to parse {unit}: {message}")]
    Parse { unit: String, message: String },

    #[error("Malformed sentinel argument `{argument}` in {chunk}")]
    MalformedSentinel { chunk: String, argument: String },

    #[error(
        "Unresolved marker {marker}{} in {chunk}: its binding was removed before resolution",
        .tag.as_ref().map(|t| format!(" (tag <{}>)", t)).unwrap_or_default()
    )]
    UnresolvedMarker {
        chunk: String,
        marker: String,
        tag: Option<String>,
    },

    #[error("Marker {marker} in {chunk} resolved to `{found}`, which is not an identifier")]
    NonIdentifierBinding {
        chunk: String,
        marker: String,
        found: String,
    },

    #[error("Optimizing stage failed: {0}")]
    Stage(String),

    #[error(
        "No input was provided. Please provide an input via the \"input\" option or via \"source\" in the package.json"
    )]
    MissingInput,

    #[error("Invalid package manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PreppyError {
    pub fn parse(unit: impl Into<String>, message: impl Into<String>) -> Self {
        PreppyError::Parse {
            unit: unit.into(),
            message: message.into(),
        }
    }

    pub fn stage(message: impl Into<String>) -> Self {
        PreppyError::Stage(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            PreppyError::Parse { .. } => ERR_PARSE,
            PreppyError::MalformedSentinel { .. } => ERR_MALFORMED_SENTINEL,
            PreppyError::UnresolvedMarker { .. } => ERR_UNRESOLVED_MARKER,
            PreppyError::NonIdentifierBinding { .. } => ERR_NON_IDENTIFIER,
            PreppyError::Stage(_) => ERR_STAGE,
            PreppyError::MissingInput => ERR_MISSING_INPUT,
            PreppyError::Manifest { .. } => ERR_MANIFEST,
            PreppyError::Io(_) => ERR_IO,
            PreppyError::Json(_) => ERR_JSON,
        }
    }
}

#[cfg(feature = "napi")]
impl From<PreppyError> for napi::Error {
    fn from(err: PreppyError) -> Self {
        napi::Error::from_reason(format!("[{}] {}", err.code(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_marker_names_tag() {
        let err = PreppyError::UnresolvedMarker {
            chunk: "index.js".to_string(),
            marker: "PREPPY_JSX_ID_3".to_string(),
            tag: Some("Foo.Bar".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("PREPPY_JSX_ID_3"));
        assert!(message.contains("<Foo.Bar>"));
        assert_eq!(err.code(), ERR_UNRESOLVED_MARKER);
    }

    #[test]
    fn test_unresolved_marker_without_tag() {
        let err = PreppyError::UnresolvedMarker {
            chunk: "index.js".to_string(),
            marker: "PREPPY_JSX_ID_3".to_string(),
            tag: None,
        };
        assert!(!err.to_string().contains("tag <"));
    }
}
