use std::path::PathBuf;

use derive_more::{Display, From};

// -------------------------------------------------------------------------------------------------

/// Errors raised by the preset store, the sequence parser and parameter groups.
///
/// The [`PresetEngine`](crate::PresetEngine) recovers most of them locally by logging: only
/// [`Error::Parse`] is passed on to the caller of
/// [`load_sequence`](crate::PresetEngine::load_sequence).
#[derive(Debug, Display, From)]
pub enum Error {
    /// A preset file does not exist.
    #[display("Preset file '{}' does not exist", _0.display())]
    NotFound(PathBuf),
    /// Reading or writing a preset file failed.
    #[display("IO error: {_0}")]
    #[from]
    Io(std::io::Error),
    /// A preset file is not a valid JSON document.
    #[display("Invalid preset JSON: {_0}")]
    #[from]
    Json(serde_json::Error),
    /// A sequence text could not be parsed.
    #[display("Invalid sequence: {_0}")]
    Parse(String),
    /// A value does not match the type of the parameter it should be applied to.
    #[display("Type mismatch for parameter '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    /// A parameter group has no parameter with the given key.
    #[display("Unknown parameter '{_0}'")]
    UnknownParameter(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

/// Shortcut for results with a preset [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// -------------------------------------------------------------------------------------------------
