//! All error types for the autotranslate crate.
//!
//! `Error` is returned from every fallible core operation. Whether an error is fatal
//! for a whole run or only for one target locale is decided by the caller, see
//! [`crate::orchestrator`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown locale `{0}`")]
    LocaleDecode(String),

    #[error("failed to parse `{}`: {source}", path.display())]
    ResourceParse {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("translation provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Wraps a parse failure with the path of the file that failed.
    pub fn resource_parse(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::ResourceParse {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Failure reported by a [`crate::provider::TranslationProvider`].
///
/// Always recoverable at the granularity of one target locale.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("expected {expected} translations, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
