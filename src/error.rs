//! Error types surfaced by [`crate::Resolver::parse`]

use crate::source::file::DocumentError;
use thiserror::Error;

/// Error type returned by [`crate::Source::load`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed source url `{url}`: {source}")]
    MalformedSourceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("scheme could not be found: {0}")]
    UnknownScheme(String),

    #[error("{scheme}: {source}")]
    SourceLoad { scheme: String, source: BoxError },

    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

impl Error {
    /// The document error behind a failed `file` source load, if any.
    pub fn document(&self) -> Option<&DocumentError> {
        match self {
            Error::SourceLoad { source, .. } => source.downcast_ref::<DocumentError>(),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
