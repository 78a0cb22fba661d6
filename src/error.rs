use thiserror::Error;

/// Error type for all Powderlines operations.
///
/// The variants separate "your arguments were wrong" from "the network
/// failed" from "the upstream contract changed", so callers can react to
/// each without string-matching messages.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was outside the documented contract.
    ///
    /// Raised before any network traffic.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Connection failure or non-2xx response status.
    #[error("transport failure{}", status_suffix(.status))]
    Transport {
        /// HTTP status code, when a response arrived at all.
        status: Option<u16>,
        /// Underlying client error, when the request itself failed.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The response body was not the JSON shape this client understands.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A field this client consumes is missing or mistyped; the upstream
    /// API shape has changed and there is no recovery.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            status: err.status().map(|code| code.as_u16()),
            source: Some(err),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

/// Type alias for Results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
